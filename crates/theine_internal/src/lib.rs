pub mod prelude;

pub use theine_core as core;
pub use theine_dispatch as dispatch;
pub use theine_ops as ops;
