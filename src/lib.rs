pub use theine_internal::*;
