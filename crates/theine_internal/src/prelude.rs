//! One-stop imports for building and running dispatch graphs.

pub use theine_core::context::{current_rank, Context};
pub use theine_core::device::Device;
pub use theine_core::dims::{Offset, Size, Stride};
pub use theine_core::error::{Error, Result};
pub use theine_core::operation::Operation;
pub use theine_core::tensor::Tensor;

pub use theine_dispatch::{
    BlobRef, Connectable, Graph, NodeId, OpBuilder, OpRef, Runnable,
};

pub use theine_ops::composite::Update;
pub use theine_ops::{Dummy, Fill, GaussianFill, WeightedSum};
