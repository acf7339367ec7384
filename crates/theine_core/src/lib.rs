pub mod buffer;
pub mod context;
pub mod device;
pub mod dims;
pub mod error;
pub mod operation;
pub mod snapshot;
pub mod tensor;
