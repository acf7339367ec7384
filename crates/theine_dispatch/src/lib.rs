pub mod blob;
pub mod connectable;
pub mod graph;
pub mod loops;
pub mod node;
pub mod op;
pub mod runnable;

pub use blob::BlobRef;
pub use connectable::Connectable;
pub use graph::Graph;
pub use node::NodeId;
pub use op::{OpBuilder, OpRef};
pub use runnable::Runnable;
