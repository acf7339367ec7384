use crate::graph::GraphShared;
use crate::node::NodeId;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use theine_core::operation::Operation;
use theine_core::tensor::Tensor;

/// Typed factory for operation nodes: `Graph::create_op::<O>` captures
/// the parameters now and builds the operation at first fire, once the
/// input and output blobs are known.
pub trait OpBuilder: Operation + Sized + 'static {
    type Param: Send + 'static;

    fn build(inputs: Vec<Tensor>, outputs: Vec<Tensor>, param: Self::Param) -> Self;
}

/// Handle to a compute-carrying node.
#[derive(Clone)]
pub struct OpRef {
    pub(crate) id: NodeId,
    pub(crate) shared: Arc<GraphShared>,
}

impl OpRef {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Fully qualified name; meaningful once the root has prepared.
    pub fn name(&self) -> String {
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        arena.get(self.id).cached_name.clone()
    }

    /// Current inbound-fired count; zero between rounds.
    pub fn inbound(&self) -> usize {
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        arena.get(self.id).in_count.load(Ordering::Acquire)
    }

    /// Current outbound-acknowledged count; zero between rounds.
    pub fn outbound(&self) -> usize {
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        arena.get(self.id).out_count.load(Ordering::Acquire)
    }
}
