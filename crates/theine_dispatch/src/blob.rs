use crate::graph::GraphShared;
use crate::node::{NodeId, NodeKind};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use theine_core::device::Device;
use theine_core::tensor::Tensor;

/// Handle to a data-carrying node. Cloning the handle is cheap; the
/// node itself lives in the graph tree's arena.
#[derive(Clone)]
pub struct BlobRef {
    pub(crate) id: NodeId,
    pub(crate) shared: Arc<GraphShared>,
}

impl BlobRef {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// A view sharing the blob's storage.
    pub fn tensor(&self) -> Tensor {
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        match &arena.get(self.id).kind {
            NodeKind::Blob(blob) => blob.tensor.clone(),
            NodeKind::Op(_) => unreachable!("blob handle to an op node"),
        }
    }

    /// Fully qualified name; meaningful once the root has prepared.
    pub fn name(&self) -> String {
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        arena.get(self.id).cached_name.clone()
    }

    pub fn rank(&self) -> usize {
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        arena.get(self.id).rank
    }

    pub fn device(&self) -> Device {
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        arena.get(self.id).device
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
