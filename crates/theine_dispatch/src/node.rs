use crate::graph::GraphShared;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use theine_core::device::Device;
use theine_core::operation::Operation;
use theine_core::tensor::Tensor;

/// Stable handle into a graph tree's node arena. Edges are stored as
/// handles, never as references, so pruning a node cannot dangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

pub(crate) type OpBuild = Box<dyn FnOnce(Vec<Tensor>, Vec<Tensor>) -> Box<dyn Operation> + Send>;

pub(crate) struct BlobNode {
    pub tensor: Tensor,
}

pub(crate) struct OpNode {
    pub thread: String,
    /// Consumed at first fire: the wrapped operation binds the tensors
    /// of the blobs connected by then, not the ones at creation time.
    pub build: Mutex<Option<OpBuild>>,
    pub operation: OnceLock<Box<dyn Operation>>,
}

/// The closed set of node kinds the scheduler dispatches over.
pub(crate) enum NodeKind {
    Blob(BlobNode),
    Op(OpNode),
}

pub(crate) struct NodeSlot {
    pub kind: NodeKind,
    pub rank: usize,
    pub device: Device,
    pub local_name: String,
    pub cached_name: String,
    pub inputs: Vec<NodeId>,
    pub outputs: Vec<NodeId>,
    pub in_count: AtomicUsize,
    pub out_count: AtomicUsize,
}

impl NodeSlot {
    pub fn new(kind: NodeKind, rank: usize, device: Device, local_name: &str) -> Self {
        Self {
            kind,
            rank,
            device,
            local_name: local_name.to_string(),
            cached_name: local_name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            in_count: AtomicUsize::new(0),
            out_count: AtomicUsize::new(0),
        }
    }

    pub fn is_blob(&self) -> bool {
        matches!(self.kind, NodeKind::Blob(_))
    }
}

/// Owning registry for every node in one graph tree.
pub(crate) struct Arena {
    slots: Vec<Option<NodeSlot>>,
}

impl Arena {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn insert(&mut self, slot: NodeSlot) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(slot));
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.0 as usize)
            .map_or(false, |slot| slot.is_some())
    }

    pub fn get(&self, id: NodeId) -> &NodeSlot {
        self.slots[id.0 as usize]
            .as_ref()
            .unwrap_or_else(|| panic!("node {:?} has been removed", id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeSlot {
        self.slots[id.0 as usize]
            .as_mut()
            .unwrap_or_else(|| panic!("node {:?} has been removed", id))
    }

    /// Registers `from -> to` symmetrically on both endpoints.
    pub fn link(&mut self, from: NodeId, to: NodeId) {
        self.get_mut(from).outputs.push(to);
        self.get_mut(to).inputs.push(from);
    }

    /// Removes the node and scrubs its handle from every neighbor's
    /// adjacency list.
    pub fn remove(&mut self, id: NodeId) {
        let slot = self.slots[id.0 as usize]
            .take()
            .unwrap_or_else(|| panic!("node {:?} has been removed", id));
        for input in slot.inputs {
            if self.contains(input) {
                self.get_mut(input).outputs.retain(|&n| n != id);
            }
        }
        for output in slot.outputs {
            if self.contains(output) {
                self.get_mut(output).inputs.retain(|&n| n != id);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (NodeId(i as u32), s)))
    }
}

/// One inbound report. When the counter reaches the node's input
/// cardinality the node fires exactly once for the round: `compute`
/// runs, every input is acknowledged, and the counter resets so the
/// next round needs no separate bookkeeping. Activation is never
/// auto-forwarded to outputs from here; compute bodies do that once
/// their work is actually done.
pub(crate) fn inc_in(shared: &Arc<GraphShared>, arena: &Arena, id: NodeId) {
    let slot = arena.get(id);
    let seen = slot.in_count.fetch_add(1, Ordering::AcqRel) + 1;
    if seen == slot.inputs.len() {
        compute(shared, arena, id);
        for &input in &slot.inputs {
            inc_out(arena, input);
        }
        slot.in_count.store(0, Ordering::Release);
    }
}

/// One consumer acknowledgement. Reaching the output cardinality means
/// every consumer has observed this round's firing, so the buffer may
/// be reused; the counter resets.
pub(crate) fn inc_out(arena: &Arena, id: NodeId) {
    let slot = arena.get(id);
    let seen = slot.out_count.fetch_add(1, Ordering::AcqRel) + 1;
    if seen >= slot.outputs.len() {
        slot.out_count.store(0, Ordering::Release);
    }
}

/// Node firing. Blobs account for sinks and activate their consumers in
/// place; ops hand their kernel to the owning task loop and activate
/// consumers when the posted task finishes.
pub(crate) fn compute(shared: &Arc<GraphShared>, arena: &Arena, id: NodeId) {
    let slot = arena.get(id);
    match &slot.kind {
        NodeKind::Blob(_) => {
            if slot.outputs.is_empty() {
                shared.sink_counter.increment();
            }
            for &output in &slot.outputs {
                inc_in(shared, arena, output);
            }
        }
        NodeKind::Op(op) => {
            let task_loop = shared.task_loop(slot.device, &op.thread);
            let shared = Arc::clone(shared);
            task_loop.post(Box::new(move || run_op(&shared, id)));
        }
    }
}

fn run_op(shared: &Arc<GraphShared>, id: NodeId) {
    let arena = shared.arena.read().unwrap_or_else(|e| e.into_inner());
    let slot = arena.get(id);
    let NodeKind::Op(op) = &slot.kind else {
        unreachable!("run_op on a non-op node");
    };
    let operation = op.operation.get_or_init(|| {
        let build = op
            .build
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .unwrap_or_else(|| panic!("operation {} has no builder", slot.cached_name));
        let inputs = tensors_of(&arena, &slot.inputs, &slot.cached_name);
        let outputs = tensors_of(&arena, &slot.outputs, &slot.cached_name);
        build(inputs, outputs)
    });
    // Accumulate into outputs this op is not the first producer of.
    let add: Vec<bool> = slot
        .outputs
        .iter()
        .map(|&output| arena.get(output).inputs.first() != Some(&id))
        .collect();
    match slot.device {
        Device::Cpu => operation.compute_cpu(&add),
        Device::Gpu(_) => operation.compute_gpu(&add),
    }
    if slot.outputs.is_empty() {
        shared.sink_counter.increment();
    }
    for &output in &slot.outputs {
        inc_in(shared, &arena, output);
    }
}

fn tensors_of(arena: &Arena, ids: &[NodeId], op_name: &str) -> Vec<Tensor> {
    ids.iter()
        .map(|&id| {
            let slot = arena.get(id);
            match &slot.kind {
                NodeKind::Blob(blob) => blob.tensor.clone(),
                NodeKind::Op(_) => panic!(
                    "operation {} is wired directly to operation {}",
                    op_name, slot.cached_name
                ),
            }
        })
        .collect()
}
