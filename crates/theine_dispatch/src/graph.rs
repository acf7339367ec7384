use crate::blob::BlobRef;
use crate::loops::{DeviceLoop, SinkCounter, TaskLoop, ThreadPool};
use crate::node::{Arena, BlobNode, NodeId, NodeKind, NodeSlot, OpBuild, OpNode};
use crate::op::{OpBuilder, OpRef};
use dashmap::DashMap;
use std::collections::HashSet;
use std::ops::Shr;
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use theine_core::device::Device;
use theine_core::dims::Size;
use theine_core::tensor::Tensor;

/// State shared by every graph, node handle, and task of one graph
/// tree: the node arena, the sink counter gating `sync()`, and the
/// lazily-built task-loop table.
pub(crate) struct GraphShared {
    pub(crate) arena: RwLock<Arena>,
    pub(crate) sink_counter: SinkCounter,
    loops: DashMap<(Device, String), Arc<dyn TaskLoop>>,
}

impl GraphShared {
    pub(crate) fn new() -> Self {
        Self {
            arena: RwLock::new(Arena::new()),
            sink_counter: SinkCounter::new(),
            loops: DashMap::new(),
        }
    }

    /// Lazily creates the execution context for a (device, thread) key.
    /// All CPU work shares one pool; each GPU (device, thread) pair gets
    /// a dedicated serializing loop.
    pub(crate) fn task_loop(&self, device: Device, thread: &str) -> Arc<dyn TaskLoop> {
        let key = match device {
            Device::Cpu => (device, String::new()),
            Device::Gpu(_) => (device, thread.to_string()),
        };
        if let Some(existing) = self.loops.get(&key) {
            return Arc::clone(existing.value());
        }
        self.loops
            .entry(key)
            .or_insert_with(|| {
                tracing::debug!(device = %device.name(), thread, "creating task loop");
                match device {
                    Device::Cpu => Arc::new(ThreadPool::new()) as Arc<dyn TaskLoop>,
                    Device::Gpu(_) => Arc::new(DeviceLoop::new(device)) as Arc<dyn TaskLoop>,
                }
            })
            .value()
            .clone()
    }
}

/// A container of nodes and nested subgraphs. Nodes are created through
/// the graph and live in the tree-wide arena for the lifetime of the
/// root; the graph carries a default (rank, device) location applied to
/// nodes created without explicit placement.
pub struct Graph {
    shared: Arc<GraphShared>,
    rank: usize,
    device: Device,
    local_name: String,
    pub(crate) cached_name: String,
    pub(crate) node_ids: Vec<NodeId>,
    pub(crate) subgraphs: Vec<Graph>,
}

impl Graph {
    pub(crate) fn new(shared: Arc<GraphShared>, rank: usize, device: Device, local_name: &str) -> Self {
        Self {
            shared,
            rank,
            device,
            local_name: local_name.to_string(),
            cached_name: local_name.to_string(),
            node_ids: Vec::new(),
            subgraphs: Vec::new(),
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Fully qualified name; meaningful once the root has prepared.
    pub fn name(&self) -> &str {
        &self.cached_name
    }

    pub(crate) fn shared(&self) -> &Arc<GraphShared> {
        &self.shared
    }

    /// Creates a data node at the graph's default location.
    pub fn create(&mut self, name: &str, size: Size) -> BlobRef {
        self.create_at(name, self.rank, self.device, size)
    }

    /// Creates a data node at an explicit (rank, device) location.
    pub fn create_at(&mut self, name: &str, rank: usize, device: Device, size: Size) -> BlobRef {
        let tensor = Tensor::new(rank, device, size);
        self.register_blob(name, tensor)
    }

    /// Creates a data node backed by an existing tensor. The node
    /// aliases the tensor's storage, which is how double-buffered
    /// runnables are stitched together.
    pub fn create_shared(&mut self, name: &str, tensor: &Tensor) -> BlobRef {
        self.register_blob(name, tensor.clone())
    }

    fn register_blob(&mut self, name: &str, tensor: Tensor) -> BlobRef {
        let rank = tensor.rank();
        let device = tensor.device();
        let slot = NodeSlot::new(NodeKind::Blob(BlobNode { tensor }), rank, device, name);
        let id = self
            .shared
            .arena
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(slot);
        self.node_ids.push(id);
        BlobRef {
            id,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Creates an operation node at the graph's default location. The
    /// wrapped `Operation` is constructed lazily at first fire, binding
    /// the tensors of the blobs connected by then.
    pub fn create_op<O: OpBuilder>(&mut self, name: &str, thread: &str, param: O::Param) -> OpRef {
        self.create_op_at::<O>(name, self.rank, self.device, thread, param)
    }

    pub fn create_op_at<O: OpBuilder>(
        &mut self,
        name: &str,
        rank: usize,
        device: Device,
        thread: &str,
        param: O::Param,
    ) -> OpRef {
        let build: OpBuild =
            Box::new(move |inputs, outputs| Box::new(O::build(inputs, outputs, param)));
        let slot = NodeSlot::new(
            NodeKind::Op(OpNode {
                thread: thread.to_string(),
                build: Mutex::new(Some(build)),
                operation: OnceLock::new(),
            }),
            rank,
            device,
            name,
        );
        let id = self
            .shared
            .arena
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(slot);
        self.node_ids.push(id);
        OpRef {
            id,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Creates a nested subgraph inheriting this graph's location.
    pub fn create_graph(&mut self, name: &str) -> &mut Graph {
        let rank = self.rank;
        let device = self.device;
        self.create_graph_at(name, rank, device)
    }

    pub fn create_graph_at(&mut self, name: &str, rank: usize, device: Device) -> &mut Graph {
        let graph = Graph::new(Arc::clone(&self.shared), rank, device, name);
        self.subgraphs.push(graph);
        self.subgraphs.last_mut().unwrap()
    }

    pub(crate) fn collect_ids(&self, out: &mut Vec<NodeId>) {
        out.extend(&self.node_ids);
        for subgraph in &self.subgraphs {
            subgraph.collect_ids(out);
        }
    }

    /// Every live node in this graph and its subgraphs.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        ids.retain(|&id| arena.contains(id));
        ids
    }

    /// Nodes with no inputs.
    pub fn sources(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        ids.retain(|&id| arena.contains(id) && arena.get(id).inputs.is_empty());
        ids
    }

    /// Nodes with no outputs.
    pub fn sinks(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        let arena = self.shared.arena.read().unwrap_or_else(|e| e.into_inner());
        ids.retain(|&id| arena.contains(id) && arena.get(id).outputs.is_empty());
        ids
    }

    /// Removes `seeds` and, transitively, every node no longer
    /// forward-reachable from the remaining sources. Nodes still
    /// reachable from a remaining source are unaffected.
    pub fn prune(&mut self, seeds: &[NodeId]) {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        let mut arena = self.shared.arena.write().unwrap_or_else(|e| e.into_inner());
        ids.retain(|&id| arena.contains(id));

        let seed_set: HashSet<NodeId> = seeds.iter().copied().collect();
        let roots: Vec<NodeId> = ids
            .iter()
            .copied()
            .filter(|&id| arena.get(id).inputs.is_empty() && !seed_set.contains(&id))
            .collect();
        for &seed in seeds {
            assert!(arena.contains(seed), "pruned node {:?} is not in the graph", seed);
            arena.remove(seed);
        }

        let mut reachable: HashSet<NodeId> = HashSet::new();
        let mut queue: Vec<NodeId> = roots;
        while let Some(id) = queue.pop() {
            if !arena.contains(id) || !reachable.insert(id) {
                continue;
            }
            queue.extend(&arena.get(id).outputs);
        }

        let mut removed = seeds.len();
        for id in ids {
            if arena.contains(id) && !reachable.contains(&id) {
                arena.remove(id);
                removed += 1;
            }
        }
        tracing::debug!(removed, "pruned graph nodes");
    }
}

impl Shr<OpRef> for Vec<BlobRef> {
    type Output = OpRef;

    /// Registers the left-hand blobs, in order, as inputs of the
    /// operation.
    fn shr(self, op: OpRef) -> OpRef {
        {
            let mut arena = op.shared.arena.write().unwrap_or_else(|e| e.into_inner());
            for blob in &self {
                assert!(
                    Arc::ptr_eq(&blob.shared, &op.shared),
                    "cannot connect nodes from different graph trees"
                );
                arena.link(blob.id, op.id);
            }
        }
        op
    }
}

impl Shr<Vec<BlobRef>> for OpRef {
    type Output = Vec<BlobRef>;

    /// Registers the right-hand blobs, in order, as outputs of the
    /// operation.
    fn shr(self, blobs: Vec<BlobRef>) -> Vec<BlobRef> {
        {
            let mut arena = self.shared.arena.write().unwrap_or_else(|e| e.into_inner());
            for blob in &blobs {
                assert!(
                    Arc::ptr_eq(&blob.shared, &self.shared),
                    "cannot connect nodes from different graph trees"
                );
                arena.link(self.id, blob.id);
            }
        }
        blobs
    }
}
