use crate::graph::{Graph, GraphShared};
use crate::loops::TaskLoop;
use crate::node::{self, Arena, NodeId, NodeSlot};
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use theine_core::context::current_rank;
use theine_core::device::Device;

/// The execution engine: a root graph plus cached execution state. One
/// round is `run_async()` (fire every source) followed by `sync()`
/// (wait for every sink); `run()` does both.
pub struct Runnable {
    graph: Graph,
    prepared: bool,
    cached_sources: Vec<NodeId>,
    cached_sinks: Vec<NodeId>,
}

impl Deref for Runnable {
    type Target = Graph;

    fn deref(&self) -> &Graph {
        &self.graph
    }
}

impl DerefMut for Runnable {
    fn deref_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }
}

impl Runnable {
    pub fn new(rank: usize, device: Device) -> Self {
        let shared = Arc::new(GraphShared::new());
        Self {
            graph: Graph::new(shared, rank, device, ""),
            prepared: false,
            cached_sources: Vec::new(),
            cached_sinks: Vec::new(),
        }
    }

    /// One-time pass before the first run: walks the nested subgraphs
    /// breadth-first assigning every graph and node its fully qualified
    /// name (root-to-node path joined with `::`), then caches the source
    /// and sink lists restricted to nodes local to this rank. Idempotent
    /// until the graph is mutated through `prune`.
    pub fn prepare_once(&mut self) {
        if self.prepared {
            return;
        }
        self.prepared = true;
        let shared = Arc::clone(self.graph.shared());
        {
            let mut arena = shared.arena.write().unwrap_or_else(|e| e.into_inner());
            assign_names(&mut self.graph, "", &mut arena);
        }

        self.cached_sources = self.sources();
        self.cached_sinks = self.sinks();
        tracing::debug!(
            sources = self.cached_sources.len(),
            sinks = self.cached_sinks.len(),
            "prepared graph"
        );
    }

    /// Live nodes local to this process's rank. A runnable executes only
    /// its local slice of the graph, so its node queries hide remote-rank
    /// nodes; `Graph::nodes` remains the unfiltered scan.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.local_ids(|_| true)
    }

    /// Rank-local nodes with no inputs; exactly what `run_async` fires.
    pub fn sources(&self) -> Vec<NodeId> {
        self.local_ids(|slot| slot.inputs.is_empty())
    }

    /// Rank-local nodes with no outputs; exactly what `sync` waits for.
    pub fn sinks(&self) -> Vec<NodeId> {
        self.local_ids(|slot| slot.outputs.is_empty())
    }

    fn local_ids<F>(&self, keep: F) -> Vec<NodeId>
    where
        F: Fn(&NodeSlot) -> bool,
    {
        let local = current_rank();
        let mut ids = Vec::new();
        self.graph.collect_ids(&mut ids);
        let arena = self
            .graph
            .shared()
            .arena
            .read()
            .unwrap_or_else(|e| e.into_inner());
        ids.retain(|&id| {
            arena.contains(id) && {
                let slot = arena.get(id);
                slot.rank == local && keep(slot)
            }
        });
        ids
    }

    /// Seeds one activation round: fires every cached source. Sources
    /// have no inputs, so they execute unconditionally each round; the
    /// cascade from there follows the dependency counters. Sequencing
    /// between independently-scheduled runnables stays with the caller.
    pub fn run_async(&mut self) {
        self.prepare_once();
        let shared = Arc::clone(self.graph.shared());
        let arena = shared.arena.read().unwrap_or_else(|e| e.into_inner());
        for &source in &self.cached_sources {
            node::compute(&shared, &arena, source);
        }
    }

    /// Blocks until every local sink has fired for the round, then
    /// resets the sink counter. The barrier callers rely on before
    /// reading outputs or feeding fresh inputs via `swap_memory`.
    pub fn sync(&self) {
        self.graph.shared().sink_counter.wait(self.cached_sinks.len());
    }

    pub fn run(&mut self) {
        self.run_async();
        self.sync();
    }

    /// The execution context for a (device, thread) key, created on
    /// first use.
    pub fn task_loop(&self, device: Device, thread: &str) -> Arc<dyn TaskLoop> {
        self.graph.shared().task_loop(device, thread)
    }

    /// Removes nodes through the root, invalidating the cached
    /// preparation so the next run re-prepares.
    pub fn prune(&mut self, seeds: &[NodeId]) {
        self.graph.prune(seeds);
        self.prepared = false;
    }

    /// Human-readable chain decomposition for diagnostics: walks from
    /// the sources along output edges, emitting maximal straight-line
    /// chains that stop at branch or join points.
    pub fn print(&mut self) -> Vec<Vec<String>> {
        self.prepare_once();
        let shared = Arc::clone(self.graph.shared());
        let arena = shared.arena.read().unwrap_or_else(|e| e.into_inner());
        let mut stack: Vec<Vec<NodeId>> = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut chains: Vec<Vec<String>> = Vec::new();
        for &source in &self.cached_sources {
            stack.push(vec![source]);
            visited.insert(source);
        }
        while let Some(mut chain) = stack.pop() {
            let end = *chain.last().unwrap();
            let outputs = arena.get(end).outputs.clone();
            if outputs.iter().all(|n| visited.contains(n)) {
                if let Some(&first) = outputs.first() {
                    chain.push(first);
                }
                chains.push(chain.iter().map(|&n| label(arena.get(n))).collect());
            } else {
                for &output in &outputs {
                    if visited.insert(output) {
                        if !chain.is_empty() {
                            chain.push(output);
                            stack.push(std::mem::take(&mut chain));
                        } else {
                            stack.push(vec![end, output]);
                        }
                    }
                }
            }
        }
        chains
    }
}

fn assign_names(graph: &mut Graph, prefix: &str, arena: &mut Arena) {
    for &id in &graph.node_ids {
        if !arena.contains(id) {
            continue;
        }
        let slot = arena.get_mut(id);
        slot.cached_name = join_name(prefix, &slot.local_name);
    }
    for subgraph in &mut graph.subgraphs {
        subgraph.cached_name = join_name(prefix, subgraph.local_name());
        let path = subgraph.cached_name.clone();
        assign_names(subgraph, &path, arena);
    }
}

fn join_name(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}::{}", prefix, local)
    }
}

fn label(slot: &NodeSlot) -> String {
    // cyan for data nodes, red for ops
    let color = if slot.is_blob() { "\x1b[1;36m" } else { "\x1b[1;31m" };
    format!(
        "{}{}[{}][{}]\x1b[0m",
        color,
        slot.cached_name,
        slot.rank,
        slot.device.name()
    )
}

/// Renders `print()` output as one line per chain, links drawn with
/// `-->`.
pub fn render(chains: &[Vec<String>]) -> String {
    chains
        .iter()
        .map(|chain| chain.join(" --> "))
        .collect::<Vec<_>>()
        .join("\n")
}
