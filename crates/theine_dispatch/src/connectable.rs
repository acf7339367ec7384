use crate::blob::BlobRef;
use crate::graph::Graph;

/// Contract for composite graph builders. A composite exposes a bottom
/// (input) and top (output) blob set; wiring the bottoms builds its
/// internal subgraph and yields the tops. Network definitions chain
/// composites by feeding one's top into the next's bottom.
pub trait Connectable {
    fn bottom(&self) -> &[BlobRef];

    fn top(&self) -> &[BlobRef];

    /// Pre-assigns the top set; `connect` fills these blobs instead of
    /// creating its own.
    fn set_top(&mut self, top: Vec<BlobRef>);

    /// Wires `bottom`, builds the composite's nodes inside `graph`, and
    /// returns the top set.
    fn connect(&mut self, graph: &mut Graph, bottom: Vec<BlobRef>) -> Vec<BlobRef>;
}
