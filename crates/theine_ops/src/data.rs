//! Helpers for cyclic traversal of fixed-length datasets.

/// A position in a dataset of `len` records that wraps around at the
/// end, so epochs chain without a reset step.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    len: usize,
    pos: usize,
}

impl Cursor {
    pub fn new(len: usize, offset: usize) -> Self {
        assert!(len > 0, "cursor over an empty dataset");
        Self { len, pos: offset % len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves forward `count` records, wrapping, and returns the position
    /// before the move.
    pub fn advance(&mut self, count: usize) -> usize {
        let start = self.pos;
        self.pos = (self.pos + count) % self.len;
        start
    }

    pub fn seek(&mut self, position: usize) {
        self.pos = position % self.len;
    }
}
