use std::fmt;

/// Errors surfaced by the collaborator boundaries (buffer creation,
/// snapshot I/O). Structural invariant violations inside the dispatch
/// core do not use this channel; they abort the process.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    OutOfMemory,
    InvalidDevice(String),
    Unallocated,
    SnapshotSizeMismatch { expected: u64, got: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::OutOfMemory => write!(f, "Out of memory"),
            Self::InvalidDevice(msg) => write!(f, "Invalid device: {}", msg),
            Self::Unallocated => write!(f, "Tensor buffer is not allocated"),
            Self::SnapshotSizeMismatch { expected, got } => {
                write!(f, "Snapshot size mismatch: expected {} bytes, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
