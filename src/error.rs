//! Error types for the crate.

use thiserror::Error;

/// Errors surfaced by loading, construction, and query operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input data is structurally unusable: missing required columns,
    /// ragged feature rows, row-count mismatches between metadata and
    /// matrices, or a similarity matrix that cannot be recovered to square.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A caller-supplied argument is out of range: node id outside the
    /// document range, zero `k`, or a cluster count that is zero or not
    /// smaller than the document count.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An underlying I/O error while reading or writing matrix files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV parsing or encoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
