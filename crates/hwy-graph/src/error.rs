//! Error types for hwy-graph.

use thiserror::Error;

/// Failures while writing graph files.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, GraphError>`.
pub type GraphResult<T> = Result<T, GraphError>;
