//! Error types for hwy-datacheck.

use thiserror::Error;

/// Unexpected failures while loading the false-positive list.
#[derive(Debug, Error)]
pub enum DatacheckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, DatacheckError>`.
pub type DatacheckResult<T> = Result<T, DatacheckError>;
