//! Error types for hwy-ingest.

use thiserror::Error;

/// Unexpected failures during ingestion.
///
/// Data-level problems (missing files, malformed rows, length overflows)
/// are *not* errors here — they feed the aggregated `ErrorList` or the
/// datacheck list and ingestion continues.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, IngestError>`.
pub type IngestResult<T> = Result<T, IngestError>;
