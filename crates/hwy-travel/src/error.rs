//! Error types for hwy-travel.

use thiserror::Error;

/// Unexpected failures while processing travel lists.
///
/// Unparseable list lines are not errors — they become log notes in the
/// user's own log file and the line is skipped.
#[derive(Debug, Error)]
pub enum TravelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, TravelError>`.
pub type TravelResult<T> = Result<T, TravelError>;
