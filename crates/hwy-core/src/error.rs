//! Aggregated fatal-error tracking.
//!
//! Structural problems (unreadable inputs, malformed CSV rows, duplicate
//! roots, field-length overflows, …) do not abort the phase that finds them.
//! They accumulate here, and the driver inspects the list once parsing is
//! complete: a non-empty list aborts the run before any database output is
//! written.

use std::sync::Mutex;

/// Thread-safe collector of fatal errors.
///
/// Appends are mutex-protected because the parallel ingestion phase reports
/// errors from worker threads.  Each error is logged as it arrives so
/// progress output shows problems immediately.
#[derive(Default)]
pub struct ErrorList {
    inner: Mutex<Vec<String>>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (and log) one fatal error.
    pub fn add(&self, e: impl Into<String>) {
        let e = e.into();
        log::error!("{e}");
        self.inner.lock().unwrap().push(e);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// Consume the collector and return the errors in arrival order.
    pub fn into_vec(self) -> Vec<String> {
        self.inner.into_inner().unwrap()
    }

    /// Snapshot of the current errors.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.lock().unwrap().clone()
    }
}
