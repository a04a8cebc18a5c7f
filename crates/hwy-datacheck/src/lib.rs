//! `hwy-datacheck` — structural checks over the loaded highway data.
//!
//! [`rules`] walks every route and emits [`hwy_core::DatacheckEntry`] values
//! for label-form violations, suspicious geometry, and convention breaches.
//! [`fps`] loads the maintainer's false-positive list, suppresses matching
//! emissions, and reports near-matches and leftovers for maintenance.
//!
//! Other phases contribute entries of their own (the wpt parser's
//! `MALFORMED_*`, the connectivity check's `DISCONNECTED_ROUTE`, the graph
//! builder's hidden-vertex checks); this crate owns the per-route rule pass
//! and the false-positive machinery.

pub mod error;
pub mod fps;
pub mod rules;

#[cfg(test)]
mod tests;

pub use error::{DatacheckError, DatacheckResult};
pub use fps::{FpMatchReport, mark_false_positives, read_datacheck_fps};
pub use rules::run_datachecks;
