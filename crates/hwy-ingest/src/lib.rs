//! `hwy-ingest` — reads the highway data corpus into the model store.
//!
//! Ingestion runs in three stages:
//!
//! 1. [`descriptors`] — continents, countries, regions, and the update
//!    history files (sequential).
//! 2. [`systems`] — `systems.csv` plus each system's route and
//!    connected-route CSVs, populating the [`RouteRegistry`] lookup tables
//!    (sequential).
//! 3. [`load`] — every route's `.wpt` file, distributed over a Rayon worker
//!    pool with the shared waypoint index behind one mutex (parallel), then
//!    the sequential [`labels`] pass: connectivity checking and label-hash
//!    construction.
//!
//! Recoverable data problems go to the shared `ErrorList` (fatal in
//! aggregate) or come back as datacheck entries, exactly one of the two; an
//! `Err` from this crate means an unexpected I/O failure mid-read.

pub mod descriptors;
pub mod error;
pub mod graph_directives;
pub mod labels;
pub mod load;
pub mod systems;
pub mod wpt;


pub use descriptors::{Continent, Country, Descriptors, Region};
pub use error::{IngestError, IngestResult};
pub use load::{IngestReport, WaypointIndex, read_all_wpt_files};
