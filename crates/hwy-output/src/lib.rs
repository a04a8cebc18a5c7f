//! `hwy-output` — everything the pipeline writes besides the graph files.
//!
//! | Module    | Files                                                        |
//! |-----------|--------------------------------------------------------------|
//! | [`logs`]  | maintenance logs: stats, in-use pools, datacheck, FP reports |
//! | [`nmp`]   | near-miss point log, `tm-master.nmp`, merged `.wpt` rewrite  |
//! | [`stats`] | per-traveler regional mileage CSVs                           |
//! | [`users`] | per-traveler stats log entries and `users/<name>.log`        |
//! | [`sql`]   | the textual SQL dump, tables in foreign-key-safe order       |

pub mod error;
pub mod logs;
pub mod nmp;
pub mod sql;
pub mod stats;
pub mod users;

#[cfg(test)]
mod tests;

pub use error::{OutputError, OutputResult};
pub use sql::GraphType;
pub use users::ClinchedTables;
