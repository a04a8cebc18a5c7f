//! `hwy-model` — the highway data model.
//!
//! Every entity is owned by an arena `Vec` inside [`HighwayData`] and
//! addressed by a typed index from `hwy-core`.  Colocation groups and
//! concurrency lists — the relationships that would otherwise form reference
//! cycles — are small `Vec<Id>` arenas of their own, with the canonical
//! member at index 0.
//!
//! Traveler lists live *outside* [`HighwayData`]: resolution and mileage
//! aggregation need `&mut [TravelerList]` and `&mut HighwayData`
//! simultaneously, which the borrow checker only allows if the two are
//! separate values.

pub mod conroute;
pub mod registry;
pub mod route;
pub mod segment;
pub mod store;
pub mod system;
pub mod traveler;
pub mod update;
pub mod waypoint;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use conroute::ConnectedRoute;
pub use registry::RouteRegistry;
pub use route::{Route, canonical_label};
pub use segment::HighwaySegment;
pub use store::HighwayData;
pub use system::{HighwaySystem, SystemLevel};
pub use traveler::{ListUpdate, TravelerList};
pub use update::{SystemUpdate, UpdateRecord};
pub use waypoint::Waypoint;
