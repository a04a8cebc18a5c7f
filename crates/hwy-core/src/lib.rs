//! `hwy-core` — foundational types for the hwy data pipeline.
//!
//! This crate is a dependency of every other `hwy-*` crate.  It intentionally
//! has no `hwy-*` dependencies and minimal external ones (only `log`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `SystemId`, `RouteId`, `WaypointId`, `SegmentId`, …     |
//! | [`geo`]       | `GeoPoint`, route-adjusted haversine, chord angle       |
//! | [`fields`]    | `DbFieldLength` limits, UTF-8-safe truncation           |
//! | [`error`]     | `ErrorList` (aggregated fatal errors)                   |
//! | [`datacheck`] | `DatacheckCode`, `DatacheckEntry`, FP entry matching    |

pub mod datacheck;
pub mod error;
pub mod fields;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use datacheck::{DatacheckCode, DatacheckEntry, FpEntry};
pub use error::ErrorList;
pub use fields::DbFieldLength;
pub use geo::GeoPoint;
pub use ids::{
    ConRouteId, ConcId, EdgeId, GroupId, RouteId, SegmentId, SystemId, TravelerId, VertexId,
    WaypointId,
};
