//! `hwy-spatial` — geographic indexing for the hwy data pipeline.
//!
//! One structure lives here: [`WaypointQuadtree`], a point-region quadtree
//! over every waypoint in the corpus.  It answers the two queries that drive
//! route-graph assembly:
//!
//! - **colocation** — is there already a waypoint at these exact
//!   coordinates? (drives colocation-group formation)
//! - **near-miss** — which waypoints sit within a small tolerance but not at
//!   the same point? (drives the NMP maintenance logs)
//!
//! The tree itself stores only `(WaypointId, GeoPoint)` pairs; ownership of
//! waypoint data stays with the model store, so the index can be dropped or
//! rebuilt freely.

pub mod quadtree;


pub use quadtree::WaypointQuadtree;
