//! `hwy-graph` — graph representations of the highway data.
//!
//! From the loaded corpus this crate builds one vertex set (canonical
//! representatives of waypoint locations touched by active-or-preview
//! systems, each with a unique synthesized name) carrying three coordinated
//! incidence structures:
//!
//! - **simple** — one edge per physical segment;
//! - **collapsed** — hidden degree-2 vertices absorbed into multi-point
//!   edges as shaping points;
//! - **traveled** — like collapsed, but a hidden vertex only disappears
//!   when both incident edges have identical clinched-by sets; traveled
//!   edges carry a clinched-traveler bitmask.
//!
//! [`tmg`] writes the master graph files and [`subgraph`] emits filtered
//! subsets by region, system, and geographic disk.

pub mod edge;
pub mod error;
pub mod graph;
pub mod naming;
pub mod place;
pub mod subgraph;
pub mod tmg;
pub mod vertex;

#[cfg(test)]
mod tests;

pub use edge::HGEdge;
pub use error::{GraphError, GraphResult};
pub use graph::{GraphBuild, HighwayGraph};
pub use place::PlaceRadius;
pub use subgraph::{GraphListEntry, SubgraphFilter};
pub use vertex::{HGVertex, Visibility};
