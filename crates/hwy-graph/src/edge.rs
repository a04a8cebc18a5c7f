//! Graph edges.
//!
//! There is no class hierarchy for the three formats: one edge record
//! carries three independent incidence memberships and three independent
//! written flags, so a single vertex traversal can emit all three file
//! formats in one pass.

use hwy_core::{SegmentId, SystemId, VertexId};

/// One edge of the highway graph.
///
/// Constructed either directly from a canonical highway segment, or by
/// collapsing the two edges around a hidden degree-2 vertex, which then
/// becomes an intermediate shaping point.
#[derive(Clone, Debug)]
pub struct HGEdge {
    /// Comma-joined list-entry names of the concurrent routes.
    pub segment_name: String,
    pub vertex1: VertexId,
    pub vertex2: VertexId,
    /// Canonical segment: the reference for region and clinched-by data.
    /// Each edge lives within one region; a multi-point edge cannot span
    /// regions because a region border requires a visible waypoint.
    pub segment: SegmentId,
    /// Route list-entry name and system for every non-devel concurrent
    /// route on this edge.
    pub route_names_and_systems: Vec<(String, SystemId)>,
    /// Shaping points absorbed from collapsed hidden vertices, ordered
    /// from `vertex1` to `vertex2`.
    pub intermediate_points: Vec<VertexId>,
    pub s_written: bool,
    pub c_written: bool,
    pub t_written: bool,
}

impl HGEdge {
    /// The edge label, optionally restricted to a set of systems.
    pub fn label(&self, systems: Option<&[SystemId]>) -> String {
        let mut label = String::new();
        for (name, system) in &self.route_names_and_systems {
            if systems.is_some_and(|set| !set.contains(system)) {
                continue;
            }
            if !label.is_empty() {
                label.push(',');
            }
            label.push_str(name);
        }
        label
    }

    /// The endpoint that is not `v`.
    pub fn other_endpoint(&self, v: VertexId) -> VertexId {
        if self.vertex1 == v { self.vertex2 } else { self.vertex1 }
    }
}
