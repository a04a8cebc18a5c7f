//! Subgraph filtering.
//!
//! A subgraph is defined by any combination of region codes, systems, and a
//! geographic disk.  The vertex subset is the intersection of the selected
//! filter sets; an edge joins the subset only if both endpoints are
//! selected, its region and route systems pass the filters, and (for the
//! collapsed and traveled formats) the disk contains both endpoints.

use std::collections::BTreeSet;

use hwy_core::{EdgeId, SystemId, TravelerId, VertexId};
use hwy_model::HighwayData;
use hwy_spatial::WaypointQuadtree;

use crate::graph::HighwayGraph;
use crate::place::PlaceRadius;
use crate::vertex::Visibility;

/// What to include in a subgraph.  `None` filters are unrestricted.
#[derive(Default)]
pub struct SubgraphFilter {
    pub regions: Option<Vec<String>>,
    pub systems: Option<Vec<SystemId>>,
    pub placeradius: Option<PlaceRadius>,
}

/// A catalogue row describing one emitted graph file.
#[derive(Clone, Debug)]
pub struct GraphListEntry {
    pub filename: String,
    pub descr: String,
    pub vertices: usize,
    pub edges: usize,
    pub travelers: usize,
    pub format: &'static str,
    pub category: &'static str,
}

/// The matched subset for one subgraph: vertices, per-format edges, and
/// the travelers seen on traveled edges.
pub struct SubgraphMatch {
    pub vertices: BTreeSet<VertexId>,
    pub collapsed_vertex_count: usize,
    pub traveled_vertex_count: usize,
    pub simple_edges: BTreeSet<EdgeId>,
    pub collapsed_edges: BTreeSet<EdgeId>,
    pub traveled_edges: BTreeSet<EdgeId>,
    /// Travelers on the matched traveled edges, in name (= id) order.
    pub travelers: Vec<TravelerId>,
}

impl HighwayGraph {
    /// Compute the vertex and edge subsets matching `filter`.
    pub fn matching_vertices_and_edges(
        &self,
        data: &HighwayData,
        quadtree: &WaypointQuadtree,
        filter: &SubgraphFilter,
    ) -> SubgraphMatch {
        // vertex subset: intersection of the active filter sets
        let mut selected: Option<BTreeSet<VertexId>> = None;
        let mut intersect = |set: BTreeSet<VertexId>| {
            selected = Some(match selected.take() {
                None => set,
                Some(prev) => prev.intersection(&set).copied().collect(),
            });
        };
        if let Some(regions) = &filter.regions {
            let mut rvset = BTreeSet::new();
            for region in regions {
                if let Some(set) = self.region_vertices.get(region) {
                    rvset.extend(set.iter().copied());
                }
            }
            intersect(rvset);
        }
        if let Some(systems) = &filter.systems {
            let mut svset = BTreeSet::new();
            for &sys in systems {
                svset.extend(self.system_vertices[sys.index()].iter().copied());
            }
            intersect(svset);
        }
        if let Some(pr) = &filter.placeradius {
            intersect(pr.vertices(quadtree, self).into_iter().collect());
        }
        let vertices = selected
            .unwrap_or_else(|| (0..self.vertices.len()).map(|i| VertexId(i as u32)).collect());

        let mut m = SubgraphMatch {
            vertices,
            collapsed_vertex_count: 0,
            traveled_vertex_count: 0,
            simple_edges: BTreeSet::new(),
            collapsed_edges: BTreeSet::new(),
            traveled_edges: BTreeSet::new(),
            travelers: Vec::new(),
        };

        let edge_passes = |e: EdgeId| -> bool {
            let edge = self.edge(e);
            if let Some(regions) = &filter.regions {
                if !regions.contains(&data.route(data.segment(edge.segment).route).region) {
                    return false;
                }
            }
            if let Some(systems) = &filter.systems {
                if !edge
                    .route_names_and_systems
                    .iter()
                    .any(|(_, sys)| systems.contains(sys))
                {
                    return false;
                }
            }
            true
        };

        // subgraph closure: an edge joins only with both endpoints selected
        let closed = |v: VertexId, e: EdgeId| m.vertices.contains(&self.edge(e).other_endpoint(v));

        let mut travelers: BTreeSet<TravelerId> = BTreeSet::new();
        for &v in &m.vertices {
            let vertex = self.vertex(v);
            for &e in &vertex.incident_s {
                if closed(v, e) && edge_passes(e) {
                    m.simple_edges.insert(e);
                }
            }
            if vertex.visibility < Visibility::TraveledOnly {
                continue;
            }
            m.traveled_vertex_count += 1;
            for &e in &vertex.incident_t {
                let in_disk = filter
                    .placeradius
                    .as_ref()
                    .is_none_or(|pr| pr.contains_edge(self, e));
                if in_disk && closed(v, e) && edge_passes(e) {
                    m.traveled_edges.insert(e);
                    travelers
                        .extend(data.segment(self.edge(e).segment).clinched_by.iter().copied());
                }
            }
            if vertex.visibility < Visibility::Visible {
                continue;
            }
            m.collapsed_vertex_count += 1;
            for &e in &vertex.incident_c {
                let in_disk = filter
                    .placeradius
                    .as_ref()
                    .is_none_or(|pr| pr.contains_edge(self, e));
                if in_disk && closed(v, e) && edge_passes(e) {
                    m.collapsed_edges.insert(e);
                }
            }
        }

        // traveler ids were assigned in sorted-name order, so ascending id
        // order is name order
        m.travelers = travelers.into_iter().collect();
        m
    }
}
