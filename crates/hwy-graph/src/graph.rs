//! Graph construction: vertices, edges, and hidden-vertex collapse.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use hwy_core::{DatacheckCode, DatacheckEntry, EdgeId, SegmentId, VertexId, WaypointId};
use hwy_model::HighwayData;
use hwy_spatial::WaypointQuadtree;

use crate::edge::HGEdge;
use crate::naming::{canonical_waypoint_name, simple_waypoint_name};
use crate::vertex::{HGVertex, Visibility};

/// The assembled graph: one vertex per qualifying waypoint location, three
/// incidence structures, and the filter indexes used by subgraph emission.
pub struct HighwayGraph {
    pub vertices: Vec<HGVertex>,
    pub edges: Vec<HGEdge>,
    /// Canonical waypoint → vertex.
    pub vertex_of_waypoint: FxHashMap<WaypointId, VertexId>,
    /// Region code → vertices with a member route in that region.
    pub region_vertices: BTreeMap<String, BTreeSet<VertexId>>,
    /// Per-system vertex sets, indexed by `SystemId`.
    pub system_vertices: Vec<BTreeSet<VertexId>>,
}

/// Result of [`HighwayGraph::build`]: the graph plus its side outputs.
pub struct GraphBuild {
    pub graph: HighwayGraph,
    /// Lines for `waypointsimplification.log`.
    pub naming_log: Vec<String>,
    /// `VISIBLE_HIDDEN_COLOC`, `HIDDEN_TERMINUS`, `HIDDEN_JUNCTION`.
    pub datachecks: Vec<DatacheckEntry>,
}

impl HighwayGraph {
    #[inline]
    pub fn vertex(&self, v: VertexId) -> &HGVertex {
        &self.vertices[v.index()]
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> &HGEdge {
        &self.edges[e.index()]
    }

    /// Build the graph over all waypoints in quadtree traversal order.
    ///
    /// The quadtree must already be sorted; vertex numbering (and therefore
    /// all emitted files) is deterministic given the sorted traversal.
    pub fn build(data: &HighwayData, quadtree: &WaypointQuadtree) -> GraphBuild {
        log::info!("Creating unique names and vertices");
        let mut build = GraphBuild {
            graph: HighwayGraph {
                vertices: Vec::new(),
                edges: Vec::new(),
                vertex_of_waypoint: FxHashMap::default(),
                region_vertices: BTreeMap::new(),
                system_vertices: vec![BTreeSet::new(); data.systems.len()],
            },
            naming_log: Vec::new(),
            datachecks: Vec::new(),
        };

        // Graph-worthy points in traversal order, split by naming priority:
        // simple 2-route intersections (no abbrevs) get first pick of the
        // short names.
        let mut hi_priority: Vec<(WaypointId, Vec<WaypointId>)> = Vec::new();
        let mut lo_priority: Vec<(WaypointId, Vec<WaypointId>)> = Vec::new();
        for w in quadtree.point_list() {
            if !data.is_or_colocated_with_active_or_preview(w) {
                continue;
            }
            if data.canonical_waypoint(w) != w {
                continue;
            }
            let ap_coloc: Vec<WaypointId> = match data.coloc_group(w) {
                None => vec![w],
                Some(group) => group
                    .iter()
                    .copied()
                    .filter(|&p| data.route_system(data.waypoint(p).route).active_or_preview())
                    .collect(),
            };
            let hi = ap_coloc.len() == 2
                && ap_coloc
                    .iter()
                    .all(|&p| data.route(data.waypoint(p).route).abbrev.is_empty());
            if hi {
                hi_priority.push((w, ap_coloc));
            } else {
                lo_priority.push((w, ap_coloc));
            }
        }

        let mut vertex_names: FxHashSet<String> = FxHashSet::default();
        for (w, ap_coloc) in hi_priority.into_iter().chain(lo_priority) {
            build.add_vertex(data, w, &ap_coloc, &mut vertex_names);
        }

        log::info!("Creating edges");
        build.create_edges(data);

        log::info!("Compressing collapsed edges");
        build.collapse_hidden_vertices(data);

        build
    }

    // ── Emission-side counters ────────────────────────────────────────────

    /// (simple, collapsed, traveled) vertex counts for the master graphs.
    pub fn vertex_counts(&self) -> (usize, usize, usize) {
        let mut cv = 0;
        let mut tv = 0;
        for v in &self.vertices {
            if v.visibility >= Visibility::TraveledOnly {
                tv += 1;
                if v.visibility == Visibility::Visible {
                    cv += 1;
                }
            }
        }
        (self.vertices.len(), cv, tv)
    }

    /// (simple, collapsed, traveled) edge counts: each edge appears in two
    /// incidence lists.
    pub fn edge_counts(&self) -> (usize, usize, usize) {
        let mut se = 0;
        let mut ce = 0;
        let mut te = 0;
        for v in &self.vertices {
            se += v.incident_s.len();
            if v.visibility >= Visibility::TraveledOnly {
                te += v.incident_t.len();
                if v.visibility == Visibility::Visible {
                    ce += v.incident_c.len();
                }
            }
        }
        (se / 2, ce / 2, te / 2)
    }
}

impl GraphBuild {
    fn add_vertex(
        &mut self,
        data: &HighwayData,
        w: WaypointId,
        ap_coloc: &[WaypointId],
        vertex_names: &mut FxHashSet<String>,
    ) {
        // name synthesis with conflict resolution
        let mut point_name =
            canonical_waypoint_name(data, w, ap_coloc, vertex_names, &mut self.naming_log);
        if vertex_names.contains(&point_name) {
            point_name.push('|');
            point_name.push_str(&data.route(data.waypoint(w).route).region);
            self.naming_log.push(format!("Appended region: {point_name}"));
        }
        if vertex_names.contains(&point_name) {
            let simple = simple_waypoint_name(data, w);
            if !vertex_names.contains(&simple) {
                self.naming_log
                    .push(format!("Revert to simple: {simple} from (taken) {point_name}"));
                point_name = simple;
            }
        }
        while vertex_names.contains(&point_name) {
            point_name.push('!');
            self.naming_log.push(format!("Appended !: {point_name}"));
        }
        vertex_names.insert(point_name.clone());

        // hidden iff every colocated waypoint is hidden
        let group: &[WaypointId] = match data.coloc_group(w) {
            None => std::slice::from_ref(&w),
            Some(group) => group,
        };
        let visibility = if group.iter().all(|&p| data.waypoint(p).is_hidden) {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };

        let v = VertexId(self.graph.vertices.len() as u32);
        self.graph
            .vertices
            .push(HGVertex::new(w, data.waypoint(w).point, point_name, visibility));
        self.graph.vertex_of_waypoint.insert(w, v);

        for &p in group {
            let route = data.route(data.waypoint(p).route);
            self.graph
                .region_vertices
                .entry(route.region.clone())
                .or_default()
                .insert(v);
            self.graph.system_vertices[route.system.index()].insert(v);
        }

        // mixed hidden/visible colocation is worth a datacheck
        if group.len() > 1 && group.iter().any(|&p| data.waypoint(p).is_hidden != data.waypoint(group[0]).is_hidden)
        {
            let visible = group.iter().find(|&&p| !data.waypoint(p).is_hidden).unwrap();
            let hidden = group.iter().find(|&&p| data.waypoint(p).is_hidden).unwrap();
            self.datachecks.push(DatacheckEntry::new(
                &data.route(data.waypoint(*visible).route).root,
                &[&data.waypoint(*visible).label],
                DatacheckCode::VisibleHiddenColoc,
                format!(
                    "{}@{}",
                    data.route(data.waypoint(*hidden).route).root,
                    data.waypoint(*hidden).label
                ),
            ));
        }
    }

    /// One edge per canonical segment of every active-or-preview system.
    fn create_edges(&mut self, data: &HighwayData) {
        for system in &data.systems {
            if !system.active_or_preview() {
                continue;
            }
            for &r in &system.routes {
                for &s in &data.route(r).segments {
                    let canonical = match data.concurrency(s) {
                        None => true,
                        Some(members) => members[0] == s,
                    };
                    if canonical {
                        self.add_segment_edge(data, s);
                    }
                }
            }
        }
    }

    fn add_segment_edge(&mut self, data: &HighwayData, s: SegmentId) {
        let seg = data.segment(s);
        let v1 = self.graph.vertex_of_waypoint[&data.canonical_waypoint(seg.waypoint1)];
        let v2 = self.graph.vertex_of_waypoint[&data.canonical_waypoint(seg.waypoint2)];

        // the unusual case of an edge already present as its own reverse
        let reversed_exists = |v: VertexId| {
            self.graph.vertices[v.index()]
                .incident_s
                .iter()
                .any(|&e| self.graph.edges[e.index()].vertex1 == v2 && self.graph.edges[e.index()].vertex2 == v1)
        };
        if reversed_exists(v1) || reversed_exists(v2) {
            return;
        }

        let mut route_names_and_systems = Vec::new();
        match data.concurrency(s) {
            None => {
                let route = data.route(seg.route);
                route_names_and_systems.push((route.list_entry_name(), route.system));
            }
            Some(members) => {
                for &cs in members {
                    let route = data.route(data.segment(cs).route);
                    if data.system(route.system).devel() {
                        continue;
                    }
                    route_names_and_systems.push((route.list_entry_name(), route.system));
                }
            }
        }

        let e = EdgeId(self.graph.edges.len() as u32);
        self.graph.edges.push(HGEdge {
            segment_name: data.segment_name(s),
            vertex1: v1,
            vertex2: v2,
            segment: s,
            route_names_and_systems,
            intermediate_points: Vec::new(),
            s_written: false,
            c_written: false,
            t_written: false,
        });
        for v in [v1, v2] {
            let vertex = &mut self.graph.vertices[v.index()];
            vertex.incident_s.push(e);
            vertex.incident_c.push(e);
            vertex.incident_t.push(e);
        }
    }

    /// Absorb hidden degree-2 vertices into multi-point edges.
    fn collapse_hidden_vertices(&mut self, data: &HighwayData) {
        for v_idx in 0..self.graph.vertices.len() {
            let v = VertexId(v_idx as u32);
            if self.graph.vertices[v_idx].visibility != Visibility::Hidden {
                continue;
            }
            let degree = self.graph.vertices[v_idx].incident_c.len();
            let canonical = data.canonical_waypoint(self.graph.vertices[v_idx].waypoint);
            if degree < 2 {
                // an isolated hidden endpoint has nothing to collapse into
                self.graph.vertices[v_idx].visibility = Visibility::Visible;
                self.datachecks.push(DatacheckEntry::new(
                    &data.route(data.waypoint(canonical).route).root,
                    &[&data.waypoint(canonical).label],
                    DatacheckCode::HiddenTerminus,
                    "",
                ));
                continue;
            }
            if degree > 2 {
                self.datachecks.push(DatacheckEntry::new(
                    &data.route(data.waypoint(canonical).route).root,
                    &[&data.waypoint(canonical).label],
                    DatacheckCode::HiddenJunction,
                    degree.to_string(),
                ));
                self.graph.vertices[v_idx].visibility = Visibility::Visible;
                continue;
            }

            // the traveled graph may only collapse when both incident edges
            // carry identical traveler sets
            let t_edges = (self.graph.vertices[v_idx].incident_t[0], self.graph.vertices[v_idx].incident_t[1]);
            let clinched_equal = {
                let s1 = &data.segment(self.graph.edges[t_edges.0.index()].segment).clinched_by;
                let s2 = &data.segment(self.graph.edges[t_edges.1.index()].segment).clinched_by;
                s1 == s2
            };
            if !clinched_equal {
                self.graph.vertices[v_idx].visibility = Visibility::TraveledOnly;
                self.collapse_at(v, 0b01);
            } else {
                let c_edges = (self.graph.vertices[v_idx].incident_c[0], self.graph.vertices[v_idx].incident_c[1]);
                if (c_edges.0 == t_edges.0 && c_edges.1 == t_edges.1)
                    || (c_edges.0 == t_edges.1 && c_edges.1 == t_edges.0)
                {
                    self.collapse_at(v, 0b11);
                } else {
                    self.collapse_at(v, 0b01);
                    self.collapse_at(v, 0b10);
                }
            }
        }
    }

    /// Merge the two edges incident to hidden vertex `v` into one edge with
    /// `v` as a shaping point, in the collapsed (`0b01`) and/or traveled
    /// (`0b10`) structures.
    fn collapse_at(&mut self, v: VertexId, fmt_mask: u8) {
        let (edge1, edge2) = if fmt_mask & 0b10 != 0 {
            let t = &self.graph.vertices[v.index()].incident_t;
            (t[0], t[1])
        } else {
            let c = &self.graph.vertices[v.index()].incident_c;
            (c[0], c[1])
        };

        let e1 = self.graph.edges[edge1.index()].clone();
        let e2 = self.graph.edges[edge2.index()].clone();
        if e1.segment_name != e2.segment_name {
            // routes should not start or end, nor concurrencies change, at
            // a hidden point
            log::warn!(
                "segment name mismatch collapsing at {}: {} vs {}",
                self.graph.vertices[v.index()].unique_name,
                e1.segment_name,
                e2.segment_name
            );
        }

        let mut intermediate_points = e1.intermediate_points.clone();
        let vertex1 = if e1.vertex1 == v {
            intermediate_points.reverse();
            e1.vertex2
        } else {
            e1.vertex1
        };
        intermediate_points.push(v);
        let mut tail = e2.intermediate_points.clone();
        let vertex2 = if e2.vertex1 == v {
            e2.vertex2
        } else {
            tail.reverse();
            e2.vertex1
        };
        intermediate_points.extend(tail);

        let e = EdgeId(self.graph.edges.len() as u32);
        self.graph.edges.push(HGEdge {
            segment_name: e1.segment_name.clone(),
            vertex1,
            vertex2,
            segment: e1.segment,
            route_names_and_systems: e1.route_names_and_systems.clone(),
            intermediate_points,
            s_written: false,
            c_written: false,
            t_written: false,
        });

        // swap the replaced edges out of the endpoints' incidence lists for
        // every format this collapse covers
        for bit in [0b01u8, 0b10u8] {
            if fmt_mask & bit == 0 {
                continue;
            }
            for old in [edge1, edge2] {
                let mut removed = 0;
                for endpoint in [vertex1, vertex2] {
                    let list = if bit == 0b10 {
                        &mut self.graph.vertices[endpoint.index()].incident_t
                    } else {
                        &mut self.graph.vertices[endpoint.index()].incident_c
                    };
                    if let Some(pos) = list.iter().position(|&x| x == old) {
                        list.remove(pos);
                        removed += 1;
                    }
                }
                if removed != 1 {
                    log::warn!(
                        "collapsed edge removed from {removed} adjacency lists instead of 1 at {}",
                        self.graph.vertices[v.index()].unique_name
                    );
                }
            }
            for endpoint in [vertex1, vertex2] {
                let list = if bit == 0b10 {
                    &mut self.graph.vertices[endpoint.index()].incident_t
                } else {
                    &mut self.graph.vertices[endpoint.index()].incident_c
                };
                list.push(e);
            }
        }
    }
}
