//! Unit tests for graph construction, naming, collapse, and emission.

#[cfg(test)]
pub(crate) mod fixtures {
    use hwy_core::{GeoPoint, RouteId, SegmentId, SystemId, WaypointId};
    use hwy_ingest::WaypointIndex;
    use hwy_model::{canonical_label, HighwayData, HighwaySegment, HighwaySystem, Route, SystemLevel, Waypoint};
    use hwy_spatial::WaypointQuadtree;

    /// Builds a corpus through the real waypoint index so colocation groups
    /// and the quadtree match production wiring.
    pub struct GraphWorld {
        pub data: HighwayData,
        index: WaypointIndex,
    }

    impl GraphWorld {
        pub fn new() -> Self {
            Self { data: HighwayData::new(), index: WaypointIndex::new() }
        }

        pub fn add_system(&mut self, name: &str, level: SystemLevel) -> SystemId {
            let id = SystemId(self.data.systems.len() as u16);
            self.data.systems.push(HighwaySystem::new(
                name.into(),
                "USA".into(),
                format!("{name} full"),
                "blue".into(),
                1,
                level,
            ));
            id
        }

        pub fn add_route(
            &mut self,
            sys: SystemId,
            region: &str,
            name: &str,
            abbrev: &str,
            root: &str,
            points: &[(&str, f64, f64)],
        ) -> RouteId {
            let r = RouteId(self.data.routes.len() as u32);
            let mut route = Route {
                system: sys,
                region: region.into(),
                route: name.into(),
                abbrev: abbrev.into(),
                root: root.into(),
                root_order: -1,
                ..Default::default()
            };
            for (i, &(label, lat, lng)) in points.iter().enumerate() {
                let w = self.index.insert(Waypoint::new(
                    label.into(),
                    Vec::new(),
                    GeoPoint::new(lat, lng),
                    r,
                ));
                route.pri_label_hash.insert(canonical_label(label), i);
                route.points.push(w);
            }
            self.data.routes.push(route);
            self.data.systems[sys.index()].routes.push(r);
            r
        }

        /// Build segments, move the index into the store, and sort.
        pub fn finish(mut self) -> (HighwayData, WaypointQuadtree) {
            self.data.waypoints = std::mem::take(&mut self.index.waypoints);
            self.data.coloc_groups = std::mem::take(&mut self.index.coloc_groups);
            for r_idx in 0..self.data.routes.len() {
                let points = self.data.routes[r_idx].points.clone();
                for pair in points.windows(2) {
                    let (w1, w2) = (pair[0], pair[1]);
                    let length = self.data.waypoints[w1.index()]
                        .point
                        .distance_mi(self.data.waypoints[w2.index()].point);
                    let s = SegmentId(self.data.segments.len() as u32);
                    self.data
                        .segments
                        .push(HighwaySegment::new(w1, w2, RouteId(r_idx as u32), length));
                    self.data.routes[r_idx].segments.push(s);
                }
            }
            let keys: Vec<String> = self
                .data
                .waypoints
                .iter()
                .map(|w| format!("{}@{}", self.data.routes[w.route.index()].root, w.label))
                .collect();
            let mut qt = self.index.quadtree;
            qt.sort_points(&|w: WaypointId| keys[w.index()].clone());
            for group in &mut self.data.coloc_groups {
                group.sort_by(|a, b| keys[a.index()].cmp(&keys[b.index()]));
            }
            (self.data, qt)
        }
    }
}

#[cfg(test)]
mod build {
    use hwy_model::SystemLevel;

    use super::fixtures::GraphWorld;
    use crate::graph::HighwayGraph;

    #[test]
    fn two_routes_colocating_at_one_point() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[
            ("X1", 0.0, 0.0),
            ("X2", 1.0, 1.0),
            ("X3", 2.0, 2.0),
        ]);
        w.add_route(sys, "NY", "B", "", "ny.b", &[
            ("Y1", 0.5, 0.5),
            ("Y2", 1.0, 1.0),
            ("Y3", 1.5, 1.5),
        ]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        let (sv, _, _) = build.graph.vertex_counts();
        let (se, _, _) = build.graph.edge_counts();
        assert_eq!(sv, 5);
        assert_eq!(se, 4);
        assert!(data.concurrencies.is_empty());
    }

    #[test]
    fn devel_only_points_are_not_vertices() {
        let mut w = GraphWorld::new();
        let dev = w.add_system("dev", SystemLevel::Devel);
        let act = w.add_system("act", SystemLevel::Active);
        w.add_route(dev, "NY", "D", "", "ny.d", &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
        w.add_route(act, "NY", "E", "", "ny.e", &[("C", 5.0, 0.0), ("D", 6.0, 0.0)]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        assert_eq!(build.graph.vertices.len(), 2);
    }

    #[test]
    fn region_and_system_vertex_sets() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
        w.add_route(sys, "VT", "B", "", "vt.b", &[("C", 5.0, 0.0), ("D", 6.0, 0.0)]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        assert_eq!(build.graph.region_vertices["NY"].len(), 2);
        assert_eq!(build.graph.region_vertices["VT"].len(), 2);
        assert_eq!(build.graph.system_vertices[0].len(), 4);
    }
}

#[cfg(test)]
mod naming {
    use hwy_model::SystemLevel;

    use super::fixtures::GraphWorld;
    use crate::graph::HighwayGraph;

    fn vertex_names(graph: &HighwayGraph) -> Vec<String> {
        graph.vertices.iter().map(|v| v.unique_name.clone()).collect()
    }

    #[test]
    fn straightforward_intersection() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "NY30", "", "ny.ny030", &[
            ("End", 0.0, 0.0),
            ("US20", 1.0, 1.0),
        ]);
        w.add_route(sys, "NY", "US20", "", "ny.us020", &[
            ("NY30", 1.0, 1.0),
            ("Other", 2.0, 2.0),
        ]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        assert!(vertex_names(&build.graph).contains(&"NY30/US20".to_string()));
        assert!(build
            .naming_log
            .iter()
            .any(|l| l.starts_with("Straightforward_intersection:")));
    }

    #[test]
    fn straightforward_concurrency() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[("Kan", 0.0, 0.0), ("A2", 1.0, 0.0)]);
        w.add_route(sys, "NY", "B", "", "ny.b", &[("Kan", 0.0, 0.0), ("B2", 0.0, 1.0)]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        assert!(vertex_names(&build.graph).contains(&"A/B@Kan".to_string()));
    }

    #[test]
    fn name_conflicts_fall_back_in_order() {
        // Two distinct crossings of the same two routes produce the same
        // canonical name; the second gets the region appended.
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "US1", "", "ny.us001", &[
            ("US2", 0.0, 0.0),
            ("Mid", 1.0, 0.0),
            ("US2", 2.0, 0.0),
        ]);
        w.add_route(sys, "NY", "US2", "", "ny.us002", &[
            ("US1", 0.0, 0.0),
            ("Far", 1.0, 1.0),
            ("US1", 2.0, 0.0),
        ]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        let names = vertex_names(&build.graph);
        assert!(names.contains(&"US1/US2".to_string()));
        assert!(names.contains(&"US1/US2|NY".to_string()));
        // all names unique
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }

    #[test]
    fn exit_number_pattern() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "I-90", "", "ny.i090", &[
            ("47B(94)", 0.0, 0.0),
            ("48", 1.0, 0.0),
        ]);
        w.add_route(sys, "NY", "I-94", "", "ny.i094", &[
            ("47B", 0.0, 0.0),
            ("49", 0.0, 1.0),
        ]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        let names = vertex_names(&build.graph);
        assert!(
            names.contains(&"I-90/I-94(47B)".to_string())
                || names.contains(&"I-90(47B(94))/I-94".to_string())
                || build.naming_log.iter().any(|l| l.starts_with("Exit_number:")),
            "names: {names:?}"
        );
    }
}

#[cfg(test)]
mod collapse {
    use hwy_core::TravelerId;
    use hwy_model::SystemLevel;

    use super::fixtures::GraphWorld;
    use crate::graph::HighwayGraph;
    use crate::vertex::Visibility;

    fn hidden_mid_world() -> GraphWorld {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[
            ("A", 0.0, 0.0),
            ("+H", 0.5, 0.0),
            ("B", 1.0, 0.0),
        ]);
        w
    }

    #[test]
    fn hidden_degree_two_collapses_everywhere() {
        let (data, qt) = hidden_mid_world().finish();
        let build = HighwayGraph::build(&data, &qt);
        let (sv, cv, tv) = build.graph.vertex_counts();
        let (se, ce, te) = build.graph.edge_counts();
        assert_eq!((sv, cv, tv), (3, 2, 2));
        assert_eq!((se, ce, te), (2, 1, 1));
        // the merged edge carries the hidden vertex as a shaping point
        let hidden = build
            .graph
            .vertices
            .iter()
            .position(|v| v.unique_name.contains("+H"))
            .unwrap();
        let merged = build
            .graph
            .edges
            .iter()
            .find(|e| !e.intermediate_points.is_empty())
            .unwrap();
        assert_eq!(merged.intermediate_points, vec![hwy_core::VertexId(hidden as u32)]);
    }

    #[test]
    fn clinch_mismatch_keeps_vertex_in_traveled() {
        let w = hidden_mid_world();
        let (mut data, qt) = w.finish();
        // clinch only the first segment
        let s0 = data.routes[0].segments[0];
        data.segments[s0.index()].add_clinched_by(TravelerId(0));
        let build = HighwayGraph::build(&data, &qt);
        let (_, cv, tv) = build.graph.vertex_counts();
        let (_, ce, te) = build.graph.edge_counts();
        assert_eq!(cv, 2, "still hidden in collapsed");
        assert_eq!(tv, 3, "visible in traveled");
        assert_eq!(ce, 1);
        assert_eq!(te, 2);
        let hidden = build
            .graph
            .vertices
            .iter()
            .find(|v| v.unique_name.contains("+H"))
            .unwrap();
        assert_eq!(hidden.visibility, Visibility::TraveledOnly);
    }

    #[test]
    fn hidden_junction_promoted_with_datacheck() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[("+X1", 0.0, 0.0), ("+J", 1.0, 0.0)]);
        w.add_route(sys, "NY", "B", "", "ny.b", &[("+J", 1.0, 0.0), ("+X2", 2.0, 0.0)]);
        w.add_route(sys, "NY", "C", "", "ny.c", &[("+J", 1.0, 0.0), ("+X3", 1.0, 1.0)]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        let junction = build.datachecks.iter().find(|d| d.code == hwy_core::DatacheckCode::HiddenJunction);
        assert!(junction.is_some());
        assert_eq!(junction.unwrap().info, "3");
    }

    #[test]
    fn visible_hidden_colocation_datacheck() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[("V", 0.0, 0.0), ("A2", 1.0, 0.0)]);
        w.add_route(sys, "NY", "B", "", "ny.b", &[("+H", 0.0, 0.0), ("B2", 0.0, 1.0)]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        let entry = build
            .datachecks
            .iter()
            .find(|d| d.code == hwy_core::DatacheckCode::VisibleHiddenColoc)
            .unwrap();
        assert_eq!(entry.labels, vec!["V"]);
        assert_eq!(entry.info, "ny.b@+H");
    }
}

#[cfg(test)]
mod emission {
    use std::collections::BTreeSet;

    use hwy_core::TravelerId;
    use hwy_model::{SystemLevel, TravelerList};
    use rustc_hash::FxHashMap;

    use super::fixtures::GraphWorld;
    use crate::graph::HighwayGraph;
    use crate::subgraph::SubgraphFilter;
    use crate::tmg::clinchedby_code;

    #[test]
    fn clinched_code_nibbles() {
        let numbering: FxHashMap<TravelerId, usize> =
            (0..6).map(|i| (TravelerId(i), i as usize)).collect();
        let clinched: BTreeSet<TravelerId> =
            [TravelerId(0), TravelerId(3), TravelerId(4)].into_iter().collect();
        // travelers 0..3 -> bit 0 and bit 3 = 9; travelers 4..5 -> bit 0 = 1
        assert_eq!(clinchedby_code(&clinched, &numbering), "91");
        assert_eq!(clinchedby_code(&BTreeSet::new(), &FxHashMap::default()), "0");
    }

    #[test]
    fn master_graphs_write_consistent_counts() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[
            ("A", 0.0, 0.0),
            ("+H", 0.5, 0.0),
            ("B", 1.0, 0.0),
        ]);
        let (data, qt) = w.finish();
        let mut build = HighwayGraph::build(&data, &qt);
        let travelers = vec![TravelerList::new("tester".into(), None)];
        let dir = tempfile::tempdir().unwrap();
        let mut graph_list = Vec::new();
        build
            .graph
            .write_master_graphs(&data, &travelers, dir.path(), &mut graph_list)
            .unwrap();

        let simple = std::fs::read_to_string(dir.path().join("tm-master-simple.tmg")).unwrap();
        let lines: Vec<&str> = simple.lines().collect();
        assert_eq!(lines[0], "TMG 1.0 simple");
        assert_eq!(lines[1], "3 2");
        assert_eq!(lines.len(), 2 + 3 + 2);

        let traveled = std::fs::read_to_string(dir.path().join("tm-master-traveled.tmg")).unwrap();
        let tlines: Vec<&str> = traveled.lines().collect();
        assert_eq!(tlines[0], "TMG 2.0 traveled");
        assert_eq!(tlines[1], "2 1 1");
        assert!(tlines.last().unwrap().contains("tester"));
        // the single traveled edge carries a clinched code and shaping point
        let edge_line = tlines[2 + 2];
        let fields: Vec<&str> = edge_line.split(' ').collect();
        assert_eq!(fields[3], "0", "no clinches recorded");
        assert_eq!(fields.len(), 4 + 2, "one intermediate point");
        assert_eq!(graph_list.len(), 3);
    }

    #[test]
    fn region_subgraph_is_closed() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[("A", 0.0, 0.0), ("B", 1.0, 0.0)]);
        w.add_route(sys, "VT", "B", "", "vt.b", &[("B1", 1.0, 0.0), ("B2", 2.0, 0.0)]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        let filter = SubgraphFilter {
            regions: Some(vec!["NY".to_string()]),
            ..Default::default()
        };
        let m = build.graph.matching_vertices_and_edges(&data, &qt, &filter);
        // NY vertices only; the shared point joins both regions
        assert_eq!(m.vertices.len(), 2);
        for &e in &m.simple_edges {
            let edge = build.graph.edge(e);
            assert!(m.vertices.contains(&edge.vertex1));
            assert!(m.vertices.contains(&edge.vertex2));
        }
        assert_eq!(m.simple_edges.len(), 1);
    }

    #[test]
    fn placeradius_subgraph_filters_by_distance() {
        let mut w = GraphWorld::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        w.add_route(sys, "NY", "A", "", "ny.a", &[
            ("A", 0.0, 0.0),
            ("B", 0.1, 0.0),
            ("C", 5.0, 0.0),
        ]);
        let (data, qt) = w.finish();
        let build = HighwayGraph::build(&data, &qt);
        let filter = SubgraphFilter {
            placeradius: Some(crate::place::PlaceRadius::new(
                "Near origin".into(),
                "origin".into(),
                0.0,
                0.0,
                30.0,
            )),
            ..Default::default()
        };
        let m = build.graph.matching_vertices_and_edges(&data, &qt, &filter);
        assert_eq!(m.vertices.len(), 2, "C is ~345 miles out");
        assert_eq!(m.simple_edges.len(), 1);
    }
}
