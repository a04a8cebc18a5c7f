//! Unit tests for travel-list resolution, concurrencies, and mileage.

#[cfg(test)]
pub(crate) mod fixtures {
    use hwy_core::{ConRouteId, ErrorList, GeoPoint, RouteId, SegmentId, SystemId, TravelerId, WaypointId};
    use hwy_model::{
        canonical_label, ConnectedRoute, HighwayData, HighwaySegment, HighwaySystem, Route,
        RouteRegistry, SystemLevel, TravelerList, Waypoint,
    };

    use crate::list::read_travel_list;

    /// An in-memory corpus under construction.
    pub struct World {
        pub data: HighwayData,
        pub registry: RouteRegistry,
    }

    impl World {
        pub fn new() -> Self {
            Self { data: HighwayData::new(), registry: RouteRegistry::new() }
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

        /// Add a route with waypoints at `points` labelled as given.
        pub fn add_route(
            &mut self,
            sys: SystemId,
            region: &str,
            name: &str,
            root: &str,
            points: &[(&str, f64, f64)],
        ) -> RouteId {
            let r = RouteId(self.data.routes.len() as u32);
            let mut route = Route {
                system: sys,
                region: region.into(),
                route: name.into(),
                root: root.into(),
                root_order: -1,
                ..Default::default()
            };
            for (i, &(label, lat, lng)) in points.iter().enumerate() {
                let w = WaypointId(self.data.waypoints.len() as u32);
                self.data
                    .waypoints
                    .push(Waypoint::new(label.into(), Vec::new(), GeoPoint::new(lat, lng), r));
                route.pri_label_hash.insert(canonical_label(label), i);
                route.points.push(w);
                if i > 0 {
                    let prev = route.points[i - 1];
                    let length = self.data.waypoints[prev.index()]
                        .point
                        .distance_mi(GeoPoint::new(lat, lng));
                    let s = SegmentId(self.data.segments.len() as u32);
                    self.data.segments.push(HighwaySegment::new(prev, w, r, length));
                    route.segments.push(s);
                }
            }
            self.registry.root_hash.insert(root.into(), r);
            self.registry
                .pri_list_hash
                .insert(format!("{} {}", region.to_uppercase(), name.to_uppercase()), r);
            self.data.routes.push(route);
            self.data.systems[sys.index()].routes.push(r);
            r
        }

        pub fn add_con_route(&mut self, sys: SystemId, name: &str, roots: &[RouteId]) -> ConRouteId {
            let id = ConRouteId(self.data.con_routes.len() as u32);
            for (order, &r) in roots.iter().enumerate() {
                self.data.routes[r.index()].con_route = Some(id);
                self.data.routes[r.index()].root_order = order as i32;
            }
            self.data.con_routes.push(ConnectedRoute {
                system: sys,
                route: name.into(),
                banner: String::new(),
                group_name: String::new(),
                roots: roots.to_vec(),
                mileage: 0.0,
            });
            self.data.systems[sys.index()].con_routes.push(id);
            id
        }

        /// Wire colocation groups by brute-force exact-coordinate scan.
        pub fn wire_colocations(&mut self) {
            let n = self.data.waypoints.len();
            for i in 0..n {
                for j in (i + 1)..n {
                    let (pi, pj) = (self.data.waypoints[i].point, self.data.waypoints[j].point);
                    if !pi.same_coords(pj) {
                        continue;
                    }
                    let (wi, wj) = (WaypointId(i as u32), WaypointId(j as u32));
                    match self.data.waypoints[i].colocated {
                        Some(g) => {
                            if !self.data.coloc_groups[g.index()].contains(&wj) {
                                self.data.coloc_groups[g.index()].push(wj);
                                self.data.waypoints[j].colocated = Some(g);
                            }
                        }
                        None => {
                            let g = self.data.new_coloc_group(vec![wi, wj]);
                            self.data.waypoints[i].colocated = Some(g);
                            self.data.waypoints[j].colocated = Some(g);
                        }
                    }
                }
            }
        }

        /// Resolve a one-user list from the given lines.
        pub fn resolve(&mut self, lines: &str) -> TravelerList {
            let el = ErrorList::new();
            read_travel_list(
                "tester.list",
                lines,
                &mut self.data,
                &self.registry,
                &[],
                TravelerId(0),
                None,
                &el,
            )
        }
    }

    /// Route A (P1 P2 P3) and route B (Q1 Q2) with B's only segment
    /// physically identical to A's second segment.
    pub fn concurrency_world(level_b: SystemLevel) -> (World, RouteId, RouteId) {
        let mut w = World::new();
        let sys_a = w.add_system("sysa", SystemLevel::Active);
        let sys_b = if level_b == SystemLevel::Active {
            sys_a
        } else {
            w.add_system("sysb", level_b)
        };
        let a = w.add_route(sys_a, "NY", "A", "ny.a", &[
            ("P1", 0.0, 0.0),
            ("P2", 1.0, 0.0),
            ("P3", 2.0, 0.0),
        ]);
        let b = w.add_route(sys_b, "NY", "B", "ny.b", &[("Q1", 1.0, 0.0), ("Q2", 2.0, 0.0)]);
        w.wire_colocations();
        (w, a, b)
    }
}

#[cfg(test)]
mod concurrency {
    use hwy_model::SystemLevel;

    use super::fixtures::concurrency_world;
    use crate::concurrency::{augment_clinched_concurrencies, detect_concurrencies};

    #[test]
    fn detects_shared_segment() {
        let (mut w, a, b) = concurrency_world(SystemLevel::Active);
        let log = detect_concurrencies(&mut w.data);
        assert_eq!(w.data.concurrencies.len(), 1);
        let sa = w.data.route(a).segments[1];
        let sb = w.data.route(b).segments[0];
        assert_eq!(w.data.concurrencies[0], vec![sa, sb]);
        assert_eq!(w.data.segment(sa).concurrent, w.data.segment(sb).concurrent);
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("New concurrency"));
    }

    #[test]
    fn unshared_segment_stays_unconcurrent() {
        let (mut w, a, _) = concurrency_world(SystemLevel::Active);
        detect_concurrencies(&mut w.data);
        let s0 = w.data.route(a).segments[0];
        assert!(w.data.segment(s0).concurrent.is_none());
    }

    #[test]
    fn augmentation_propagates_clinch() {
        let (mut w, a, b) = concurrency_world(SystemLevel::Active);
        detect_concurrencies(&mut w.data);
        let t = w.resolve("NY A P1 P3\n");
        assert_eq!(t.clinched.len(), 2);
        let log = augment_clinched_concurrencies(&mut w.data, std::slice::from_ref(&t));
        let sb = w.data.route(b).segments[0];
        assert!(w.data.segment(sb).clinched_by.contains(&hwy_core::TravelerId(0)));
        assert_eq!(log.len(), 1);
        assert!(log[0].contains("Concurrency augment for traveler tester"));
    }

    #[test]
    fn augmentation_skips_devel_systems() {
        let (mut w, _, b) = concurrency_world(SystemLevel::Devel);
        detect_concurrencies(&mut w.data);
        let t = w.resolve("NY A P1 P3\n");
        augment_clinched_concurrencies(&mut w.data, std::slice::from_ref(&t));
        let sb = w.data.route(b).segments[0];
        assert!(w.data.segment(sb).clinched_by.is_empty());
    }
}

#[cfg(test)]
mod resolution {
    use hwy_model::SystemLevel;

    use super::fixtures::{concurrency_world, World};

    #[test]
    fn four_field_clinches_inclusive_range() {
        let (mut w, a, _) = concurrency_world(SystemLevel::Active);
        let t = w.resolve("ny a p1 p3\n");
        let segs = &w.data.route(a).segments;
        assert!(t.clinched.contains(&segs[0]));
        assert!(t.clinched.contains(&segs[1]));
        assert!(t.log_entries.iter().any(|l| l.contains("Processed 1 good lines marking 2 segments")));
    }

    #[test]
    fn labels_match_with_sigils_stripped() {
        let (mut w, _, _) = concurrency_world(SystemLevel::Active);
        let t = w.resolve("NY A +P1 *P2\n");
        assert_eq!(t.clinched.len(), 1);
    }

    #[test]
    fn unknown_combo_is_logged() {
        let (mut w, _, _) = concurrency_world(SystemLevel::Active);
        let t = w.resolve("ZZ NOPE P1 P2\n");
        assert!(t.clinched.is_empty());
        assert!(t.log_entries.iter().any(|l| l.contains("Unknown region/highway combo")));
    }

    #[test]
    fn zero_distance_is_noted_and_skipped() {
        let (mut w, _, _) = concurrency_world(SystemLevel::Active);
        let t = w.resolve("NY A P2 P2\n");
        assert!(t.clinched.is_empty());
        assert!(t
            .log_entries
            .iter()
            .any(|l| l.contains("Equivalent waypoint labels mark zero distance traveled")));
    }

    #[test]
    fn devel_system_line_is_ignored() {
        let (mut w, _, _) = concurrency_world(SystemLevel::Devel);
        let t = w.resolve("NY B Q1 Q2\n");
        assert!(t.clinched.is_empty());
        assert!(t
            .log_entries
            .iter()
            .any(|l| l.contains("Ignoring line matching highway in system in development")));
    }

    #[test]
    fn missing_label_is_logged() {
        let (mut w, _, _) = concurrency_world(SystemLevel::Active);
        let t = w.resolve("NY A P1 NOPE\n");
        assert!(t.clinched.is_empty());
        assert!(t.log_entries.iter().any(|l| l.contains("Waypoint label NOPE not found")));
    }

    #[test]
    fn duplicate_label_is_fatal_to_line() {
        let (mut w, a, _) = concurrency_world(SystemLevel::Active);
        w.data.routes[a.index()].duplicate_labels.insert("P1".into());
        let t = w.resolve("NY A P1 P3\n");
        assert!(t.clinched.is_empty());
        assert!(t.log_entries.iter().any(|l| l.contains("duplicate label P1")));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let (mut w, _, _) = concurrency_world(SystemLevel::Active);
        let t = w.resolve("# whole line comment\n\nNY A P1 P2 # trailing comment\n");
        assert_eq!(t.clinched.len(), 1);
    }

    #[test]
    fn six_field_spans_connected_route() {
        let mut w = World::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        let a = w.add_route(sys, "NY", "X", "ny.x", &[
            ("A1", 0.0, 0.0),
            ("A2", 1.0, 0.0),
            ("A3", 2.0, 0.0),
        ]);
        let b = w.add_route(sys, "VT", "X", "vt.x", &[
            ("B1", 2.0, 0.0),
            ("B2", 3.0, 0.0),
            ("B3", 4.0, 0.0),
        ]);
        w.add_con_route(sys, "X", &[a, b]);
        w.wire_colocations();
        let t = w.resolve("NY X A2 VT X B2\n");
        // A2→A3 on the first route, B1→B2 on the second.
        assert_eq!(t.clinched.len(), 2);
        assert!(t.clinched.contains(&w.data.route(a).segments[1]));
        assert!(t.clinched.contains(&w.data.route(b).segments[0]));
    }

    #[test]
    fn six_field_traverses_intermediate_routes() {
        let mut w = World::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        let a = w.add_route(sys, "NY", "X", "ny.x", &[("A1", 0.0, 0.0), ("A2", 1.0, 0.0)]);
        let m = w.add_route(sys, "PA", "X", "pa.x", &[("M1", 1.0, 0.0), ("M2", 2.0, 0.0)]);
        let b = w.add_route(sys, "VT", "X", "vt.x", &[("B1", 2.0, 0.0), ("B2", 3.0, 0.0)]);
        w.add_con_route(sys, "X", &[a, m, b]);
        w.wire_colocations();
        let t = w.resolve("NY X A1 VT X B2\n");
        assert_eq!(t.clinched.len(), 3);
        assert!(t.clinched.contains(&w.data.route(m).segments[0]));
    }

    #[test]
    fn six_field_requires_same_connected_route() {
        let mut w = World::new();
        let sys = w.add_system("tst", SystemLevel::Active);
        let a = w.add_route(sys, "NY", "X", "ny.x", &[("A1", 0.0, 0.0), ("A2", 1.0, 0.0)]);
        let b = w.add_route(sys, "VT", "Y", "vt.y", &[("B1", 2.0, 0.0), ("B2", 3.0, 0.0)]);
        w.add_con_route(sys, "X", &[a]);
        w.add_con_route(sys, "Y", &[b]);
        let t = w.resolve("NY X A1 VT Y B2\n");
        assert!(t.clinched.is_empty());
        assert!(t.log_entries.iter().any(|l| l.contains("not in same connected route")));
    }

    #[test]
    fn bad_field_count_is_logged() {
        let (mut w, _, _) = concurrency_world(SystemLevel::Active);
        let t = w.resolve("NY A P1\n");
        assert!(t
            .log_entries
            .iter()
            .any(|l| l.contains("Incorrect format line (4 or 6 fields expected, found 3)")));
    }
}

#[cfg(test)]
mod mileage {
    use hwy_model::SystemLevel;

    use super::fixtures::concurrency_world;
    use crate::concurrency::{augment_clinched_concurrencies, detect_concurrencies};
    use crate::mileage::compute_mileage;

    #[test]
    fn concurrent_mileage_counted_once() {
        let (mut w, a, b) = concurrency_world(SystemLevel::Active);
        detect_concurrencies(&mut w.data);
        let mut travelers = vec![w.resolve("NY A P1 P3\n")];
        augment_clinched_concurrencies(&mut w.data, &travelers);
        let stats = compute_mileage(&mut w.data, &mut travelers);

        let seg_len: f64 = w.data.route(a).segments.iter().map(|&s| w.data.segment(s).length).sum();
        let shared_len = w.data.segment(w.data.route(b).segments[0]).length;

        // Each chopped route owns its full geometry...
        assert!((w.data.route(a).mileage - seg_len).abs() < 1e-9);
        assert!((w.data.route(b).mileage - shared_len).abs() < 1e-9);
        // ...but the region counts the shared stretch once.
        let region_total = stats.active_preview_mileage_by_region["NY"];
        assert!((region_total - seg_len).abs() < 1e-6, "got {region_total}, want {seg_len}");
        assert!((stats.overall_miles() - seg_len).abs() < 1e-6);
    }

    #[test]
    fn traveler_gets_full_credit_once() {
        let (mut w, a, _) = concurrency_world(SystemLevel::Active);
        detect_concurrencies(&mut w.data);
        let mut travelers = vec![w.resolve("NY A P1 P3\n")];
        augment_clinched_concurrencies(&mut w.data, &travelers);
        compute_mileage(&mut w.data, &mut travelers);

        let seg_len: f64 = w.data.route(a).segments.iter().map(|&s| w.data.segment(s).length).sum();
        let t = &travelers[0];
        assert!((t.active_preview_miles() - seg_len).abs() < 1e-6);
        assert!((t.active_only_miles() - seg_len).abs() < 1e-6);
    }

    #[test]
    fn mileage_conservation_by_region() {
        // active-only per-region totals must equal the sum over segments of
        // length / active-concurrency-count
        let (mut w, _, _) = concurrency_world(SystemLevel::Active);
        detect_concurrencies(&mut w.data);
        let mut travelers = Vec::new();
        let stats = compute_mileage(&mut w.data, &mut travelers);

        let mut expected = 0.0;
        for s in 0..w.data.segments.len() {
            let s = hwy_core::SegmentId(s as u32);
            let count = w
                .data
                .concurrency(s)
                .map_or(1, |m| m.iter().filter(|&&o| w.data.segment_system(o).active()).count());
            expected += w.data.segment(s).length / count as f64;
        }
        assert!((stats.active_only_miles() - expected).abs() < 1e-6);
    }

    #[test]
    fn devel_concurrency_does_not_halve_active_mileage() {
        let (mut w, a, _) = concurrency_world(SystemLevel::Devel);
        detect_concurrencies(&mut w.data);
        let mut travelers = Vec::new();
        let stats = compute_mileage(&mut w.data, &mut travelers);
        let seg_len: f64 = w.data.route(a).segments.iter().map(|&s| w.data.segment(s).length).sum();
        // The devel copy shares the road but active-only counting ignores it.
        assert!((stats.active_only_miles() - seg_len).abs() < 1e-6);
    }

    #[test]
    fn connected_route_mileage_sums_members() {
        let (mut w, a, b) = concurrency_world(SystemLevel::Active);
        let sys = w.data.route(a).system;
        w.add_con_route(sys, "A", &[a]);
        w.add_con_route(sys, "B", &[b]);
        let mut travelers = Vec::new();
        compute_mileage(&mut w.data, &mut travelers);
        assert!((w.data.con_routes[0].mileage - w.data.route(a).mileage).abs() < 1e-12);
    }
}
