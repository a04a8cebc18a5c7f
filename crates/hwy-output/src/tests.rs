//! Unit tests for output writers.

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeMap;

    use hwy_core::{GeoPoint, RouteId, SegmentId, SystemId, TravelerId, WaypointId};
    use hwy_model::{
        ConnectedRoute, HighwayData, HighwaySegment, HighwaySystem, Route, SystemLevel,
        TravelerList, Waypoint,
    };
    use hwy_travel::RegionStats;

    /// One active system, one two-segment route, one traveler who clinched
    /// the first segment.
    pub fn small_world() -> (HighwayData, Vec<TravelerList>, RegionStats) {
        let mut data = HighwayData::new();
        let mut system = HighwaySystem::new(
            "tst".into(),
            "USA".into(),
            "Test System".into(),
            "blue".into(),
            1,
            SystemLevel::Active,
        );
        let r = RouteId(0);
        let mut route = Route {
            system: SystemId(0),
            region: "NY".into(),
            route: "TST1".into(),
            root: "ny.tst001".into(),
            root_order: 0,
            ..Default::default()
        };
        for (i, &(label, lat, lng)) in
            [("A", 0.0, 0.0), ("B", 0.1, 0.0), ("C", 0.2, 0.0)].iter().enumerate()
        {
            let w = WaypointId(i as u32);
            data.waypoints
                .push(Waypoint::new(label.to_string(), Vec::new(), GeoPoint::new(lat, lng), r));
            route.points.push(w);
            if i > 0 {
                let prev = route.points[i - 1];
                let length = data.waypoints[prev.index()]
                    .point
                    .distance_mi(GeoPoint::new(lat, lng));
                data.segments
                    .push(HighwaySegment::new(prev, w, r, length));
                route.segments.push(SegmentId((i - 1) as u32));
            }
        }
        route.labels_in_use.insert("A".into());
        route.labels_in_use.insert("B".into());
        route.mileage = data.segments.iter().map(|s| s.length).sum();
        let con = ConnectedRoute {
            system: SystemId(0),
            route: "TST1".into(),
            banner: String::new(),
            group_name: String::new(),
            roots: vec![r],
            mileage: route.mileage,
        };
        route.con_route = Some(hwy_core::ConRouteId(0));
        system.routes.push(r);
        system.con_routes.push(hwy_core::ConRouteId(0));

        let seg0_len = data.segments[0].length;
        let total: f64 = data.segments.iter().map(|s| s.length).sum();
        system.mileage_by_region.insert("NY".into(), total);
        data.segments[0].add_clinched_by(TravelerId(0));
        data.systems.push(system);
        data.routes.push(route);
        data.con_routes.push(con);

        let mut traveler = TravelerList::new("tester".into(), None);
        traveler.clinched.insert(SegmentId(0));
        traveler
            .active_only_mileage_by_region
            .insert("NY".into(), seg0_len);
        traveler
            .active_preview_mileage_by_region
            .insert("NY".into(), seg0_len);
        traveler
            .system_region_mileages
            .entry("tst".into())
            .or_insert_with(BTreeMap::new)
            .insert("NY".into(), seg0_len);

        let mut stats = RegionStats::default();
        stats.active_only_mileage_by_region.insert("NY".into(), total);
        stats.active_preview_mileage_by_region.insert("NY".into(), total);
        stats.overall_mileage_by_region.insert("NY".into(), total);

        (data, vec![traveler], stats)
    }
}

#[cfg(test)]
mod formatting {
    use crate::users::format_clinched_mi;

    #[test]
    fn clinched_mi_with_percentage() {
        assert_eq!(format_clinched_mi(5.0, 10.0), "5.00 of 10.00 mi (50.00%)");
    }

    #[test]
    fn clinched_mi_zero_total() {
        assert_eq!(format_clinched_mi(0.0, 0.0), "0.00 of 0.00 mi -.--%");
    }
}

#[cfg(test)]
mod stats_csv {
    use super::fixtures::small_world;
    use crate::stats::write_stats_csvs;

    #[test]
    fn region_files_have_traveler_and_total_rows() {
        let (data, travelers, stats) = small_world();
        let dir = tempfile::tempdir().unwrap();
        write_stats_csvs(&data, &travelers, &stats, dir.path()).unwrap();

        let text =
            std::fs::read_to_string(dir.path().join("allbyregionactiveonly.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Traveler,Total,NY");
        assert!(lines[1].starts_with("tester,"));
        assert!(lines[2].starts_with("TOTAL,"));

        let sys = std::fs::read_to_string(dir.path().join("tst-all.csv")).unwrap();
        assert!(sys.contains("tester,"));
    }

    #[test]
    fn traveler_without_system_mileage_is_omitted() {
        let (data, mut travelers, stats) = small_world();
        travelers.push(hwy_model::TravelerList::new("empty".into(), None));
        let dir = tempfile::tempdir().unwrap();
        write_stats_csvs(&data, &travelers, &stats, dir.path()).unwrap();
        let sys = std::fs::read_to_string(dir.path().join("tst-all.csv")).unwrap();
        assert!(!sys.contains("empty"));
        let all = std::fs::read_to_string(dir.path().join("allbyregionactiveonly.csv")).unwrap();
        assert!(all.contains("empty,0.00,0"));
    }
}

#[cfg(test)]
mod logs {
    use hwy_core::{DatacheckCode, DatacheckEntry};

    use super::fixtures::small_world;
    use crate::logs::{write_datacheck_log, write_highway_data_stats, write_inuse_logs};

    #[test]
    fn datacheck_log_hides_false_positives() {
        let mut entries = vec![
            DatacheckEntry::new("ny.a", &["X"], DatacheckCode::SharpAngle, "140.00"),
            DatacheckEntry::new("ny.b", &["Y"], DatacheckCode::SharpAngle, "150.00"),
        ];
        entries[1].fp = true;
        let dir = tempfile::tempdir().unwrap();
        write_datacheck_log(&entries, dir.path()).unwrap();
        let text = std::fs::read_to_string(dir.path().join("datacheck.log")).unwrap();
        assert!(text.contains("ny.a;X;;;SHARP_ANGLE;140.00"));
        assert!(!text.contains("ny.b"));
    }

    #[test]
    fn inuse_logs_list_labels() {
        let (data, _, _) = small_world();
        let dir = tempfile::tempdir().unwrap();
        write_inuse_logs(&data, dir.path()).unwrap();
        let piu = std::fs::read_to_string(dir.path().join("pointsinuse.log")).unwrap();
        assert!(piu.contains("ny.tst001(3): A B"));
        let uarn = std::fs::read_to_string(dir.path().join("unusedaltroutenames.log")).unwrap();
        assert!(uarn.contains("Total: 0"));
    }

    #[test]
    fn highway_data_stats_totals() {
        let (data, _, stats) = small_world();
        let dir = tempfile::tempdir().unwrap();
        write_highway_data_stats(&data, &stats, dir.path()).unwrap();
        let text = std::fs::read_to_string(dir.path().join("highwaydatastats.log")).unwrap();
        assert!(text.contains("Active routes (active):"));
        assert!(text.contains("NY:"));
        assert!(text.contains("System tst (active) total:"));
        assert!(text.contains("(NY TST1 only)"));
    }
}

#[cfg(test)]
mod traveler_stats {
    use super::fixtures::small_world;
    use crate::users::build_traveler_stats;

    #[test]
    fn stats_entries_and_clinched_tables() {
        let (data, mut travelers, stats) = small_world();
        let tables = build_traveler_stats(&data, &mut travelers, &stats, &[]);

        assert_eq!(tables.routes.len(), 1);
        let (root, traveler, miles, clinched) = &tables.routes[0];
        assert_eq!(root, "ny.tst001");
        assert_eq!(traveler, "tester");
        assert!(*miles > 0.0);
        assert!(!clinched, "only one of two segments driven");

        assert_eq!(tables.connected_routes.len(), 1);
        assert_eq!(tables.system_mileage_by_region.len(), 1);

        let log = travelers[0].log_entries.join("\n");
        assert!(log.contains("Clinched Highway Statistics"));
        assert!(log.contains("Overall in active systems:"));
        assert!(log.contains("Traveled 1 of 1"));
    }
}

#[cfg(test)]
mod sql_dump {
    use hwy_core::ErrorList;

    use super::fixtures::small_world;
    use crate::sql::write_sql_dump;
    use crate::users::build_traveler_stats;

    #[test]
    fn dump_contains_all_tables() {
        let (data, mut travelers, stats) = small_world();
        let tables = build_traveler_stats(&data, &mut travelers, &stats, &[]);
        let dir = tempfile::tempdir().unwrap();
        // empty descriptor files are fine for the dump structure
        std::fs::write(dir.path().join("continents.csv"), "code;name\n").unwrap();
        std::fs::write(dir.path().join("countries.csv"), "code;name\n").unwrap();
        std::fs::write(dir.path().join("regions.csv"), "code;name;country;continent;regiontype\n")
            .unwrap();
        let el = ErrorList::new();
        let descriptors = hwy_ingest::descriptors::read_descriptors(dir.path(), &el).unwrap();

        let sql_path = dir.path().join("test.sql");
        write_sql_dump(
            &sql_path,
            &data,
            &descriptors,
            &[],
            &[],
            &travelers,
            &stats,
            &tables,
            &[],
            &[],
            &[],
        )
        .unwrap();
        let text = std::fs::read_to_string(sql_path).unwrap();
        for table in [
            "continents",
            "countries",
            "regions",
            "systems",
            "routes",
            "connectedRoutes",
            "waypoints",
            "segments",
            "clinched",
            "overallMileageByRegion",
            "clinchedRoutes",
            "datacheckErrors",
        ] {
            assert!(text.contains(&format!("CREATE TABLE {table} ")), "missing {table}");
        }
        assert!(text.contains("INSERT INTO waypoints VALUES"));
        assert!(text.contains("'tester'"));
        // one clinch row for the one clinched segment
        assert!(text.contains("INSERT INTO clinched VALUES"));
    }
}
