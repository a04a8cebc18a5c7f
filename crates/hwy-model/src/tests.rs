//! Unit tests for the data model.

#[cfg(test)]
pub(crate) mod fixtures {
    use hwy_core::{GeoPoint, RouteId, SegmentId, SystemId, WaypointId};

    use crate::{HighwayData, HighwaySegment, HighwaySystem, Route, SystemLevel, Waypoint};

    /// Build a store with one system and one route whose waypoints sit at
    /// the given coordinates, labelled `W0`, `W1`, …
    pub fn single_route(level: SystemLevel, coords: &[(f64, f64)]) -> (HighwayData, RouteId) {
        let mut data = HighwayData::new();
        data.systems.push(HighwaySystem::new(
            "tst".into(),
            "USA".into(),
            "Test System".into(),
            "blue".into(),
            1,
            level,
        ));
        let sys = SystemId(0);
        let r = RouteId(0);
        let mut route = Route {
            system: sys,
            region: "NY".into(),
            route: "TST1".into(),
            root: "ny.tst001".into(),
            ..Default::default()
        };
        for (i, &(lat, lng)) in coords.iter().enumerate() {
            let w = WaypointId(data.waypoints.len() as u32);
            data.waypoints
                .push(Waypoint::new(format!("W{i}"), Vec::new(), GeoPoint::new(lat, lng), r));
            route.points.push(w);
            if i > 0 {
                let s = SegmentId(data.segments.len() as u32);
                let prev = route.points[i - 1];
                let length = data.waypoints[prev.index()]
                    .point
                    .distance_mi(GeoPoint::new(lat, lng));
                data.segments.push(HighwaySegment::new(prev, w, r, length));
                route.segments.push(s);
            }
        }
        data.systems[0].routes.push(r);
        data.routes.push(route);
        (data, r)
    }
}

#[cfg(test)]
mod route_names {
    use crate::Route;

    #[test]
    fn name_forms() {
        let r = Route {
            region: "NY".into(),
            route: "US20".into(),
            banner: "Alt".into(),
            abbrev: "Sch".into(),
            ..Default::default()
        };
        assert_eq!(r.readable_name(), "NY US20AltSch");
        assert_eq!(r.list_entry_name(), "US20AltSch");
        assert_eq!(r.name_no_abbrev(), "US20Alt");
    }

    #[test]
    fn con_endpoints_respect_reversal() {
        use hwy_core::WaypointId;
        let mut r = Route::default();
        r.points = vec![WaypointId(3), WaypointId(4), WaypointId(5)];
        assert_eq!(r.con_beg(), Some(WaypointId(3)));
        assert_eq!(r.con_end(), Some(WaypointId(5)));
        r.is_reversed = true;
        assert_eq!(r.con_beg(), Some(WaypointId(5)));
        assert_eq!(r.con_end(), Some(WaypointId(3)));
    }
}

#[cfg(test)]
mod store {
    use hwy_core::{SegmentId, TravelerId, WaypointId};

    use super::fixtures::single_route;
    use crate::SystemLevel;

    #[test]
    fn segment_count_invariant() {
        let (data, r) = single_route(SystemLevel::Active, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let route = data.route(r);
        assert_eq!(route.segments.len(), route.points.len() - 1);
    }

    #[test]
    fn find_segment_either_order() {
        let (data, r) = single_route(SystemLevel::Active, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let s = data
            .find_segment_by_waypoints(r, WaypointId(1), WaypointId(0))
            .unwrap();
        assert_eq!(s, SegmentId(0));
        assert!(data
            .find_segment_by_waypoints(r, WaypointId(0), WaypointId(2))
            .is_none());
    }

    #[test]
    fn canonical_waypoint_without_group_is_self() {
        let (data, _) = single_route(SystemLevel::Active, &[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(data.canonical_waypoint(WaypointId(1)), WaypointId(1));
    }

    #[test]
    fn colocation_group_canonical_is_front() {
        let (mut data, _) = single_route(SystemLevel::Active, &[(0.0, 0.0), (1.0, 0.0)]);
        let g = data.new_coloc_group(vec![WaypointId(0), WaypointId(1)]);
        data.waypoints[0].colocated = Some(g);
        data.waypoints[1].colocated = Some(g);
        assert_eq!(data.canonical_waypoint(WaypointId(1)), WaypointId(0));
        assert_eq!(data.num_colocated(WaypointId(1)), 2);
    }

    #[test]
    fn devel_system_not_active_or_preview() {
        let (data, _) = single_route(SystemLevel::Devel, &[(0.0, 0.0), (1.0, 0.0)]);
        assert!(!data.is_or_colocated_with_active_or_preview(WaypointId(0)));
    }

    #[test]
    fn segment_name_skips_devel() {
        let (data, r) = single_route(SystemLevel::Devel, &[(0.0, 0.0), (1.0, 0.0)]);
        let s = data.route(r).segments[0];
        assert_eq!(data.segment_name(s), "");
    }

    #[test]
    fn clinched_miles_sum() {
        let (mut data, r) = single_route(SystemLevel::Active, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let t = TravelerId(0);
        let s0 = data.route(r).segments[0];
        data.segments[s0.index()].add_clinched_by(t);
        let miles = data.route_miles_clinched_by(r, t);
        let expected = data.segment(s0).length;
        assert!((miles - expected).abs() < 1e-12);
    }
}
