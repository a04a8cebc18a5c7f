//! Unit tests for the datacheck rules and false-positive matching.

#[cfg(test)]
pub(crate) mod fixtures {
    use hwy_core::{GeoPoint, RouteId, SegmentId, SystemId, WaypointId};
    use hwy_model::{HighwayData, HighwaySegment, HighwaySystem, Route, SystemLevel, Waypoint};

    /// One system, one route, waypoints labelled and placed as given.
    pub fn route_with(
        country: &str,
        level: SystemLevel,
        route_name: &str,
        banner: &str,
        points: &[(&str, f64, f64)],
    ) -> HighwayData {
        let mut data = HighwayData::new();
        let mut system = HighwaySystem::new(
            "tst".into(),
            country.into(),
            "Test".into(),
            "blue".into(),
            1,
            level,
        );
        let r = RouteId(0);
        let mut route = Route {
            system: SystemId(0),
            region: "NY".into(),
            route: route_name.into(),
            banner: banner.into(),
            root: "ny.tst".into(),
            ..Default::default()
        };
        for (i, &(label, lat, lng)) in points.iter().enumerate() {
            let w = WaypointId(data.waypoints.len() as u32);
            data.waypoints
                .push(Waypoint::new(label.into(), Vec::new(), GeoPoint::new(lat, lng), r));
            route.points.push(w);
            if i > 0 {
                let prev = route.points[i - 1];
                let length = data.waypoints[prev.index()].point.distance_mi(GeoPoint::new(lat, lng));
                let s = SegmentId(data.segments.len() as u32);
                data.segments.push(HighwaySegment::new(prev, w, r, length));
                route.segments.push(s);
            }
        }
        system.routes.push(r);
        data.systems.push(system);
        data.routes.push(route);
        data
    }

    pub fn codes(data: &HighwayData) -> Vec<hwy_core::DatacheckCode> {
        crate::run_datachecks(data).into_iter().map(|e| e.code).collect()
    }
}

#[cfg(test)]
mod label_rules {
    use hwy_core::DatacheckCode::*;
    use hwy_model::SystemLevel;

    use super::fixtures::{codes, route_with};

    fn label_codes(label: &str) -> Vec<hwy_core::DatacheckCode> {
        let data = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("Start", 0.0, 0.0), (label, 0.1, 0.0), ("End", 0.2, 0.0)],
        );
        codes(&data)
    }

    #[test]
    fn clean_label_produces_nothing() {
        assert!(label_codes("Exit42").is_empty());
    }

    #[test]
    fn invalid_characters() {
        assert!(label_codes("Bad Label!").contains(&LabelInvalidChar));
        assert!(label_codes("Exit#1").contains(&LabelInvalidChar));
    }

    #[test]
    fn underscores_and_slashes() {
        assert!(label_codes("A_B_C").contains(&LabelUnderscores));
        assert!(label_codes("A/B/C").contains(&LabelSlashes));
        assert!(label_codes("A_North/B").contains(&NonterminalUnderscore));
    }

    #[test]
    fn long_underscore_suffix() {
        assert!(label_codes("Exit_Albany").contains(&LongUnderscore));
        // one trailing capital is a directional suffix, allowed
        assert!(!label_codes("Exit1_N").contains(&LongUnderscore));
    }

    #[test]
    fn paren_balance() {
        assert!(label_codes("A(1").contains(&LabelParens));
        assert!(label_codes("A)1(").contains(&LabelParens));
        assert!(label_codes("A(1)(2)").contains(&LabelParens));
        assert!(!label_codes("A(1)").contains(&LabelParens));
    }

    #[test]
    fn first_and_final_chars() {
        assert!(label_codes("*_A").contains(&InvalidFirstChar));
        assert!(label_codes("A_").contains(&InvalidFinalChar));
        assert!(label_codes("A/").contains(&InvalidFinalChar));
    }

    #[test]
    fn looks_hidden_and_lacks_generic() {
        assert!(label_codes("X123456").contains(&LabelLooksHidden));
        assert!(!label_codes("X12345").contains(&LabelLooksHidden));
        assert!(label_codes("Old22").contains(&LacksGeneric));
        assert!(label_codes("*OLD9").contains(&LacksGeneric));
    }

    #[test]
    fn self_reference() {
        let data = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("A", 0.0, 0.0), ("TST_N", 0.1, 0.0), ("B", 0.2, 0.0)],
        );
        assert!(codes(&data).contains(&LabelSelfref));
    }

    #[test]
    fn usa_conventions() {
        fn usa_codes(label: &str) -> Vec<hwy_core::DatacheckCode> {
            let data = route_with(
                "USA",
                SystemLevel::Active,
                "TST",
                "",
                &[("Start", 0.0, 0.0), (label, 0.1, 0.0), ("End", 0.2, 0.0)],
            );
            codes(&data)
        }
        assert!(usa_codes("I-80Bus").contains(&BusWithI));
        assert!(usa_codes("I80").contains(&InterstateNoHyphen));
        assert!(usa_codes("ToI80").contains(&InterstateNoHyphen));
        assert!(!usa_codes("I-80").contains(&InterstateNoHyphen));
        assert!(usa_codes("US30A").contains(&UsLetter));
        assert!(usa_codes("US30A_E").contains(&UsLetter));
        assert!(!usa_codes("US30Alt").contains(&UsLetter));
    }
}

#[cfg(test)]
mod geometry_rules {
    use hwy_core::DatacheckCode::*;
    use hwy_model::SystemLevel;

    use super::fixtures::{codes, route_with};

    #[test]
    fn hidden_terminus() {
        let data = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("+Hidden", 0.0, 0.0), ("Mid", 0.1, 0.0), ("End", 0.2, 0.0)],
        );
        assert!(codes(&data).contains(&HiddenTerminus));
    }

    #[test]
    fn out_of_bounds() {
        let data = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("A", 95.0, 0.0), ("B", 0.1, 0.0)],
        );
        assert!(codes(&data).contains(&OutOfBounds));
    }

    #[test]
    fn duplicate_coords() {
        let data = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("A", 0.0, 0.0), ("B", 0.1, 0.0), ("C", 0.0, 0.0)],
        );
        let entries = crate::run_datachecks(&data);
        let dup = entries.iter().find(|e| e.code == DuplicateCoords).unwrap();
        assert_eq!(dup.labels, vec!["A", "C"]);
    }

    #[test]
    fn long_segment() {
        let data = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0)],
        );
        assert!(codes(&data).contains(&LongSegment));
    }

    #[test]
    fn visible_distance_only_for_non_active() {
        let points = [
            ("A", 0.0, 0.0),
            ("+h1", 0.1, 0.0),
            ("B", 0.2, 0.0),
        ];
        let preview = route_with("CAN", SystemLevel::Preview, "TST", "", &points);
        assert!(codes(&preview).contains(&VisibleDistance));
        let active = route_with("CAN", SystemLevel::Active, "TST", "", &points);
        assert!(!codes(&active).contains(&VisibleDistance));
    }

    #[test]
    fn sharp_and_bad_angles() {
        let sharp = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("A", 0.0, 0.0), ("B", 0.1, 0.0), ("C", 0.0, 0.0001)],
        );
        assert!(codes(&sharp).contains(&SharpAngle));

        let bad = route_with(
            "CAN",
            SystemLevel::Active,
            "TST",
            "",
            &[("A", 0.0, 0.0), ("B", 0.0, 0.0), ("C", 0.1, 0.0)],
        );
        assert!(codes(&bad).contains(&BadAngle));
    }
}

#[cfg(test)]
mod false_positives {
    use hwy_core::{DatacheckCode, DatacheckEntry, FpEntry};

    use crate::mark_false_positives;

    fn fp(root: &str, l1: &str, code: &str, info: &str) -> FpEntry {
        FpEntry {
            root: root.into(),
            labels: [l1.into(), String::new(), String::new()],
            code: code.into(),
            info: info.into(),
        }
    }

    #[test]
    fn exact_match_suppresses_exactly_one() {
        let mut entries = vec![
            DatacheckEntry::new("ny.a", &["5"], DatacheckCode::SharpAngle, "140.00"),
            DatacheckEntry::new("ny.a", &["5"], DatacheckCode::SharpAngle, "140.00"),
        ];
        let report = mark_false_positives(&mut entries, vec![fp("ny.a", "5", "SHARP_ANGLE", "140.00")]);
        assert_eq!(report.matched, 1);
        assert!(entries[0].fp);
        assert!(!entries[1].fp);
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn info_mismatch_reports_near_match() {
        let mut entries = vec![DatacheckEntry::new("ny.a", &["5"], DatacheckCode::SharpAngle, "141.20")];
        let report = mark_false_positives(&mut entries, vec![fp("ny.a", "5", "SHARP_ANGLE", "140.00")]);
        assert_eq!(report.matched, 0);
        assert!(!entries[0].fp);
        assert_eq!(report.near_match_lines.len(), 2);
        assert!(report.near_match_lines[0].starts_with("FP_ENTRY: "));
        assert!(report.near_match_lines[1].ends_with("141.20"));
        assert_eq!(report.unmatched.len(), 1);
    }

    #[test]
    fn unrelated_fp_ends_up_unmatched() {
        let mut entries = vec![DatacheckEntry::new("ny.a", &["5"], DatacheckCode::SharpAngle, "140.00")];
        let report = mark_false_positives(&mut entries, vec![fp("ny.b", "5", "SHARP_ANGLE", "140.00")]);
        assert_eq!(report.matched, 0);
        assert_eq!(report.unmatched.len(), 1);
    }
}
