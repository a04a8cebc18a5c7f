//! Post-read sequential pass: connected-route endpoint checking and label
//! hash construction.

use hwy_core::{DatacheckCode, DatacheckEntry, ErrorList, RouteId};
use hwy_model::{HighwayData, RouteRegistry, UpdateRecord, canonical_label};

/// Check every route's connected-route membership and endpoint continuity,
/// then build its label hashes.
///
/// Endpoint mismatches that a "reverse one or both" repair can fix set
/// `is_reversed`; the rest emit `DISCONNECTED_ROUTE` datachecks.  Duplicate
/// canonical labels are recorded and marked unusable for travel-list
/// resolution.
pub fn check_connectivity_and_build_labels(
    data: &mut HighwayData,
    el: &ErrorList,
) -> Vec<DatacheckEntry> {
    let mut datachecks = Vec::new();

    for route_idx in 0..data.routes.len() {
        let r = RouteId(route_idx as u32);

        // Unconnected chopped routes are fatal in aggregate.
        let Some(con) = data.routes[route_idx].con_route else {
            el.add(format!(
                "{}.csv: root {} not matched by any connected route root.",
                data.route_system(r).name,
                data.routes[route_idx].root
            ));
            continue;
        };

        // Endpoint continuity with the previous chopped route.
        let order = data.routes[route_idx].root_order;
        if order > 0 {
            let prev = data.con_routes[con.index()].roots[(order - 1) as usize];
            check_endpoints(data, prev, r, &mut datachecks);
        }

        build_label_hashes(data, r, &mut datachecks);
    }

    datachecks
}

/// Try to line up `prev`'s connection end with `r`'s beginning, reversing
/// one or both chopped routes if that makes them meet.
fn check_endpoints(data: &mut HighwayData, prev: RouteId, r: RouteId, datachecks: &mut Vec<DatacheckEntry>) {
    if data.route(prev).points.len() < 2 || data.route(r).points.len() < 2 {
        return;
    }
    let coords = |w: hwy_core::WaypointId| data.waypoint(w).point;
    let (Some(r_beg), Some(r_end), Some(q_beg), Some(q_end)) = (
        data.route(r).con_beg(),
        data.route(r).con_end(),
        data.route(prev).con_beg(),
        data.route(prev).con_end(),
    ) else {
        return;
    };

    if coords(r_beg).same_coords(coords(q_end)) {
        return;
    }
    if coords(q_beg).same_coords(coords(r_beg)) {
        data.routes[prev.index()].is_reversed = true;
    } else if coords(q_end).same_coords(coords(r_end)) {
        data.routes[r.index()].is_reversed = true;
    } else if coords(q_beg).same_coords(coords(r_end)) {
        data.routes[prev.index()].is_reversed = true;
        data.routes[r.index()].is_reversed = true;
    } else {
        datachecks.push(DatacheckEntry::new(
            &data.route(r).root,
            &[&data.waypoint(r_beg).label],
            DatacheckCode::DisconnectedRoute,
            format!("{}@{}", data.route(prev).root, data.waypoint(q_end).label),
        ));
        datachecks.push(DatacheckEntry::new(
            &data.route(prev).root,
            &[&data.waypoint(q_end).label],
            DatacheckCode::DisconnectedRoute,
            format!("{}@{}", data.route(r).root, data.waypoint(r_beg).label),
        ));
    }
}

/// Build the primary and alternate label hashes for one route, emitting
/// `DUPLICATE_LABEL` datachecks for canonical collisions.
fn build_label_hashes(data: &mut HighwayData, r: RouteId, datachecks: &mut Vec<DatacheckEntry>) {
    let points = data.routes[r.index()].points.clone();
    let root = data.routes[r.index()].root.clone();

    for (index, &w) in points.iter().enumerate() {
        let label = data.waypoints[w.index()].label.clone();
        let canon = canonical_label(&label);
        let route = &mut data.routes[r.index()];
        if route.alt_label_hash.contains_key(&canon) || route.pri_label_hash.contains_key(&canon) {
            datachecks.push(DatacheckEntry::new(&root, &[&label], DatacheckCode::DuplicateLabel, ""));
            route.duplicate_labels.insert(canon);
        } else {
            route.pri_label_hash.insert(canon, index);
        }

        for alt in data.waypoints[w.index()].alt_labels.clone() {
            let canon = canonical_label(&alt);
            data.routes[r.index()].unused_alt_labels.insert(canon.clone());
            let route = &data.routes[r.index()];
            if let Some(&pri_index) = route.pri_label_hash.get(&canon) {
                let colliding = data.waypoints[points[pri_index].index()].label.clone();
                let route = &mut data.routes[r.index()];
                datachecks.push(DatacheckEntry::new(&root, &[&colliding], DatacheckCode::DuplicateLabel, ""));
                route.duplicate_labels.insert(canon);
            } else if route.alt_label_hash.contains_key(&canon) {
                let route = &mut data.routes[r.index()];
                datachecks.push(DatacheckEntry::new(&root, &[&canon], DatacheckCode::DuplicateLabel, ""));
                route.duplicate_labels.insert(canon);
            } else {
                let route = &mut data.routes[r.index()];
                route.alt_label_hash.insert(canon, index);
            }
        }
    }
}

/// Attach each update record to its route (most recent date wins).
pub fn attach_updates(data: &mut HighwayData, registry: &RouteRegistry, updates: &[UpdateRecord]) {
    for (i, update) in updates.iter().enumerate() {
        let Some(&route_id) = registry.root_hash.get(&update.root) else {
            continue;
        };
        let route = &mut data.routes[route_id.index()];
        let newer = match route.last_update {
            None => true,
            Some(existing) => updates[existing].date < update.date,
        };
        if newer {
            route.last_update = Some(i);
        }
    }
}
