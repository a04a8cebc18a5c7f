//! Travel-list parsing and resolution.
//!
//! A `.list` file is one line per traveled stretch:
//!
//! ```text
//! REGION ROUTE WAYPOINT1 WAYPOINT2            # within one chopped route
//! REGION1 ROUTE1 WP1 REGION2 ROUTE2 WP2       # spanning a connected route
//! ```
//!
//! `#` starts a comment, whole-line or trailing.  Resolution is
//! case-insensitive and strips leading `+`/`*` sigils from labels.  Every
//! anomaly becomes a note in the user's own log rather than an error: the
//! line is simply skipped.

use std::path::Path;

use hwy_core::{DbFieldLength, ErrorList, RouteId, TravelerId};
use hwy_model::{HighwayData, ListUpdate, RouteRegistry, TravelerList, UpdateRecord, canonical_label};

use crate::TravelResult;

/// Read and resolve one user's `.list` file from disk.
pub fn load_travel_list(
    path: &Path,
    data: &mut HighwayData,
    registry: &RouteRegistry,
    updates: &[UpdateRecord],
    traveler_id: TravelerId,
    update: Option<ListUpdate>,
    el: &ErrorList,
) -> TravelResult<TravelerList> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let contents = std::fs::read_to_string(path)?;
    Ok(read_travel_list(&file_name, &contents, data, registry, updates, traveler_id, update, el))
}

/// Resolve one user's `.list` contents against the route corpus.
///
/// Records clinched segments both ways (segment → traveler, traveler →
/// segment), marks list names and labels in use, and accumulates the user's
/// log lines.
#[allow(clippy::too_many_arguments)]
pub fn read_travel_list(
    file_name: &str,
    contents: &str,
    data: &mut HighwayData,
    registry: &RouteRegistry,
    updates: &[UpdateRecord],
    traveler_id: TravelerId,
    update: Option<ListUpdate>,
    el: &ErrorList,
) -> TravelerList {
    let name = file_name.strip_suffix(".list").unwrap_or(file_name).to_string();
    if name.len() > DbFieldLength::TRAVELER {
        el.add(format!("Traveler name {name} > {} bytes", DbFieldLength::TRAVELER));
    }
    let mut t = TravelerList::new(name, update);
    if let Some(u) = &t.update {
        t.log_entries
            .push(format!("{file_name} last updated: {} {} {}", u.date, u.time, u.zone));
    }

    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut list_entries = 0usize;

    for raw_line in contents.lines() {
        let line = raw_line.trim_matches([' ', '\t', '\r', '\n', '\0']);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields: Vec<&str> = line.split_whitespace().collect();
        // truncate inline comments
        if let Some(pos) = fields.iter().take(7).position(|f| f.starts_with('#')) {
            fields.truncate(pos);
        }

        match fields.len() {
            4 => {
                if resolve_four_field(&fields, line, data, registry, updates, traveler_id, &mut t) {
                    list_entries += 1;
                }
            }
            6 => {
                if resolve_six_field(&fields, line, data, registry, updates, traveler_id, &mut t) {
                    list_entries += 1;
                }
            }
            n => {
                t.log_entries
                    .push(format!("Incorrect format line (4 or 6 fields expected, found {n}): {line}"));
            }
        }
    }

    t.log_entries.push(format!(
        "Processed {list_entries} good lines marking {} segments traveled.",
        t.clinched.len()
    ));
    t
}

// ── Entry forms ───────────────────────────────────────────────────────────────

/// `REGION ROUTE WP1 WP2`: returns whether the line was good.
fn resolve_four_field(
    fields: &[&str],
    line: &str,
    data: &mut HighwayData,
    registry: &RouteRegistry,
    updates: &[UpdateRecord],
    traveler_id: TravelerId,
    t: &mut TravelerList,
) -> bool {
    let lookup = format!("{} {}", fields[0].to_uppercase(), fields[1].to_uppercase());
    let r = match registry.lookup_list_name(&lookup) {
        Some((r, false)) => r,
        Some((r, true)) => {
            t.log_entries.push(format!(
                "Note: deprecated route name {} -> canonical name {} in line: {line}",
                fields[1],
                data.route(r).list_entry_name()
            ));
            r
        }
        None => {
            let (clean, invchar) = no_control_chars(line);
            let mut entry = format!("Unknown region/highway combo in line: {clean}");
            if invchar {
                entry.push_str(" [contains invalid character(s)]");
            }
            t.log_entries.push(entry);
            return false;
        }
    };
    if data.route_system(r).devel() {
        t.log_entries
            .push(format!("Ignoring line matching highway in system in development: {line}"));
        return false;
    }

    let label1 = canonical_label(fields[2]);
    let label2 = canonical_label(fields[3]);
    let index1 = data.route(r).label_index(&label1);
    let index2 = data.route(r).label_index(&label2);

    if index1.is_none() || index2.is_none() {
        let (clean1, _) = no_control_chars(&label1);
        let (clean2, _) = no_control_chars(&label2);
        let (clean_line, invchar) = no_control_chars(line);
        let mut entry = if index1 == index2 {
            format!("Waypoint labels {clean1} and {clean2} not found in line: {clean_line}")
        } else {
            let missing = if index1.is_none() { clean1 } else { clean2 };
            format!("Waypoint label {missing} not found in line: {clean_line}")
        };
        if invchar {
            entry.push_str(" [contains invalid character(s)]");
        }
        t.log_entries.push(entry);
        note_route_update(data, updates, t, r);
        return false;
    }

    let mut duplicate = false;
    for label in [&label1, &label2] {
        if data.route(r).duplicate_labels.contains(label) {
            t.log_entries.push(format!(
                "{}: duplicate label {label} in {}. Please report this error in the forum. Unable to parse line: {line}",
                data.route(r).region,
                data.route(r).root
            ));
            duplicate = true;
        }
    }
    if duplicate {
        note_route_update(data, updates, t, r);
        return false;
    }

    let (index1, index2) = (index1.unwrap(), index2.unwrap());
    if index1 == index2 {
        t.log_entries
            .push(format!("Equivalent waypoint labels mark zero distance traveled in line: {line}"));
        note_route_update(data, updates, t, r);
        return false;
    }

    mark_in_use(data, r, &lookup, &[&label1, &label2]);
    let (beg, end) = if index1 > index2 { (index2, index1) } else { (index1, index2) };
    store_traveled_segments(data, updates, t, traveler_id, r, beg, end);
    true
}

/// `REGION1 ROUTE1 WP1 REGION2 ROUTE2 WP2`: returns whether the line was
/// good.
fn resolve_six_field(
    fields: &[&str],
    line: &str,
    data: &mut HighwayData,
    registry: &RouteRegistry,
    updates: &[UpdateRecord],
    traveler_id: TravelerId,
    t: &mut TravelerList,
) -> bool {
    let lookup1 = format!("{} {}", fields[0].to_uppercase(), fields[1].to_uppercase());
    let lookup2 = format!("{} {}", fields[3].to_uppercase(), fields[4].to_uppercase());

    let mut resolve = |lookup: &str, region: &str, route_name: &str| match registry.lookup_list_name(lookup) {
        Some((r, false)) => Some(r),
        Some((r, true)) => {
            t.log_entries.push(format!(
                "Note: deprecated route name \"{region} {route_name}\" -> canonical name \"{}\" in line: {line}",
                data.route(r).readable_name()
            ));
            Some(r)
        }
        None => None,
    };
    let r1 = resolve(&lookup1, fields[0], fields[1]);
    let r2 = resolve(&lookup2, fields[3], fields[4]);

    let (Some(mut r1), Some(mut r2)) = (r1, r2) else {
        let (clean1, _) = no_control_chars(&lookup1);
        let (clean2, _) = no_control_chars(&lookup2);
        let (clean_line, invchar) = no_control_chars(line);
        let mut entry = if r1 == r2 {
            format!("Unknown region/highway combos {clean1} and {clean2} in line: {clean_line}")
        } else {
            let missing = if r1.is_none() { clean1 } else { clean2 };
            format!("Unknown region/highway combo {missing} in line: {clean_line}")
        };
        if invchar {
            entry.push_str(" [contains invalid character(s)]");
        }
        t.log_entries.push(entry);
        return false;
    };

    if data.route(r1).con_route != data.route(r2).con_route {
        t.log_entries
            .push(format!("{lookup1} and {lookup2} not in same connected route in line: {line}"));
        for r in [r1, r2] {
            if let Some(con) = data.route(r).con_route {
                let roots = data.con_routes[con.index()].roots.clone();
                if let Some(&first) = roots.first() {
                    note_route_update(data, updates, t, first);
                    if roots.len() > 1 {
                        note_route_update(data, updates, t, *roots.last().unwrap());
                    }
                }
            }
        }
        return false;
    }
    if data.route_system(r1).devel() {
        t.log_entries
            .push(format!("Ignoring line matching highway in system in development: {line}"));
        return false;
    }

    let label1 = canonical_label(fields[2]);
    let label2 = canonical_label(fields[5]);
    let index1 = data.route(r1).label_index(&label1);
    let index2 = data.route(r2).label_index(&label2);

    if index1.is_none() || index2.is_none() {
        let (clean1, _) = no_control_chars(&label1);
        let (clean2, _) = no_control_chars(&label2);
        let (clean_line, invchar) = no_control_chars(line);
        let mut entry = if index1.is_none() && index2.is_none() {
            format!("Waypoint labels {clean1} and {clean2} not found in line: {clean_line}")
        } else if index1.is_none() {
            format!("Waypoint {lookup1} {clean1} not found in line: {clean_line}")
        } else {
            format!("Waypoint {lookup2} {clean2} not found in line: {clean_line}")
        };
        if invchar {
            entry.push_str(" [contains invalid character(s)]");
        }
        t.log_entries.push(entry);
        return false;
    }

    let mut duplicate = false;
    if data.route(r1).duplicate_labels.contains(&label1) {
        t.log_entries.push(format!(
            "{}: duplicate label {label1} in {}. Please report this error in the forum. Unable to parse line: {line}",
            data.route(r1).region,
            data.route(r1).root
        ));
        duplicate = true;
    }
    if data.route(r2).duplicate_labels.contains(&label2) {
        t.log_entries.push(format!(
            "{}: duplicate label {label2} in {}. Please report this error in the forum. Unable to parse line: {line}",
            data.route(r2).region,
            data.route(r2).root
        ));
        duplicate = true;
    }
    if duplicate {
        return false;
    }

    let (mut index1, mut index2) = (index1.unwrap(), index2.unwrap());
    // remember attribution before any ordering swap
    let marks = [(r1, lookup1, label1), (r2, lookup2, label2)];
    if r1 == r2 {
        if index1 == index2 {
            t.log_entries
                .push(format!("Equivalent waypoint labels mark zero distance traveled in line: {line}"));
            note_route_update(data, updates, t, r1);
            return false;
        }
        let (beg, end) = if index1 <= index2 { (index1, index2) } else { (index2, index1) };
        store_traveled_segments(data, updates, t, traveler_id, r1, beg, end);
    } else {
        if data.route(r1).root_order > data.route(r2).root_order {
            std::mem::swap(&mut r1, &mut r2);
            std::mem::swap(&mut index1, &mut index2);
        }
        // beginning chopped route from its entry index to its logical end
        let len1 = data.route(r1).segments.len();
        if data.route(r1).is_reversed {
            store_traveled_segments(data, updates, t, traveler_id, r1, 0, index1);
        } else {
            store_traveled_segments(data, updates, t, traveler_id, r1, index1, len1);
        }
        // ending chopped route from its logical start to its exit index
        let len2 = data.route(r2).segments.len();
        if data.route(r2).is_reversed {
            store_traveled_segments(data, updates, t, traveler_id, r2, index2, len2);
        } else {
            store_traveled_segments(data, updates, t, traveler_id, r2, 0, index2);
        }
        // intermediate chopped routes in their entirety
        if let Some(con) = data.route(r1).con_route {
            let lo = data.route(r1).root_order + 1;
            let hi = data.route(r2).root_order;
            for order in lo..hi {
                let mid = data.con_routes[con.index()].roots[order as usize];
                let len = data.route(mid).segments.len();
                store_traveled_segments(data, updates, t, traveler_id, mid, 0, len);
            }
        }
    }

    for (r, lookup, label) in &marks {
        mark_in_use(data, *r, lookup, &[label.as_str()]);
    }
    true
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Clinch `route.segments[beg..end]`, recording the segments with the
/// traveler and the traveler with each segment.
fn store_traveled_segments(
    data: &mut HighwayData,
    updates: &[UpdateRecord],
    t: &mut TravelerList,
    traveler_id: TravelerId,
    route: RouteId,
    beg: usize,
    end: usize,
) {
    let segments = data.routes[route.index()].segments[beg..end].to_vec();
    for s in segments {
        data.segments[s.index()].add_clinched_by(traveler_id);
        t.clinched.insert(s);
    }
    note_route_update(data, updates, t, route);
}

/// First time a route is referenced by this list, surface a note if the
/// route changed since the user's last list update.
fn note_route_update(data: &HighwayData, updates: &[UpdateRecord], t: &mut TravelerList, route: RouteId) {
    if !t.routes.insert(route) {
        return;
    }
    let (Some(last_update), Some(user_update)) = (data.route(route).last_update, t.update.as_ref())
    else {
        return;
    };
    let update = &updates[last_update];
    if update.date >= user_update.date {
        t.log_entries
            .push(format!("Route updated {}: {}", update.date, data.route(route).readable_name()));
    }
}

/// Record a successful reference: list name in use for the system, labels
/// in use for the route, and both dropped from the unused pools.
fn mark_in_use(data: &mut HighwayData, route: RouteId, lookup: &str, labels: &[&str]) {
    let sys = data.route(route).system;
    let system = &mut data.systems[sys.index()];
    system.listnames_in_use.insert(lookup.to_string());
    system.unused_alt_route_names.remove(lookup);
    let r = &mut data.routes[route.index()];
    for &label in labels {
        r.labels_in_use.insert(label.to_string());
        r.unused_alt_labels.remove(label);
    }
}

/// Replace control characters with `?`, reporting whether any were found.
fn no_control_chars(input: &str) -> (String, bool) {
    let mut output = String::with_capacity(input.len());
    let mut invchar = false;
    for c in input.chars() {
        if c < ' ' || c == '\x7f' {
            output.push('?');
            invchar = true;
        } else {
            output.push(c);
        }
    }
    (output, invchar)
}
