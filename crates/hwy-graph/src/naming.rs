//! Canonical vertex-name synthesis.
//!
//! Every vertex needs a unique display name that still carries meaning.
//! The cascade below tries increasingly general compressions of the
//! `route@label` forms of the colocated active-or-preview waypoints; the
//! caller then resolves any remaining conflicts with `|region`, a retry of
//! the simple form, and finally `!` suffixes.
//!
//! Each successful compression appends a line to the naming log, which ends
//! up in `waypointsimplification.log`.

use rustc_hash::FxHashSet;

use hwy_core::WaypointId;
use hwy_model::{HighwayData, Route};

/// Failsafe name: `route@label`, `&`-joined across the active-or-preview
/// members of the colocation group.
pub fn simple_waypoint_name(data: &HighwayData, w: WaypointId) -> String {
    let wp = data.waypoint(w);
    match data.coloc_group(w) {
        None => format!("{}@{}", data.route(wp.route).list_entry_name(), wp.label),
        Some(group) => {
            let mut name = String::new();
            for &m in group {
                let mp = data.waypoint(m);
                if data.route_system(mp.route).active_or_preview() {
                    if !name.is_empty() {
                        name.push('&');
                    }
                    name.push_str(&data.route(mp.route).list_entry_name());
                    name.push('@');
                    name.push_str(&mp.label);
                }
            }
            name
        }
    }
}

/// Whether `label` names route `r`: the bannered designation, optionally
/// followed by the abbrev, optionally followed by a `_` suffix.
fn label_references_route(label: &str, r: &Route) -> bool {
    let no_abbrev = r.name_no_abbrev();
    let Some(rest) = label.strip_prefix(&no_abbrev) else {
        return false;
    };
    if rest.is_empty() || rest.starts_with('_') {
        return true;
    }
    let Some(rest) = rest.strip_prefix(&r.abbrev) else {
        return false;
    };
    rest.is_empty() || rest.starts_with('_')
}

/// The `_`-suffix of a label (including the underscore), if any.
fn underscore_suffix(label: &str) -> &str {
    label.find('_').map_or("", |i| &label[i..])
}

/// Best name for the vertex at waypoint `w`, considering the
/// active-or-preview members of its colocation group (`ap_coloc`, never
/// empty, containing `w`'s location).
pub fn canonical_waypoint_name(
    data: &HighwayData,
    w: WaypointId,
    ap_coloc: &[WaypointId],
    vertex_names: &FxHashSet<String>,
    log: &mut Vec<String>,
) -> String {
    let name = simple_waypoint_name(data, w);
    if ap_coloc.len() == 1 {
        return name;
    }

    let labels: Vec<&str> =
        ap_coloc.iter().map(|&p| data.waypoint(p).label.as_str()).collect();
    let routes: Vec<&Route> =
        ap_coloc.iter().map(|&p| data.route(data.waypoint(p).route)).collect();
    let n = ap_coloc.len();

    // Straightforward 2-route intersection with mutually referencing
    // labels: NY30@US20 & US20@NY30 -> NY30/US20, directional suffixes
    // preserved.
    if n == 2 {
        let one_ref_zero = label_references_route(labels[1], routes[0]);
        let zero_ref_one = label_references_route(labels[0], routes[1]);
        if one_ref_zero && zero_ref_one {
            let newname = format!("{}/{}", labels[1], labels[0]);
            if !routes[0].abbrev.is_empty() || !routes[1].abbrev.is_empty() {
                let taken = vertex_names.contains(&newname);
                if taken || routes[0].name_no_abbrev() == routes[1].name_no_abbrev() {
                    let full = format!(
                        "{}{}/{}{}",
                        routes[0].list_entry_name(),
                        underscore_suffix(labels[1]),
                        routes[1].list_entry_name(),
                        underscore_suffix(labels[0]),
                    );
                    let mut message = format!("Straightforward_intersection: {name} -> {full}");
                    if taken {
                        message.push_str(&format!(" ({newname} already taken)"));
                    }
                    log.push(message);
                    return full;
                }
            }
            log.push(format!("Straightforward_intersection: {name} -> {newname}"));
            return newname;
        }
    }

    // Straightforward concurrency: all labels match (hidden ones count as
    // matching) -> route1/route2/.../@label.
    {
        let mut route_names: Vec<String> = Vec::new();
        let mut matches = 0;
        for i in 0..n {
            if labels[0] == labels[i] || labels[i].starts_with('+') {
                let entry = routes[i].list_entry_name();
                if !route_names.contains(&entry) {
                    route_names.push(entry);
                }
                matches += 1;
            } else {
                break;
            }
        }
        if matches == n {
            let newname = format!("{}@{}", route_names.join("/"), labels[0]);
            log.push(format!("Straightforward_concurrency: {name} -> {newname}"));
            return newname;
        }
    }

    // Exit/intersection: I-10@753B & US90@I-10(753B) -> I-10(753B)/US90.
    for match_index in 0..n {
        let lookfor1 = routes[match_index].list_entry_name();
        let lookfor2 = format!("{}({})", lookfor1, labels[match_index]);
        let all_match = (0..n)
            .filter(|&i| i != match_index)
            .all(|i| labels[i] == lookfor1 || labels[i] == lookfor2);
        if all_match {
            let mut newname = if labels[match_index].starts_with(|c: char| c.is_ascii_digit()) {
                lookfor2
            } else {
                lookfor1
            };
            for add_index in 0..n {
                if add_index != match_index {
                    newname.push('/');
                    newname.push_str(&routes[add_index].list_entry_name());
                }
            }
            log.push(format!("Exit/Intersection: {name} -> {newname}"));
            return newname;
        }
    }

    // 3+ intersection with cross-referencing labels:
    // NY5@NY16/384 & NY16@NY5/384 & NY384@NY5/16 -> NY5/NY16/NY384,
    // preserving shared _ suffixes to reduce name conflicts.
    if n > 2 {
        let mut suffixes = vec![String::new(); n];
        let mut matched = false;
        for check in 0..n {
            matched = false;
            for index in 0..n {
                if index == check {
                    continue;
                }
                let other_no_abbrev = routes[index].name_no_abbrev();
                if let Some(rest) = labels[check].strip_prefix(&other_no_abbrev) {
                    matched = true;
                    let suffix = underscore_suffix(labels[check]);
                    if !suffix.is_empty()
                        && (rest == suffix || format!("{}{}", routes[index].abbrev, suffix) == rest)
                    {
                        suffixes[index] = suffix.to_string();
                    }
                }
            }
            if !matched {
                break;
            }
        }
        if matched {
            let newname = (0..n)
                .map(|i| format!("{}{}", routes[i].list_entry_name(), suffixes[i]))
                .collect::<Vec<_>>()
                .join("/");
            log.push(format!("3+_intersection: {name} -> {newname}"));
            return newname;
        }
    }

    // Exit-number simplification: I-90@47B(94) & I-94@47B -> I-90/I-94@47B.
    for exit in 0..n {
        if !labels[exit].starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        let list_name = routes[exit].list_entry_name();
        let no_abbrev = routes[exit].name_no_abbrev();
        let nmbr_only = no_abbrev
            .find(|c: char| c.is_ascii_digit())
            .map_or(no_abbrev.as_str(), |i| &no_abbrev[i..]);

        let matches = |i: usize| -> bool {
            let ml = labels[i];
            if ml == no_abbrev {
                return true;
            }
            if let Some(rest) = ml.strip_prefix(&no_abbrev) {
                if rest.starts_with(['_', '/']) {
                    return true;
                }
                if let Some(inner) = rest.strip_prefix('(') {
                    if inner.strip_prefix(labels[exit]).is_some_and(|r| r.starts_with(')')) {
                        return true;
                    }
                }
            }
            ml == list_name
                || ml == format!("{}({})", list_name, labels[exit])
                || ml == labels[exit]
                || ml == format!("{}({})", labels[exit], nmbr_only)
                || ml == format!("{}({})", labels[exit], no_abbrev)
        };
        if (0..n).filter(|&i| i != exit).all(matches) {
            let mut newname = String::new();
            for pos in 0..n {
                newname.push_str(&routes[pos].list_entry_name());
                if pos == exit {
                    newname.push('(');
                    newname.push_str(labels[exit]);
                    newname.push(')');
                }
                if pos < n - 1 {
                    newname.push('/');
                }
            }
            log.push(format!("Exit_number: {name} -> {newname}"));
            return newname;
        }
    }

    // Reversed border labels: DE491@DE/PA & PA491@PA/DE -> DE491/PA491@DE/PA.
    let w_label = &data.waypoint(w).label;
    if let Some(slash) = w_label.find('/') {
        let reverse = format!("{}/{}", &w_label[slash + 1..], &w_label[..slash]);
        let all_match = (1..n).all(|i| labels[i] == *w_label || labels[i] == reverse);
        if all_match {
            let mut route_names: Vec<String> = Vec::new();
            for route in &routes {
                let entry = route.list_entry_name();
                if !route_names.contains(&entry) {
                    route_names.push(entry);
                }
            }
            let newname = format!("{}@{}", route_names.join("/"), w_label);
            log.push(format!("Reversed_border_labels: {name} -> {newname}"));
            return newname;
        }
    }

    log.push(format!("Keep_failsafe: {name}"));
    name
}
