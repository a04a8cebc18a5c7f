//! The per-route datacheck rule pass.
//!
//! One walk over every route checks label form, geometry, and (for USA
//! systems) interstate/US-route naming conventions.  Each rule is a small
//! predicate over a waypoint, a segment, or a three-waypoint window.

use rustc_hash::FxHashSet;

use hwy_core::{DatacheckCode, DatacheckEntry, RouteId};
use hwy_model::{HighwayData, Route};

/// Segment length above which `LONG_SEGMENT` fires, in miles.
const LONG_SEGMENT_MI: f64 = 20.0;

/// Distance between visible points above which `VISIBLE_DISTANCE` fires.
const VISIBLE_DISTANCE_MI: f64 = 10.0;

/// Angle above which `SHARP_ANGLE` fires, in degrees.
const SHARP_ANGLE_DEG: f64 = 135.0;

/// Run the full rule pass over every route.
pub fn run_datachecks(data: &HighwayData) -> Vec<DatacheckEntry> {
    log::info!("Performing data checks");
    let mut entries = Vec::new();
    for sys_idx in 0..data.systems.len() {
        let usa = data.systems[sys_idx].country == "USA";
        let active = data.systems[sys_idx].active();
        for &r in &data.systems[sys_idx].routes {
            check_route(data, r, usa, active, &mut entries);
        }
    }
    entries
}

fn check_route(data: &HighwayData, r: RouteId, usa: bool, active: bool, entries: &mut Vec<DatacheckEntry>) {
    let route = data.route(r);
    let root = &route.root;
    let points = &route.points;

    // hidden termini
    if points.len() > 1 {
        for &end in [points.first(), points.last()].into_iter().flatten() {
            if data.waypoint(end).is_hidden {
                entries.push(DatacheckEntry::new(
                    root,
                    &[&data.waypoint(end).label],
                    DatacheckCode::HiddenTerminus,
                    "",
                ));
            }
        }
    }

    let mut coords_used: FxHashSet<(u64, u64)> = FxHashSet::default();
    let mut visible_distance = 0.0;
    let mut last_visible_label = points.first().map(|&w| data.waypoint(w).label.clone());

    for (i, &w) in points.iter().enumerate() {
        let wp = data.waypoint(w);
        let label = &wp.label;

        // out-of-bounds coords
        if wp.point.lat > 90.0 || wp.point.lat < -90.0 || wp.point.lng > 180.0 || wp.point.lng < -180.0 {
            entries.push(DatacheckEntry::new(
                root,
                &[label],
                DatacheckCode::OutOfBounds,
                format!("({},{})", wp.point.lat, wp.point.lng),
            ));
        }

        // duplicate coordinates within the route
        let bits = (wp.point.lat.to_bits(), wp.point.lng.to_bits());
        if !coords_used.insert(bits) {
            for &other in points.iter().take(i) {
                let op = data.waypoint(other);
                if op.point.same_coords(wp.point) {
                    entries.push(DatacheckEntry::new(
                        root,
                        &[&op.label, label],
                        DatacheckCode::DuplicateCoords,
                        format!("({},{})", wp.point.lat, wp.point.lng),
                    ));
                    break;
                }
            }
        }

        // invalid characters, with a special case for a UTF-8 BOM
        if !label_chars_valid(label) {
            if label.as_bytes().starts_with(&[0xef, 0xbb, 0xbf]) {
                entries.push(DatacheckEntry::new(root, &[label], DatacheckCode::LabelInvalidChar, "UTF-8 BOM"));
            } else {
                entries.push(DatacheckEntry::new(root, &[label], DatacheckCode::LabelInvalidChar, ""));
            }
        }
        for alt in &wp.alt_labels {
            if !label_chars_valid(alt) {
                entries.push(DatacheckEntry::new(root, &[alt], DatacheckCode::LabelInvalidChar, ""));
            }
        }

        // segment length and visible-distance accumulation
        if i > 0 {
            let prev = data.waypoint(points[i - 1]);
            let last_distance = wp.point.distance_mi(prev.point);
            visible_distance += last_distance;
            if last_distance > LONG_SEGMENT_MI {
                entries.push(DatacheckEntry::new(
                    root,
                    &[&prev.label, label],
                    DatacheckCode::LongSegment,
                    format!("{last_distance:.2}"),
                ));
            }
        }

        if !wp.is_hidden {
            // long stretches without a visible point clutter active-system
            // reports, so only non-active systems are checked
            if visible_distance > VISIBLE_DISTANCE_MI && !active {
                if let Some(lv) = &last_visible_label {
                    entries.push(DatacheckEntry::new(
                        root,
                        &[lv, label],
                        DatacheckCode::VisibleDistance,
                        format!("{visible_distance:.2}"),
                    ));
                }
            }
            last_visible_label = Some(label.clone());
            visible_distance = 0.0;

            check_visible_label(root, label, route, usa, entries);
        }
    }

    // angle checks need a three-point window
    for i in 1..points.len().saturating_sub(1) {
        let prev = data.waypoint(points[i - 1]);
        let here = data.waypoint(points[i]);
        let next = data.waypoint(points[i + 1]);
        let labels = [&prev.label, &here.label, &next.label];
        if prev.point.same_coords(here.point) || next.point.same_coords(here.point) {
            entries.push(DatacheckEntry::new(
                root,
                &[labels[0], labels[1], labels[2]],
                DatacheckCode::BadAngle,
                "",
            ));
        } else {
            let angle = here.point.chord_angle_deg(prev.point, next.point);
            if angle > SHARP_ANGLE_DEG {
                entries.push(DatacheckEntry::new(
                    root,
                    &[labels[0], labels[1], labels[2]],
                    DatacheckCode::SharpAngle,
                    format!("{angle:.2}"),
                ));
            }
        }
    }
}

/// Label-form checks that apply only to visible waypoints.
fn check_visible_label(root: &str, label: &str, route: &Route, usa: bool, entries: &mut Vec<DatacheckEntry>) {
    let chars: Vec<char> = label.chars().collect();
    let push = |entries: &mut Vec<DatacheckEntry>, code, info: String| {
        entries.push(DatacheckEntry::new(root, &[label], code, info));
    };

    if references_own_route(label, route) {
        push(entries, DatacheckCode::LabelSelfref, String::new());
    }

    if label.matches('_').count() > 1 {
        push(entries, DatacheckCode::LabelUnderscores, String::new());
    }

    // too many characters after the underscore (one trailing capital is
    // allowed as a directional suffix)
    if let Some(u) = chars.iter().position(|&c| c == '_') {
        if u < chars.len().saturating_sub(4)
            && (!chars[chars.len() - 1].is_ascii_uppercase() || u < chars.len().saturating_sub(5))
        {
            push(entries, DatacheckCode::LongUnderscore, String::new());
        }
    }

    if label.matches('/').count() > 1 {
        push(entries, DatacheckCode::LabelSlashes, String::new());
    }

    // parentheses: zero or one of each, '(' before ')'
    let left = label.matches('(').count();
    let right = label.matches(')').count();
    if left != right || left > 1 || (left == 1 && label.find('(') > label.find(')')) {
        push(entries, DatacheckCode::LabelParens, String::new());
    }

    // first character after any '*' sigils, and the final character
    let mut index = 0;
    while index < chars.len() && chars[index] == '*' {
        index += 1;
    }
    if index < chars.len() && matches!(chars[index], '_' | '/' | '(') {
        push(entries, DatacheckCode::InvalidFirstChar, chars[index].to_string());
    }
    if matches!(chars.last(), Some('_') | Some('/')) {
        push(entries, DatacheckCode::InvalidFinalChar, chars[chars.len() - 1].to_string());
    }

    // a slash after an underscore
    if let (Some(u), Some(s)) = (label.find('_'), label.find('/')) {
        if s > u {
            push(entries, DatacheckCode::NonterminalUnderscore, String::new());
        }
    }

    // visible point named like a hidden one: X followed by six digits
    if chars.len() == 7 && chars[0] == 'X' && chars[1..].iter().all(|c| c.is_ascii_digit()) {
        push(entries, DatacheckCode::LabelLooksHidden, String::new());
    }

    // Old<number>... without a generic highway type
    let after_star: &[char] = if chars.first() == Some(&'*') { &chars[1..] } else { &chars };
    if after_star.len() > 3
        && after_star[0].eq_ignore_ascii_case(&'o')
        && after_star[1].eq_ignore_ascii_case(&'l')
        && after_star[2].eq_ignore_ascii_case(&'d')
        && after_star[3].is_ascii_digit()
    {
        push(entries, DatacheckCode::LacksGeneric, String::new());
    }

    if usa && chars.len() >= 2 {
        if bus_with_interstate(&chars) {
            push(entries, DatacheckCode::BusWithI, String::new());
        }
        if interstate_no_hyphen(&chars) {
            push(entries, DatacheckCode::InterstateNoHyphen, String::new());
        }
        if us_letter(&chars) {
            push(entries, DatacheckCode::UsLetter, String::new());
        }
    }
}

// ── Pattern helpers ───────────────────────────────────────────────────────────

/// Valid label form: optional `+`, optional `*`, then one or more of
/// `[a-zA-Z0-9()/_-.]`.
fn label_chars_valid(label: &str) -> bool {
    let rest = label.strip_prefix('+').unwrap_or(label);
    let rest = rest.strip_prefix('*').unwrap_or(rest);
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '(' | ')' | '/' | '_' | '-' | '.'))
}

/// Whether a label names its own route: the full designation, optionally
/// followed by a `_` or `/` suffix, or a route-number match after a slash.
fn references_own_route(label: &str, route: &Route) -> bool {
    // number match after a slash, when the designation ends in digits
    if let Some(slash) = label.find('/') {
        if route.route.ends_with(|c: char| c.is_ascii_digit()) {
            let digits_start = route
                .route
                .rfind(|c: char| !c.is_ascii_digit())
                .map(|i| i + 1)
                .unwrap_or(0);
            let number = &route.route[digits_start..];
            let after_slash = &label[slash + 1..];
            if after_slash == number || after_slash == route.route {
                return true;
            }
            if let Some(under) = label.rfind('_') {
                if under > slash {
                    let between = &label[slash + 1..under];
                    if between == number || between == route.route {
                        return true;
                    }
                }
            }
        }
    }
    // full designation, alone or with a suffix
    let rb = route.name_no_abbrev();
    label == rb
        || label
            .strip_prefix(&rb)
            .is_some_and(|rest| rest.starts_with(['_', '/']))
}

/// `I-nn` with a `Bus` banner (should be BL or BS): `*?I-<digits><dir>?Bus…`.
fn bus_with_interstate(chars: &[char]) -> bool {
    let mut i = usize::from(chars.first() == Some(&'*'));
    if chars.get(i) != Some(&'I') || chars.get(i + 1) != Some(&'-') {
        return false;
    }
    i += 2;
    let digits_start = i;
    while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
    }
    if i == digits_start {
        return false;
    }
    if chars.get(i).is_some_and(|&c| "EeWwCcNnSs".contains(c)) {
        i += 1;
    }
    chars.get(i).is_some_and(|c| c.eq_ignore_ascii_case(&'b'))
        && chars.get(i + 1).is_some_and(|c| c.eq_ignore_ascii_case(&'u'))
        && chars.get(i + 2).is_some_and(|c| c.eq_ignore_ascii_case(&'s'))
}

/// `Inn` without the hyphen, optionally after `*` and/or `To`.
fn interstate_no_hyphen(chars: &[char]) -> bool {
    let mut c = usize::from(chars.first() == Some(&'*'));
    if chars.get(c) == Some(&'T') && chars.get(c + 1) == Some(&'o') {
        c += 2;
    }
    chars.get(c) == Some(&'I') && chars.get(c + 1).is_some_and(|d| d.is_ascii_digit())
}

/// `USnnA`/`USnnB` (letter suffix instead of Alt/Bus/Byp), possibly
/// followed by a `/`, `_`, `(`, or a three-letter city abbreviation.
fn us_letter(chars: &[char]) -> bool {
    let start = usize::from(chars.first() == Some(&'*'));
    if chars.get(start) != Some(&'U') || chars.get(start + 1) != Some(&'S') {
        return false;
    }
    let mut c = start + 2;
    if !chars.get(c).is_some_and(|d| d.is_ascii_digit()) {
        return false;
    }
    while chars.get(c).is_some_and(|d| d.is_ascii_digit()) {
        c += 1;
    }
    if !matches!(chars.get(c), Some('A') | Some('B')) {
        return false;
    }
    c += 1;
    if c == chars.len() || matches!(chars[c], '/' | '_' | '(') {
        return true;
    }
    // city abbreviation: Upper lower lower, then end or a separator
    chars[c].is_ascii_uppercase()
        && chars.get(c + 1).is_some_and(|ch| ch.is_ascii_lowercase())
        && chars.get(c + 2).is_some_and(|ch| ch.is_ascii_lowercase())
        && (c + 3 == chars.len() || matches!(chars.get(c + 3), Some('/') | Some('_') | Some('(')))
}
