//! `.wpt` line parsing.
//!
//! Each non-blank line is `label [alt-labels...] URL` where the URL's query
//! string carries `lat=` and `lon=` parameters.  Parsing never aborts a
//! file: a line that cannot yield a usable waypoint produces datacheck
//! entries and is skipped.

use hwy_core::fields::ellipsize;
use hwy_core::{DatacheckCode, DatacheckEntry, DbFieldLength, GeoPoint};

/// A successfully parsed waypoint line, before insertion into the index.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedWaypoint {
    pub label: String,
    pub alt_labels: Vec<String>,
    pub point: GeoPoint,
}

/// Strict numeric validation for URL coordinate strings: one optional
/// leading `-`, at most one `.`, digits otherwise.
pub fn valid_num_str(data: &str) -> bool {
    let mut chars = data.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let mut point_count = 0;
    match first {
        '.' => point_count = 1,
        '-' => {}
        c if c.is_ascii_digit() => {}
        _ => return false,
    }
    for c in chars {
        match c {
            '-' => return false,
            '.' => {
                point_count += 1;
                if point_count > 1 {
                    return false;
                }
            }
            c if c.is_ascii_digit() => {}
            _ => return false,
        }
    }
    true
}

/// Parse one `.wpt` line for route `root`.
///
/// Returns the waypoint (if one survives) and any datacheck entries the
/// line produced.  A `None` waypoint means the line is dropped: malformed
/// URL or coordinates, or a label too long for the database.
pub fn parse_wpt_line(line: &str, root: &str) -> (Option<ParsedWaypoint>, Vec<DatacheckEntry>) {
    let mut datachecks = Vec::new();
    let parts: Vec<&str> = line.split_whitespace().collect();
    debug_assert!(!parts.is_empty(), "blank lines are filtered by the caller");

    let mut label = parts[0].to_string();
    let alt_labels: Vec<String> = if parts.len() > 2 {
        parts[1..parts.len() - 1].iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    };

    // The URL is the last token; coordinates are the values of its first
    // two `=` parameters.
    let url_parts: Vec<&str> = parts[parts.len() - 1].split('=').collect();
    if url_parts.len() < 3 {
        datachecks.push(DatacheckEntry::new(root, &[&label], DatacheckCode::MalformedUrl, "MISSING_ARG(S)"));
        return (None, datachecks);
    }
    let lat_string = url_parts[1].split('&').next().unwrap_or("");
    let lng_string = url_parts[2].split('&').next().unwrap_or("");

    let mut valid_coords = true;
    if !valid_num_str(lat_string) {
        datachecks.push(DatacheckEntry::new(
            root,
            &[&label],
            DatacheckCode::MalformedLat,
            ellipsize(lat_string, DbFieldLength::DC_ERR_VALUE),
        ));
        valid_coords = false;
    }
    if !valid_num_str(lng_string) {
        datachecks.push(DatacheckEntry::new(
            root,
            &[&label],
            DatacheckCode::MalformedLon,
            ellipsize(lng_string, DbFieldLength::DC_ERR_VALUE),
        ));
        valid_coords = false;
    }
    let (Ok(lat), Ok(lng)) = (lat_string.parse::<f64>(), lng_string.parse::<f64>()) else {
        // A string that passed character validation can still fail to parse
        // (lone "-" or "."); treat it the same as malformed.
        if valid_coords {
            datachecks.push(DatacheckEntry::new(root, &[&label], DatacheckCode::MalformedUrl, "MISSING_ARG(S)"));
        }
        return (None, datachecks);
    };
    if !valid_coords {
        return (None, datachecks);
    }

    // Labels longer than the database column are truncated and dropped.
    if label.len() > DbFieldLength::LABEL {
        let truncated = hwy_core::fields::clip_to_bytes(&label, DbFieldLength::LABEL - 3).to_string();
        let excess = ellipsize(&format!("...{}", &label[truncated.len()..]), DbFieldLength::DC_ERR_VALUE);
        label = truncated;
        datachecks.push(DatacheckEntry::new(
            root,
            &[&format!("{label}...")],
            DatacheckCode::LabelTooLong,
            excess,
        ));
        return (None, datachecks);
    }

    (
        Some(ParsedWaypoint { label, alt_labels, point: GeoPoint::new(lat, lng) }),
        datachecks,
    )
}
