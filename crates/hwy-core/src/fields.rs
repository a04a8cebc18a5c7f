//! Maximum byte lengths of every string column in the SQL dump.
//!
//! Loaders enforce these at parse time so that over-long values surface as
//! aggregated errors (or datacheck entries, for waypoint labels) long before
//! database generation.

/// Namespace for the per-column byte limits.
pub struct DbFieldLength;

impl DbFieldLength {
    pub const ABBREV: usize = 3;
    pub const BANNER: usize = 6;
    pub const CITY: usize = 100;
    pub const COLOR: usize = 16;
    pub const CONTINENT_CODE: usize = 3;
    pub const CONTINENT_NAME: usize = 15;
    pub const COUNTRY_CODE: usize = 3;
    pub const COUNTRY_NAME: usize = 32;
    pub const DATE: usize = 10;
    pub const DC_ERR_CODE: usize = 22;
    pub const GRAPH_CATEGORY: usize = 12;
    pub const GRAPH_DESCR: usize = 100;
    pub const GRAPH_FILENAME: usize = 32;
    pub const GRAPH_FORMAT: usize = 10;
    pub const LABEL: usize = 26;
    pub const LEVEL: usize = 10;
    pub const REGION_CODE: usize = 8;
    pub const REGION_NAME: usize = 48;
    pub const REGION_TYPE: usize = 32;
    pub const ROOT: usize = 32;
    pub const ROUTE: usize = 16;
    pub const ROUTE_LONG_NAME: usize = 80;
    pub const STATUS_CHANGE: usize = 16;
    pub const SYSTEM_FULL_NAME: usize = 60;
    pub const SYSTEM_NAME: usize = 10;
    pub const TRAVELER: usize = 48;
    pub const UPDATE_TEXT: usize = 1024;

    pub const COUNTRY_REGION: usize = Self::COUNTRY_NAME + Self::REGION_NAME + 3;
    pub const DC_ERR_VALUE: usize = Self::ROOT + Self::LABEL + 1;
}

/// Longest prefix of `s` that is at most `max_bytes` bytes of UTF-8,
/// cut at a character boundary.
pub fn clip_to_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shorten `s` to fit in `max_bytes` bytes, replacing the removed tail with
/// `"..."`.  Values that already fit are returned unchanged.
pub fn ellipsize(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let head = clip_to_bytes(s, max_bytes.saturating_sub(3));
    format!("{head}...")
}
