//! Global route lookup tables.
//!
//! An explicit registry threaded through ingestion (which fills it) and
//! travel-list resolution (which queries it).  Keys of the list hashes are
//! `REGION NAME` with both halves upper-cased — the combined form traveler
//! list files use.

use rustc_hash::FxHashMap;

use hwy_core::RouteId;

#[derive(Default)]
pub struct RouteRegistry {
    /// Unique root → route.
    pub root_hash: FxHashMap<String, RouteId>,
    /// Canonical list name → route.
    pub pri_list_hash: FxHashMap<String, RouteId>,
    /// Deprecated/alternate list name → route.
    pub alt_list_hash: FxHashMap<String, RouteId>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route for a `REGION NAME` key: the primary table first, then the
    /// alternate table.  The bool is true for an alternate (deprecated) hit.
    pub fn lookup_list_name(&self, key: &str) -> Option<(RouteId, bool)> {
        if let Some(&r) = self.pri_list_hash.get(key) {
            return Some((r, false));
        }
        self.alt_list_hash.get(key).map(|&r| (r, true))
    }
}
