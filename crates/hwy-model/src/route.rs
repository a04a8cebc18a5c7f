//! A chopped route: one `.wpt` file within one highway system.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use hwy_core::{ConRouteId, SegmentId, SystemId, WaypointId};

/// Strip the leading `+`/`*` sigils and upper-case: the canonical form in
/// which waypoint labels are matched everywhere.
pub fn canonical_label(label: &str) -> String {
    label.trim_start_matches(['+', '*']).to_uppercase()
}

/// A chopped highway route.
///
/// Static fields come from the system's `.csv` row; the dynamic state fills
/// in as the `.wpt` file is read, labels are hashed, travel lists resolve,
/// and mileage accumulates.
#[derive(Clone, Debug, Default)]
pub struct Route {
    pub system: SystemId,
    /// Project region code, validated against `regions.csv`.
    pub region: String,
    /// Route designation as it appears in user lists.
    pub route: String,
    /// Optional banner suffix such as `Alt` or `Bus`.
    pub banner: String,
    /// Optional disambiguator for bannered or multi-section routes.
    pub abbrev: String,
    /// Full display name for the abbrev, if any.
    pub city: String,
    /// Unique lowercase file basename, global across all systems.
    pub root: String,
    /// Former or alternate names accepted in user lists (upper-cased).
    pub alt_route_names: Vec<String>,

    // ── Filled during ingestion ───────────────────────────────────────────
    /// Waypoints in file order.
    pub points: Vec<WaypointId>,
    /// Segments in file order; `points.len() - 1` entries for a route with
    /// at least one point.
    pub segments: Vec<SegmentId>,

    // ── Connectivity ──────────────────────────────────────────────────────
    pub con_route: Option<ConRouteId>,
    /// Position within the connected route, -1 until assigned.
    pub root_order: i32,
    /// Set during connectivity checking when this chopped route runs
    /// opposite to its connected route's direction.
    pub is_reversed: bool,

    // ── Label resolution state ────────────────────────────────────────────
    /// Canonical (upper-cased, sigil-stripped) primary label → point index.
    pub pri_label_hash: FxHashMap<String, usize>,
    /// Canonical alternate label → point index.
    pub alt_label_hash: FxHashMap<String, usize>,
    /// Canonical labels that appear more than once and are therefore
    /// unusable in travel lists.
    pub duplicate_labels: FxHashSet<String>,
    /// Canonical labels referenced by at least one travel list.
    pub labels_in_use: BTreeSet<String>,
    /// Canonical alternate labels no travel list has referenced yet.
    pub unused_alt_labels: BTreeSet<String>,

    // ── Stats ─────────────────────────────────────────────────────────────
    pub mileage: f64,
    /// Index into the updates table of this route's most recent update.
    pub last_update: Option<usize>,
}

impl Route {
    /// Human-readable name: `region route+banner+abbrev`.
    pub fn readable_name(&self) -> String {
        format!("{} {}{}{}", self.region, self.route, self.banner, self.abbrev)
    }

    /// The name format expected in traveler list files.
    pub fn list_entry_name(&self) -> String {
        format!("{}{}{}", self.route, self.banner, self.abbrev)
    }

    /// The name format usually found in intersecting routes' labels, where
    /// the abbrev is typically omitted.
    pub fn name_no_abbrev(&self) -> String {
        format!("{}{}", self.route, self.banner)
    }

    /// Endpoint that faces the *previous* chopped route in the connected
    /// route's direction of travel.
    pub fn con_beg(&self) -> Option<WaypointId> {
        if self.is_reversed { self.points.last().copied() } else { self.points.first().copied() }
    }

    /// Endpoint that faces the *next* chopped route.
    pub fn con_end(&self) -> Option<WaypointId> {
        if self.is_reversed { self.points.first().copied() } else { self.points.last().copied() }
    }

    /// Point index for a canonical label, primary hash first, then alt.
    pub fn label_index(&self, canonical: &str) -> Option<usize> {
        self.pri_label_hash
            .get(canonical)
            .or_else(|| self.alt_label_hash.get(canonical))
            .copied()
    }
}
