//! Per-user travel state.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashSet;

use hwy_core::{RouteId, SegmentId};

/// Timestamp of a user's most recent `.list` commit, from `listupdates.txt`.
#[derive(Clone, Debug)]
pub struct ListUpdate {
    pub date: String,
    pub time: String,
    pub zone: String,
}

/// One user's travels: clinched segments, log lines, and mileage buckets.
///
/// Constructed once from a `.list` file, grows while entries resolve, and is
/// read-mostly during mileage aggregation (which fills the mileage maps).
#[derive(Clone, Debug, Default)]
pub struct TravelerList {
    pub name: String,
    /// Segments this user has driven, including concurrency augmentations.
    pub clinched: BTreeSet<SegmentId>,
    /// Routes referenced by any (even unparseable) list entry, used to
    /// surface recent-update notices in the user's log.
    pub routes: FxHashSet<RouteId>,
    /// Lines destined for `users/<name>.log`.
    pub log_entries: Vec<String>,
    pub update: Option<ListUpdate>,

    // ── Filled by the mileage aggregator ──────────────────────────────────
    /// Concurrency-adjusted clinched mileage per region, active+preview.
    pub active_preview_mileage_by_region: BTreeMap<String, f64>,
    /// Same, restricted to active systems.
    pub active_only_mileage_by_region: BTreeMap<String, f64>,
    /// Clinched mileage per system per region (system-level concurrency
    /// adjustment).
    pub system_region_mileages: BTreeMap<String, BTreeMap<String, f64>>,
}

impl TravelerList {
    pub fn new(name: String, update: Option<ListUpdate>) -> Self {
        Self {
            name,
            update,
            ..Default::default()
        }
    }

    /// Total active-only clinched mileage across all regions.
    pub fn active_only_miles(&self) -> f64 {
        self.active_only_mileage_by_region.values().sum()
    }

    /// Total active+preview clinched mileage across all regions.
    pub fn active_preview_miles(&self) -> f64 {
        self.active_preview_mileage_by_region.values().sum()
    }

    /// Total clinched mileage within one system.
    pub fn system_miles(&self, system_name: &str) -> f64 {
        self.system_region_mileages
            .get(system_name)
            .map(|by_region| by_region.values().sum())
            .unwrap_or(0.0)
    }
}
