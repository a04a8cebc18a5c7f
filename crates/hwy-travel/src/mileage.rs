//! Concurrency-adjusted mileage aggregation.
//!
//! Each chopped route owns its full geometry, so route mileage adds raw
//! segment lengths.  The regional, system, and traveler buckets divide each
//! segment's length by the number of concurrent segments *visible in that
//! bucket's scope*, so a road carrying three concurrent routes still
//! contributes its physical length once.

use std::collections::BTreeMap;

use hwy_core::TravelerId;
use hwy_model::{HighwayData, TravelerList};

/// Project-wide regional mileage totals.
#[derive(Default)]
pub struct RegionStats {
    /// Segments of active systems, divided by active concurrency count.
    pub active_only_mileage_by_region: BTreeMap<String, f64>,
    /// Segments of active-or-preview systems, divided by active-or-preview
    /// concurrency count.
    pub active_preview_mileage_by_region: BTreeMap<String, f64>,
    /// Every segment, divided by overall concurrency count.
    pub overall_mileage_by_region: BTreeMap<String, f64>,
}

impl RegionStats {
    pub fn active_only_miles(&self) -> f64 {
        self.active_only_mileage_by_region.values().sum()
    }

    pub fn active_preview_miles(&self) -> f64 {
        self.active_preview_mileage_by_region.values().sum()
    }

    pub fn overall_miles(&self) -> f64 {
        self.overall_mileage_by_region.values().sum()
    }
}

/// Per-segment concurrency counts within each scope (self included).
struct ConcurrencyCounts {
    system: usize,
    active_only: usize,
    active_preview: usize,
    overall: usize,
}

/// Walk systems → routes → segments, accumulating route, region, system,
/// and traveler mileage, then sum connected-route mileages.
pub fn compute_mileage(data: &mut HighwayData, travelers: &mut [TravelerList]) -> RegionStats {
    log::info!("Computing region, system, and traveler mileage");
    let mut stats = RegionStats::default();

    for sys_idx in 0..data.systems.len() {
        let routes = data.systems[sys_idx].routes.clone();
        for r in routes {
            let segments = data.routes[r.index()].segments.clone();
            let region = data.routes[r.index()].region.clone();
            let (active, active_or_preview) = {
                let system = &data.systems[sys_idx];
                (system.active(), system.active_or_preview())
            };

            for s in segments {
                let length = data.segment(s).length;
                let counts = concurrency_counts(data, s, sys_idx);

                // each chopped route owns its full geometry
                data.routes[r.index()].mileage += length;

                *stats.overall_mileage_by_region.entry(region.clone()).or_default() +=
                    length / counts.overall as f64;
                if active_or_preview {
                    *stats
                        .active_preview_mileage_by_region
                        .entry(region.clone())
                        .or_default() += length / counts.active_preview as f64;
                }
                if active {
                    *stats
                        .active_only_mileage_by_region
                        .entry(region.clone())
                        .or_default() += length / counts.active_only as f64;
                }
                *data.systems[sys_idx]
                    .mileage_by_region
                    .entry(region.clone())
                    .or_default() += length / counts.system as f64;

                // traveler credit
                let sysname = data.systems[sys_idx].name.clone();
                let clinchers: Vec<TravelerId> =
                    data.segment(s).clinched_by.iter().copied().collect();
                for tid in clinchers {
                    let t = &mut travelers[tid.index()];
                    *t.active_preview_mileage_by_region
                        .entry(region.clone())
                        .or_default() += length / counts.active_preview as f64;
                    if active {
                        *t.active_only_mileage_by_region
                            .entry(region.clone())
                            .or_default() += length / counts.active_only as f64;
                    }
                    *t.system_region_mileages
                        .entry(sysname.clone())
                        .or_default()
                        .entry(region.clone())
                        .or_default() += length / counts.system as f64;
                }
            }
        }
    }

    // connected-route mileage: sum of member routes
    for con_idx in 0..data.con_routes.len() {
        let total: f64 = data.con_routes[con_idx]
            .roots
            .iter()
            .map(|&r| data.route(r).mileage)
            .sum();
        data.con_routes[con_idx].mileage = total;
    }

    stats
}

fn concurrency_counts(data: &HighwayData, s: hwy_core::SegmentId, sys_idx: usize) -> ConcurrencyCounts {
    let mut counts = ConcurrencyCounts { system: 1, active_only: 1, active_preview: 1, overall: 1 };
    let Some(members) = data.concurrency(s) else {
        return counts;
    };
    for &other in members {
        if other == s {
            continue;
        }
        counts.overall += 1;
        let other_system = data.segment_system(other);
        if other_system.active_or_preview() {
            counts.active_preview += 1;
            if other_system.active() {
                counts.active_only += 1;
            }
        }
        if data.route(data.segment(other).route).system.index() == sys_idx {
            counts.system += 1;
        }
    }
    counts
}
