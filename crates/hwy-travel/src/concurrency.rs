//! Concurrency detection and clinch augmentation.
//!
//! Two routes are concurrent over a segment when both of its endpoints are
//! colocated with a *consecutive* pair of waypoints in the other route.
//! All segments sharing one physical stretch join a single shared list in
//! discovery order; member 0 is the canonical representative used for
//! mileage accounting and graph edges.

use hwy_core::{SegmentId, TravelerId};
use hwy_model::{HighwayData, TravelerList};

/// Discover concurrent segments across all routes.
///
/// Returns the log lines for `concurrencies.log` ("New concurrency" when a
/// list is created, "Extended concurrency" with the full membership when a
/// third or later segment joins).
pub fn detect_concurrencies(data: &mut HighwayData) -> Vec<String> {
    log::info!("Concurrent segment detection");
    let mut log = Vec::new();

    for route_idx in 0..data.routes.len() {
        for seg_pos in 0..data.routes[route_idx].segments.len() {
            let s = data.routes[route_idx].segments[seg_pos];
            let (w1, w2) = {
                let seg = data.segment(s);
                (seg.waypoint1, seg.waypoint2)
            };
            let (Some(group1), Some(group2)) = (
                data.waypoint(w1).colocated,
                data.waypoint(w2).colocated,
            ) else {
                continue;
            };

            // Candidate (other-route) segments between the two colocation
            // groups, gathered first so the union step can mutate freely.
            let mut others: Vec<SegmentId> = Vec::new();
            for &c1 in &data.coloc_groups[group1.index()] {
                let other_route = data.waypoint(c1).route;
                if other_route.index() == route_idx {
                    continue;
                }
                for &c2 in &data.coloc_groups[group2.index()] {
                    if data.waypoint(c2).route != other_route {
                        continue;
                    }
                    if let Some(other) = data.find_segment_by_waypoints(other_route, c1, c2) {
                        others.push(other);
                    }
                }
            }

            for other in others {
                match data.segment(s).concurrent {
                    None => {
                        let conc = data.new_concurrency(vec![s, other]);
                        data.segments[s.index()].concurrent = Some(conc);
                        data.segments[other.index()].concurrent = Some(conc);
                        log.push(format!(
                            "New concurrency [{}][{}] (2)",
                            data.segment_str(s),
                            data.segment_str(other)
                        ));
                    }
                    Some(conc) => {
                        data.segments[other.index()].concurrent = Some(conc);
                        if !data.concurrencies[conc.index()].contains(&other) {
                            data.concurrencies[conc.index()].push(other);
                            let mut entry = String::from("Extended concurrency ");
                            for &member in &data.concurrencies[conc.index()] {
                                entry.push('[');
                                entry.push_str(&data.segment_str(member));
                                entry.push(']');
                            }
                            entry.push_str(&format!(" ({})", data.concurrencies[conc.index()].len()));
                            log.push(entry);
                        }
                    }
                }
            }
        }
    }
    log
}

/// Propagate clinches across concurrencies: a traveler who clinched one
/// member clinches every *other* member whose route belongs to an
/// active-or-preview system.
///
/// Only the segment side is augmented; the traveler's own clinched set
/// keeps the segments their list actually named.  Returns log lines for
/// `concurrencies.log`.
pub fn augment_clinched_concurrencies(
    data: &mut HighwayData,
    travelers: &[TravelerList],
) -> Vec<String> {
    let mut log = Vec::new();
    for (i, t) in travelers.iter().enumerate() {
        let traveler_id = TravelerId(i as u32);
        for &s in &t.clinched {
            let Some(members) = data.concurrency(s).map(<[SegmentId]>::to_vec) else {
                continue;
            };
            for hs in members {
                if hs != s
                    && data.segment_system(hs).active_or_preview()
                    && data.segments[hs.index()].add_clinched_by(traveler_id)
                {
                    log.push(format!(
                        "Concurrency augment for traveler {}: [{}] based on [{}]",
                        t.name,
                        data.segment_str(hs),
                        data.segment_str(s)
                    ));
                }
            }
        }
    }
    log
}
