//! Physical highway segments.

use std::collections::BTreeSet;

use hwy_core::{ConcId, RouteId, TravelerId, WaypointId};

/// The undirected edge between two consecutive waypoints of one route.
///
/// When several routes physically share the same stretch of road, all of
/// their segments join one concurrency list; the list's first member is the
/// canonical representative used for mileage accounting and graph edges.
#[derive(Clone, Debug)]
pub struct HighwaySegment {
    pub waypoint1: WaypointId,
    pub waypoint2: WaypointId,
    pub route: RouteId,
    /// Route-adjusted length in miles, precomputed at construction.
    pub length: f64,
    pub concurrent: Option<ConcId>,
    /// Travelers who have driven this segment.  Ordered so iteration in
    /// log and output paths is deterministic.
    pub clinched_by: BTreeSet<TravelerId>,
}

impl HighwaySegment {
    pub fn new(waypoint1: WaypointId, waypoint2: WaypointId, route: RouteId, length: f64) -> Self {
        Self {
            waypoint1,
            waypoint2,
            route,
            length,
            concurrent: None,
            clinched_by: BTreeSet::new(),
        }
    }

    /// Record a clinch; returns whether the traveler was newly added.
    pub fn add_clinched_by(&mut self, traveler: TravelerId) -> bool {
        self.clinched_by.insert(traveler)
    }
}
