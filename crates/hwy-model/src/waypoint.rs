//! A single waypoint parsed from a `.wpt` file line.

use hwy_core::{GeoPoint, GroupId, RouteId, WaypointId};

/// One waypoint of one route.
///
/// Identity is (owning route, label).  Position is immutable after
/// construction; the colocation pointer is filled in during quadtree
/// insertion and the near-miss list grows symmetrically as later points
/// land nearby.
#[derive(Clone, Debug)]
pub struct Waypoint {
    /// Primary label.  A leading `+` marks the point hidden.
    pub label: String,
    /// Alternate labels (middle tokens of the source line), as written.
    pub alt_labels: Vec<String>,
    pub point: GeoPoint,
    pub is_hidden: bool,
    /// The route this waypoint belongs to.
    pub route: RouteId,
    /// Colocation group, if any other waypoint shares these exact
    /// coordinates.  The group's first element after sorting is canonical.
    pub colocated: Option<GroupId>,
    /// Waypoints within the near-miss tolerance but not exactly colocated.
    pub near_miss: Vec<WaypointId>,
}

impl Waypoint {
    pub fn new(label: String, alt_labels: Vec<String>, point: GeoPoint, route: RouteId) -> Self {
        let is_hidden = label.starts_with('+');
        Self {
            label,
            alt_labels,
            point,
            is_hidden,
            route,
            colocated: None,
            near_miss: Vec::new(),
        }
    }
}
