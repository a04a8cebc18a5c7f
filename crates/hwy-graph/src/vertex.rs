//! Graph vertices.

use hwy_core::{EdgeId, GeoPoint, WaypointId};

/// How widely a vertex is visible across the three graph formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Visibility {
    /// Never visible outside the simple graph.
    Hidden = 0,
    /// Visible only in the traveled graph; hidden in the collapsed graph.
    TraveledOnly = 1,
    /// Visible in both traveled and collapsed graphs.
    Visible = 2,
}

/// One vertex of the highway graph: a unique waypoint location touched by
/// at least one active-or-preview system.
#[derive(Clone, Debug)]
pub struct HGVertex {
    /// The canonical waypoint this vertex stands for.
    pub waypoint: WaypointId,
    pub point: GeoPoint,
    pub unique_name: String,
    pub visibility: Visibility,
    /// Incidence lists for the three formats.  Simple never changes after
    /// construction; collapsed and traveled shrink as hidden vertices are
    /// absorbed.
    pub incident_s: Vec<EdgeId>,
    pub incident_c: Vec<EdgeId>,
    pub incident_t: Vec<EdgeId>,
}

impl HGVertex {
    pub fn new(waypoint: WaypointId, point: GeoPoint, unique_name: String, visibility: Visibility) -> Self {
        Self {
            waypoint,
            point,
            unique_name,
            visibility,
            incident_s: Vec::new(),
            incident_c: Vec::new(),
            incident_t: Vec::new(),
        }
    }
}
