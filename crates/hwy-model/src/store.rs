//! The arena store that owns all highway data.

use hwy_core::{ConRouteId, ConcId, GroupId, RouteId, SegmentId, SystemId, WaypointId};

use crate::{ConnectedRoute, HighwaySegment, HighwaySystem, Route, Waypoint};

/// Owner of every system, route, waypoint, and segment, plus the shared
/// colocation and concurrency relationship arenas.
///
/// All fields are `pub` for direct indexed access on hot paths; the accessor
/// methods exist for call sites where `data.waypoint(w)` reads better than
/// `&data.waypoints[w.index()]`.
#[derive(Default)]
pub struct HighwayData {
    pub systems: Vec<HighwaySystem>,
    pub routes: Vec<Route>,
    pub con_routes: Vec<ConnectedRoute>,
    pub waypoints: Vec<Waypoint>,
    pub segments: Vec<HighwaySegment>,
    /// Colocation groups: every waypoint at one exact coordinate.  Sorted by
    /// `(root, label)` once ingestion completes; the first member is then
    /// the canonical representative.
    pub coloc_groups: Vec<Vec<WaypointId>>,
    /// Concurrency lists: every segment sharing one physical stretch.
    /// Member 0 (discovery order) is canonical.
    pub concurrencies: Vec<Vec<SegmentId>>,
}

impl HighwayData {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn system(&self, id: SystemId) -> &HighwaySystem {
        &self.systems[id.index()]
    }

    #[inline]
    pub fn route(&self, id: RouteId) -> &Route {
        &self.routes[id.index()]
    }

    #[inline]
    pub fn waypoint(&self, id: WaypointId) -> &Waypoint {
        &self.waypoints[id.index()]
    }

    #[inline]
    pub fn segment(&self, id: SegmentId) -> &HighwaySegment {
        &self.segments[id.index()]
    }

    #[inline]
    pub fn con_route(&self, id: ConRouteId) -> &ConnectedRoute {
        &self.con_routes[id.index()]
    }

    /// The system a route belongs to.
    #[inline]
    pub fn route_system(&self, id: RouteId) -> &HighwaySystem {
        self.system(self.route(id).system)
    }

    /// The system a segment's route belongs to.
    #[inline]
    pub fn segment_system(&self, id: SegmentId) -> &HighwaySystem {
        self.route_system(self.segment(id).route)
    }

    // ── Colocation ────────────────────────────────────────────────────────

    /// The members of a waypoint's colocation group, or `None` if the point
    /// stands alone.
    pub fn coloc_group(&self, w: WaypointId) -> Option<&[WaypointId]> {
        self.waypoint(w)
            .colocated
            .map(|g| self.coloc_groups[g.index()].as_slice())
    }

    /// Number of waypoints at this waypoint's location (including itself).
    pub fn num_colocated(&self, w: WaypointId) -> usize {
        self.coloc_group(w).map_or(1, |g| g.len())
    }

    /// Canonical representative of a waypoint's location: the front of its
    /// colocation group, or the point itself when it stands alone.
    pub fn canonical_waypoint(&self, w: WaypointId) -> WaypointId {
        self.coloc_group(w).map_or(w, |g| g[0])
    }

    /// Whether this waypoint is, or shares its location with, a waypoint of
    /// an active-or-preview system.
    pub fn is_or_colocated_with_active_or_preview(&self, w: WaypointId) -> bool {
        if self.route_system(self.waypoint(w).route).active_or_preview() {
            return true;
        }
        match self.coloc_group(w) {
            None => false,
            Some(group) => group
                .iter()
                .any(|&p| self.route_system(self.waypoint(p).route).active_or_preview()),
        }
    }

    // ── Segments ──────────────────────────────────────────────────────────

    /// The segment of route `r` between `w1` and `w2`, in either order.
    pub fn find_segment_by_waypoints(
        &self,
        r: RouteId,
        w1: WaypointId,
        w2: WaypointId,
    ) -> Option<SegmentId> {
        self.route(r).segments.iter().copied().find(|&s| {
            let seg = self.segment(s);
            (seg.waypoint1 == w1 && seg.waypoint2 == w2)
                || (seg.waypoint1 == w2 && seg.waypoint2 == w1)
        })
    }

    /// Members of a segment's concurrency list, or `None` if unconcurrent.
    pub fn concurrency(&self, s: SegmentId) -> Option<&[SegmentId]> {
        self.segment(s)
            .concurrent
            .map(|c| self.concurrencies[c.index()].as_slice())
    }

    /// Graph edge label: comma-joined list-entry names of all concurrent
    /// routes in non-devel systems (the segment's own route alone when
    /// unconcurrent).
    pub fn segment_name(&self, s: SegmentId) -> String {
        let mut name = String::new();
        let mut add = |route: RouteId| {
            if self.route_system(route).active_or_preview() {
                if !name.is_empty() {
                    name.push(',');
                }
                name.push_str(&self.route(route).list_entry_name());
            }
        };
        match self.concurrency(s) {
            None => add(self.segment(s).route),
            Some(list) => {
                for &cs in list {
                    add(self.segment(cs).route);
                }
            }
        }
        name
    }

    /// Miles of route `r` clinched by traveler `t`.
    pub fn route_miles_clinched_by(&self, r: RouteId, t: hwy_core::TravelerId) -> f64 {
        self.route(r)
            .segments
            .iter()
            .filter(|&&s| self.segment(s).clinched_by.contains(&t))
            .map(|&s| self.segment(s).length)
            .sum()
    }

    // ── Display helpers ───────────────────────────────────────────────────

    /// `root label (lat,lng)` — the waypoint form used in NMP logs.
    pub fn waypoint_str(&self, w: WaypointId) -> String {
        let wp = self.waypoint(w);
        format!("{} {} {}", self.route(wp.route).root, wp.label, wp.point)
    }

    /// `region routeName label1 label2` — the segment form used in
    /// concurrency logs.
    pub fn segment_str(&self, s: SegmentId) -> String {
        let seg = self.segment(s);
        format!(
            "{} {} {}",
            self.route(seg.route).readable_name(),
            self.waypoint(seg.waypoint1).label,
            self.waypoint(seg.waypoint2).label
        )
    }

    /// Allocate a colocation group and return its id.
    pub fn new_coloc_group(&mut self, members: Vec<WaypointId>) -> GroupId {
        let id = GroupId(self.coloc_groups.len() as u32);
        self.coloc_groups.push(members);
        id
    }

    /// Allocate a concurrency list and return its id.
    pub fn new_concurrency(&mut self, members: Vec<SegmentId>) -> ConcId {
        let id = ConcId(self.concurrencies.len() as u32);
        self.concurrencies.push(members);
        id
    }
}
