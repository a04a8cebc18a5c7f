//! The waypoint quadtree.
//!
//! # Structure
//!
//! Each node is either a **leaf** holding up to 50 unique locations (any
//! number of waypoints — colocated points count once), or an **internal**
//! node with four children tiling its bounds at the arithmetic-mean
//! midpoints.  A leaf refines into four children when its 51st unique
//! location arrives.
//!
//! # Midpoint ownership
//!
//! A point exactly on `mid_lat` belongs to a *northern* child and exactly on
//! `mid_lng` to an *eastern* child; strictly-less goes south/west.  The rule
//! is applied identically during descent, refinement, and query pruning.
//!
//! # Concurrency
//!
//! The tree is single-threaded internally.  During parallel ingestion the
//! caller serializes the (near-miss query, insert) pair for each waypoint
//! through one mutex, so every query sees exactly the structure the next
//! insert modifies.

use hwy_core::geo::EARTH_RADIUS_MI;
use hwy_core::{GeoPoint, WaypointId};

/// Maximum unique locations per leaf before it refines.
const LEAF_CAPACITY: usize = 50;

/// One stored point: the waypoint's id, its coordinates, and whether it was
/// the first arrival at its location (the insertion-order canonical, which
/// controls unique-location counting across refinements).
#[derive(Copy, Clone, Debug)]
struct QtPoint {
    id: WaypointId,
    point: GeoPoint,
    first_at_location: bool,
}

struct Children {
    nw: WaypointQuadtree,
    ne: WaypointQuadtree,
    sw: WaypointQuadtree,
    se: WaypointQuadtree,
}

/// Recursive point-region quadtree over waypoints.
///
/// The root covers the full coordinate space (−90,−180)–(+90,+180).
pub struct WaypointQuadtree {
    min_lat: f64,
    min_lng: f64,
    max_lat: f64,
    max_lng: f64,
    mid_lat: f64,
    mid_lng: f64,
    /// `Some` for internal nodes; leaves have no children.
    children: Option<Box<Children>>,
    /// Leaf point list; drained on refinement.
    points: Vec<QtPoint>,
    unique_locations: usize,
}

impl WaypointQuadtree {
    /// An empty tree covering the whole globe.
    pub fn whole_world() -> Self {
        Self::new(-90.0, -180.0, 90.0, 180.0)
    }

    fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
            mid_lat: (min_lat + max_lat) / 2.0,
            mid_lng: (min_lng + max_lng) / 2.0,
            children: None,
            points: Vec::new(),
            unique_locations: 0,
        }
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The child quadrant owning `point` under the midpoint rule.
    fn child_for(&mut self, point: GeoPoint) -> &mut WaypointQuadtree {
        let children = self.children.as_mut().unwrap();
        if point.lat < self.mid_lat {
            if point.lng < self.mid_lng { &mut children.sw } else { &mut children.se }
        } else if point.lng < self.mid_lng {
            &mut children.nw
        } else {
            &mut children.ne
        }
    }

    fn child_for_ref(&self, point: GeoPoint) -> &WaypointQuadtree {
        let children = self.children.as_ref().unwrap();
        if point.lat < self.mid_lat {
            if point.lng < self.mid_lng { &children.sw } else { &children.se }
        } else if point.lng < self.mid_lng {
            &children.nw
        } else {
            &children.ne
        }
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Insert a waypoint during initial ingestion.
    ///
    /// Returns the id of an existing waypoint at the same exact coordinates,
    /// if any; the caller wires the colocation group.  Coordinates must be
    /// real numbers — a NaN here is a caller bug, not a data error.
    pub fn insert(&mut self, id: WaypointId, point: GeoPoint) -> Option<WaypointId> {
        assert!(!point.lat.is_nan() && !point.lng.is_nan(), "NaN coordinates for {id}");
        if self.is_leaf() {
            let existing = self
                .points
                .iter()
                .find(|p| p.point.same_coords(point))
                .map(|p| p.id);
            let first = existing.is_none();
            self.points.push(QtPoint { id, point, first_at_location: first });
            if first {
                self.unique_locations += 1;
                if self.unique_locations > LEAF_CAPACITY {
                    self.refine();
                }
            }
            existing
        } else {
            self.child_for(point).insert(id, point)
        }
    }

    /// Re-insert a point after refinement.  Colocation was resolved during
    /// the initial insertion, so the stored first-arrival flag alone decides
    /// unique-location counting.
    fn reinsert(&mut self, p: QtPoint) {
        if self.is_leaf() {
            if p.first_at_location {
                self.unique_locations += 1;
            }
            self.points.push(p);
            if self.unique_locations > LEAF_CAPACITY {
                self.refine();
            }
        } else {
            self.child_for(p.point).reinsert(p);
        }
    }

    /// Split this leaf into four child quadrants and redistribute its points.
    fn refine(&mut self) {
        self.children = Some(Box::new(Children {
            nw: Self::new(self.mid_lat, self.min_lng, self.max_lat, self.mid_lng),
            ne: Self::new(self.mid_lat, self.mid_lng, self.max_lat, self.max_lng),
            sw: Self::new(self.min_lat, self.min_lng, self.mid_lat, self.mid_lng),
            se: Self::new(self.min_lat, self.mid_lng, self.mid_lat, self.max_lng),
        }));
        self.unique_locations = 0;
        for p in std::mem::take(&mut self.points) {
            self.reinsert(p);
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// An existing waypoint at exactly `point`, if any.
    pub fn waypoint_at_same_point(&self, point: GeoPoint) -> Option<WaypointId> {
        if self.is_leaf() {
            self.points
                .iter()
                .find(|p| p.point.same_coords(point))
                .map(|p| p.id)
        } else {
            self.child_for_ref(point).waypoint_at_same_point(point)
        }
    }

    /// All waypoints within `tolerance` degrees of `point` on both axes but
    /// not at exactly the same coordinates.
    ///
    /// Descends into a child iff the tolerance-extended bounding box of
    /// `point` overlaps that child's quadrant.
    pub fn near_miss_waypoints(&self, point: GeoPoint, tolerance: f64) -> Vec<WaypointId> {
        let mut found = Vec::new();
        self.near_miss_into(point, tolerance, &mut found);
        found
    }

    fn near_miss_into(&self, point: GeoPoint, tolerance: f64, found: &mut Vec<WaypointId>) {
        if self.is_leaf() {
            for p in &self.points {
                if !p.point.same_coords(point) && p.point.nearby(point, tolerance) {
                    found.push(p.id);
                }
            }
        } else {
            let children = self.children.as_ref().unwrap();
            let look_north = point.lat + tolerance >= self.mid_lat;
            let look_south = point.lat - tolerance <= self.mid_lat;
            let look_east = point.lng + tolerance >= self.mid_lng;
            let look_west = point.lng - tolerance <= self.mid_lng;
            if look_north && look_west {
                children.nw.near_miss_into(point, tolerance, found);
            }
            if look_north && look_east {
                children.ne.near_miss_into(point, tolerance, found);
            }
            if look_south && look_west {
                children.sw.near_miss_into(point, tolerance, found);
            }
            if look_south && look_east {
                children.se.near_miss_into(point, tolerance, found);
            }
        }
    }

    /// All waypoints within `radius_mi` great-circle miles of `center`,
    /// with the longitude search window clipped to `[w_bound, e_bound]`.
    ///
    /// Callers handle antimeridian wrap by searching up to three windows.
    pub fn points_in_disk(
        &self,
        center: GeoPoint,
        radius_mi: f64,
        w_bound: f64,
        e_bound: f64,
    ) -> Vec<WaypointId> {
        let mut found = Vec::new();
        self.disk_into(center, radius_mi, w_bound, e_bound, &mut found);
        found
    }

    fn disk_into(
        &self,
        center: GeoPoint,
        radius_mi: f64,
        w_bound: f64,
        e_bound: f64,
        found: &mut Vec<WaypointId>,
    ) {
        if self.is_leaf() {
            for p in &self.points {
                if center.arc_distance_mi(p.point) <= radius_mi {
                    found.push(p.id);
                }
            }
        } else {
            let children = self.children.as_ref().unwrap();
            let lat_delta = (radius_mi / EARTH_RADIUS_MI).to_degrees();
            let look_n = center.lat + lat_delta >= self.mid_lat;
            let look_s = center.lat - lat_delta <= self.mid_lat;
            let look_e = e_bound >= self.mid_lng;
            let look_w = w_bound <= self.mid_lng;
            if look_n && look_w {
                children.nw.disk_into(center, radius_mi, w_bound, e_bound, found);
            }
            if look_n && look_e {
                children.ne.disk_into(center, radius_mi, w_bound, e_bound, found);
            }
            if look_s && look_w {
                children.sw.disk_into(center, radius_mi, w_bound, e_bound, found);
            }
            if look_s && look_e {
                children.se.disk_into(center, radius_mi, w_bound, e_bound, found);
            }
        }
    }

    // ── Traversal & maintenance ───────────────────────────────────────────

    /// Every waypoint in deterministic NE/NW/SE/SW traversal order.
    pub fn point_list(&self) -> Vec<WaypointId> {
        let mut out = Vec::with_capacity(self.size());
        self.point_list_into(&mut out);
        out
    }

    fn point_list_into(&self, out: &mut Vec<WaypointId>) {
        match &self.children {
            Some(c) => {
                c.ne.point_list_into(out);
                c.nw.point_list_into(out);
                c.se.point_list_into(out);
                c.sw.point_list_into(out);
            }
            None => out.extend(self.points.iter().map(|p| p.id)),
        }
    }

    /// Sort every leaf's point list by the caller's key (route root + label
    /// in practice) so traversal order is deterministic for output.
    pub fn sort_points<K: Ord, F: Fn(WaypointId) -> K>(&mut self, key: &F) {
        match &mut self.children {
            Some(c) => {
                c.ne.sort_points(key);
                c.nw.sort_points(key);
                c.se.sort_points(key);
                c.sw.sort_points(key);
            }
            None => self.points.sort_by_key(|p| key(p.id)),
        }
    }

    /// Number of waypoints stored (colocated points each count).
    pub fn size(&self) -> usize {
        match &self.children {
            Some(c) => c.ne.size() + c.nw.size() + c.se.size() + c.sw.size(),
            None => self.points.len(),
        }
    }

    /// Number of tree nodes, internal and leaf.
    pub fn total_nodes(&self) -> usize {
        match &self.children {
            Some(c) => {
                1 + c.ne.total_nodes() + c.nw.total_nodes() + c.se.total_nodes() + c.sw.total_nodes()
            }
            None => 1,
        }
    }

    /// Sum of leaf unique-location counts.
    pub fn unique_locations(&self) -> usize {
        match &self.children {
            Some(c) => {
                c.ne.unique_locations()
                    + c.nw.unique_locations()
                    + c.se.unique_locations()
                    + c.sw.unique_locations()
            }
            None => self.unique_locations,
        }
    }

    /// Structural validation: internal nodes carry no points, leaves carry
    /// at most [`LEAF_CAPACITY`] unique locations and no children.
    pub fn is_valid(&self) -> bool {
        match &self.children {
            Some(c) => {
                self.points.is_empty()
                    && c.ne.is_valid()
                    && c.nw.is_valid()
                    && c.se.is_valid()
                    && c.sw.is_valid()
            }
            None => self.unique_locations <= LEAF_CAPACITY,
        }
    }

    /// Whether the root has been refined (used by structure tests).
    pub fn refined(&self) -> bool {
        self.children.is_some()
    }
}

impl std::fmt::Display for WaypointQuadtree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WaypointQuadtree at ({},{}) to ({},{})",
            self.min_lat, self.min_lng, self.max_lat, self.max_lng
        )?;
        if self.is_leaf() {
            write!(f, " contains {} waypoints", self.points.len())
        } else {
            write!(f, " REFINED")
        }
    }
}
