//! Geographic disk restriction for area subgraphs.

use hwy_core::geo::{EARTH_DIAMETER_MI, EARTH_RADIUS_MI};
use hwy_core::{EdgeId, GeoPoint, VertexId};
use hwy_spatial::WaypointQuadtree;

use crate::graph::HighwayGraph;

/// A place name with a center and radius (miles) bounding an area graph.
#[derive(Clone, Debug)]
pub struct PlaceRadius {
    pub descr: String,
    pub title: String,
    pub center: GeoPoint,
    pub radius: f64,
}

impl PlaceRadius {
    pub fn new(descr: String, title: String, lat: f64, lng: f64, radius: f64) -> Self {
        Self { descr, title, center: GeoPoint::new(lat, lng), radius }
    }

    /// Whether the disk contains this point.
    pub fn contains_point(&self, p: GeoPoint) -> bool {
        self.center.arc_distance_mi(p) <= self.radius
    }

    /// Whether the disk contains both endpoints of an edge.
    pub fn contains_edge(&self, graph: &HighwayGraph, e: EdgeId) -> bool {
        let edge = graph.edge(e);
        self.contains_point(graph.vertex(edge.vertex1).point)
            && self.contains_point(graph.vertex(edge.vertex2).point)
    }

    /// All graph vertices within the disk, found via the quadtree.
    ///
    /// The longitude window of the search derives from the radius at this
    /// latitude; windows crossing the antimeridian wrap into up to two
    /// extra searches, and a disk touching a pole degenerates to the full
    /// longitude range.
    pub fn vertices(&self, quadtree: &WaypointQuadtree, graph: &HighwayGraph) -> Vec<VertexId> {
        // Near a pole the longitude-delta computation fails; the disk spans
        // every longitude.
        if (90.0 - self.center.lat.abs()).to_radians() <= self.radius / EARTH_DIAMETER_MI {
            return self.search(quadtree, graph, -180.0, 180.0);
        }

        let rlat = self.center.lat.to_radians();
        let cos_term =
            ((self.radius / EARTH_RADIUS_MI).cos() - rlat.sin().powi(2)) / rlat.cos().powi(2);
        let lngdelta = cos_term.clamp(-1.0, 1.0).acos().to_degrees();
        let mut w_bound = self.center.lng - lngdelta;
        let mut e_bound = self.center.lng + lngdelta;

        let mut found = self.search(quadtree, graph, w_bound, e_bound);

        // window spills past the antimeridian to the west
        if w_bound <= -180.0 {
            while w_bound <= -180.0 {
                w_bound += 360.0;
            }
            found.extend(self.search(quadtree, graph, w_bound, 180.0));
        }
        // or to the east
        if e_bound >= 180.0 {
            while e_bound >= 180.0 {
                e_bound -= 360.0;
            }
            found.extend(self.search(quadtree, graph, -180.0, e_bound));
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    fn search(
        &self,
        quadtree: &WaypointQuadtree,
        graph: &HighwayGraph,
        w_bound: f64,
        e_bound: f64,
    ) -> Vec<VertexId> {
        quadtree
            .points_in_disk(self.center, self.radius, w_bound, e_bound)
            .into_iter()
            .filter_map(|w| graph.vertex_of_waypoint.get(&w).copied())
            .collect()
    }
}
