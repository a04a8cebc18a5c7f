//! Geographic coordinate type and spherical-earth math.
//!
//! `GeoPoint` uses `f64` latitude/longitude: colocation detection relies on
//! *exact* coordinate equality across the whole corpus, so single precision
//! is not an option here.
//!
//! Distances use the haversine formula on a spherical earth, scaled by a
//! fixed factor to account for route curvature that the plotted waypoints do
//! not capture.

/// Mean earth radius in miles, used for place-radius containment.
pub const EARTH_RADIUS_MI: f64 = 3963.1;

/// Mean earth diameter in miles, used in the haversine distance.
pub const EARTH_DIAMETER_MI: f64 = 7926.2;

/// Scale factor applied to great-circle distances to compensate for
/// unplotted curves between waypoints.
pub const ROUTE_SCALE_FACTOR: f64 = 1.02112;

/// A geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Exact coordinate equality — the colocation criterion.
    #[inline]
    pub fn same_coords(self, other: GeoPoint) -> bool {
        self.lat == other.lat && self.lng == other.lng
    }

    /// Whether both coordinates are strictly within `tolerance` degrees of
    /// `other` — the near-miss criterion (exact matches also pass; callers
    /// exclude them separately).
    #[inline]
    pub fn nearby(self, other: GeoPoint, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() < tolerance && (self.lng - other.lng).abs() < tolerance
    }

    /// Route-adjusted distance in miles to `other`.
    ///
    /// Haversine on a spherical earth, scaled by [`ROUTE_SCALE_FACTOR`].
    pub fn distance_mi(self, other: GeoPoint) -> f64 {
        let rlat1 = self.lat.to_radians();
        let rlng1 = self.lng.to_radians();
        let rlat2 = other.lat.to_radians();
        let rlng2 = other.lng.to_radians();

        let hav = ((rlat2 - rlat1) / 2.0).sin().powi(2)
            + rlat1.cos() * rlat2.cos() * ((rlng2 - rlng1) / 2.0).sin().powi(2);

        hav.sqrt().asin() * EARTH_DIAMETER_MI * ROUTE_SCALE_FACTOR
    }

    /// The angle in degrees formed at `self` between the chord from `pred`
    /// and the chord to `succ`, both taken on the unit sphere.
    ///
    /// 180° means doubling straight back; the sharp-angle datacheck fires
    /// above 135°.  Undefined (NaN) if either neighbor coincides with
    /// `self`; callers must exclude that case first.
    pub fn chord_angle_deg(self, pred: GeoPoint, succ: GeoPoint) -> f64 {
        let (x0, y0, z0) = unit_vector(pred);
        let (x1, y1, z1) = unit_vector(self);
        let (x2, y2, z2) = unit_vector(succ);

        let dot = (x2 - x1) * (x1 - x0) + (y2 - y1) * (y1 - y0) + (z2 - z1) * (z1 - z0);
        let norm = ((x2 - x1).powi(2) + (y2 - y1).powi(2) + (z2 - z1).powi(2))
            * ((x1 - x0).powi(2) + (y1 - y0).powi(2) + (z1 - z0).powi(2));

        (dot / norm.sqrt()).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Great-circle distance in miles via the spherical law of cosines.
    ///
    /// Slightly cheaper than the haversine and *not* route-scaled; used for
    /// place-radius containment where the radius is a plain geographic
    /// distance.
    pub fn arc_distance_mi(self, other: GeoPoint) -> f64 {
        let rlat1 = self.lat.to_radians();
        let rlat2 = other.lat.to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        (rlat1.cos() * rlat2.cos() * dlng.cos() + rlat1.sin() * rlat2.sin())
            .clamp(-1.0, 1.0)
            .acos()
            * EARTH_RADIUS_MI
    }
}

fn unit_vector(p: GeoPoint) -> (f64, f64, f64) {
    let rlat = p.lat.to_radians();
    let rlng = p.lng.to_radians();
    (rlng.cos() * rlat.cos(), rlng.sin() * rlat.cos(), rlat.sin())
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.lat, self.lng)
    }
}
