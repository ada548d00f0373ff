//! Geographic coordinate type and great-circle distance.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Ranking compares distances of
//! a few metres between nearby facilities, so the extra precision over `f32`
//! matters here even though the road graph itself stores `f32` lengths.

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres used by every great-circle computation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
///
/// Fields are public for cheap access on hot paths.  Values coming from user
/// input or datasets should go through [`GeoPoint::validated`]; a point built
/// with [`GeoPoint::new`] is assumed valid by the caller.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Checked constructor: both components finite and inside the WGS-84
    /// range.
    pub fn validated(lat: f64, lon: f64) -> CoreResult<Self> {
        GeoPoint::new(lat, lon).validate()
    }

    /// Return `self` if valid, otherwise [`CoreError::InvalidInput`].
    pub fn validate(self) -> CoreResult<Self> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(CoreError::InvalidInput {
                lat:    self.lat,
                lon:    self.lon,
                reason: "coordinates must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoreError::InvalidInput {
                lat:    self.lat,
                lon:    self.lon,
                reason: "latitude outside [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(CoreError::InvalidInput {
                lat:    self.lat,
                lon:    self.lon,
                reason: "longitude outside [-180, 180]",
            });
        }
        Ok(self)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.validate().is_ok()
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Exactly zero for identical points and symmetric in its arguments.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        // Rounding can push `a` a hair above 1 for antipodal points.
        2.0 * EARTH_RADIUS_M * a.clamp(0.0, 1.0).sqrt().asin()
    }

    /// Position on the unit sphere (`x`, `y`, `z`).
    ///
    /// Euclidean (chord) distance between two unit vectors is monotonic in
    /// great-circle distance, so nearest-neighbour order in this space equals
    /// haversine order.
    #[inline]
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

/// Free-function form of [`GeoPoint::distance_m`].
#[inline]
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    a.distance_m(b)
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
