//! Geospatial primitives for fuel-stop planning.
//!
//! This crate provides:
//! - Haversine distance calculations in miles (and kilometers)
//! - Batch distance computation with optional parallelism
//! - Route sampling: the interpolated point at a cumulative distance
//! - Polyline encoding and thinning for compact route payloads
//!
//! # Example
//!
//! ```
//! use fuelroute_geo::{haversine_miles, Coordinate};
//!
//! let chicago = Coordinate::new(41.8781, -87.6298);
//! let st_louis = Coordinate::new(38.6270, -90.1994);
//!
//! let miles = haversine_miles(&chicago, &st_louis);
//! assert!((miles - 262.0).abs() < 5.0);
//! ```

mod haversine;
pub mod batch;
mod error;
pub mod encoding;
pub mod route;

pub use haversine::{
    haversine_distance, haversine_miles, EARTH_RADIUS_KM, EARTH_RADIUS_MILES,
};
pub use batch::{distances_by, distances_from};
pub use error::{GeoError, GeoErrorCode, Result};
pub use route::{locate_on_route, point_at_distance, polyline_length_miles, RoutePosition};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Returns the coordinate if it is in range, otherwise an `InvalidCoordinate` error.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({}, {}) is outside lat [-90, 90] / lon [-180, 180]",
                self.latitude, self.longitude
            )))
        }
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self::new(lat, lon)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.latitude, coord.longitude)
    }
}
