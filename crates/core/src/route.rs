//! Routes handed over by the routing collaborator.
//!
//! Geocoding and turn-by-turn routing live outside this crate. Whatever
//! produces routes implements [`RouteSource`]; the shipped implementation
//! reads a JSON document saved from a routing service response.

use crate::error::{Error, ErrorCode, Result, ResultExt};
use fuelroute_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named, geocoded route endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(alias = "location")]
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

impl Endpoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// A driving route: total distance, duration and the road geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub total_distance_miles: f64,
    #[serde(default)]
    pub duration_seconds: f64,
    /// `[lat, lon]` pairs from origin to destination
    #[serde(with = "lat_lon_pairs", alias = "polyline_coords")]
    pub polyline: Vec<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Endpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Endpoint>,
}

impl Route {
    pub fn new(total_distance_miles: f64, polyline: Vec<Coordinate>) -> Self {
        Self {
            total_distance_miles,
            duration_seconds: 0.0,
            polyline,
            start: None,
            end: None,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let route: Route = serde_json::from_str(content)?;
        if let Some(bad) = route.polyline.iter().find(|c| !c.is_valid()) {
            return Err(Error::new(
                ErrorCode::InvalidCoordinate,
                format!("Route point ({}, {}) is out of range", bad.latitude, bad.longitude),
            )
            .with_suggestion("Route coordinates must be [lat, lon] pairs"));
        }
        Ok(route)
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds / 3600.0
    }
}

/// Anything that can produce a route for planning.
pub trait RouteSource {
    fn route(&self) -> Result<Route>;
}

/// A route saved as JSON on disk.
#[derive(Debug, Clone)]
pub struct RouteFile {
    path: PathBuf,
}

impl RouteFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RouteSource for RouteFile {
    fn route(&self) -> Result<Route> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(&self.path)
            } else {
                Error::from(e)
            }
        })?;
        Route::from_json(&content).context(format!("Route file: {}", self.path.display()))
    }
}

mod lat_lon_pairs {
    use fuelroute_geo::Coordinate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(points: &[Coordinate], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(points.iter().map(|c| [c.latitude, c.longitude]))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Coordinate>, D::Error> {
        let pairs: Vec<[f64; 2]> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(Coordinate::from).collect())
    }
}
