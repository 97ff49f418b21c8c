//! Configuration schema definitions
//!
//! Every field has a default, so an empty file (or no file) yields the
//! standard long-haul profile: 500 mile range, refuel every 400 miles,
//! 10 miles per gallon, 75/150 mile station search.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub vehicle: VehicleConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl ConfigSchema {
    /// Reject values the planner cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.vehicle.validate()?;
        self.search.validate()
    }
}

/// Vehicle profile used for waypoint spacing and fuel math
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VehicleConfig {
    /// Distance a full tank covers
    #[serde(default = "default_max_range")]
    pub max_range_miles: f64,

    /// Spacing between refuel waypoints on long routes
    #[serde(default = "default_refuel_interval")]
    pub refuel_interval_miles: f64,

    /// Fuel economy in miles per gallon
    #[serde(default = "default_mpg")]
    pub mpg: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_range_miles: default_max_range(),
            refuel_interval_miles: default_refuel_interval(),
            mpg: default_mpg(),
        }
    }
}

impl VehicleConfig {
    fn validate(&self) -> Result<()> {
        positive("vehicle.max_range_miles", self.max_range_miles)?;
        positive("vehicle.refuel_interval_miles", self.refuel_interval_miles)?;
        positive("vehicle.mpg", self.mpg)?;
        if self.refuel_interval_miles > self.max_range_miles {
            return Err(Error::config_validation(format!(
                "vehicle.refuel_interval_miles ({}) exceeds vehicle.max_range_miles ({})",
                self.refuel_interval_miles, self.max_range_miles
            )));
        }
        Ok(())
    }
}

fn default_max_range() -> f64 {
    500.0
}

fn default_refuel_interval() -> f64 {
    400.0
}

fn default_mpg() -> f64 {
    10.0
}

/// Station search around each waypoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// First search radius
    #[serde(default = "default_primary_radius")]
    pub primary_radius_miles: f64,

    /// Widened radius when the first search finds nothing
    #[serde(default = "default_fallback_radius")]
    pub fallback_radius_miles: f64,

    /// Candidates kept per waypoint (best stop plus alternatives)
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_radius_miles: default_primary_radius(),
            fallback_radius_miles: default_fallback_radius(),
            top_n: default_top_n(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        positive("search.primary_radius_miles", self.primary_radius_miles)?;
        positive("search.fallback_radius_miles", self.fallback_radius_miles)?;
        if self.fallback_radius_miles < self.primary_radius_miles {
            return Err(Error::config_validation(format!(
                "search.fallback_radius_miles ({}) is smaller than search.primary_radius_miles ({})",
                self.fallback_radius_miles, self.primary_radius_miles
            )));
        }
        if self.top_n == 0 {
            return Err(Error::config_validation("search.top_n must be at least 1"));
        }
        Ok(())
    }
}

fn default_primary_radius() -> f64 {
    75.0
}

fn default_fallback_radius() -> f64 {
    150.0
}

fn default_top_n() -> usize {
    3
}

/// Default data locations for the command-line front end
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CatalogConfig {
    /// Price records (JSON array)
    #[serde(default)]
    pub prices_path: Option<String>,

    /// `City_ST -> [lat, lon]` table (JSON object)
    #[serde(default)]
    pub geocoded_path: Option<String>,
}

/// Logging output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::config_validation(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}
