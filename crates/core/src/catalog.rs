//! Station catalog loading
//!
//! Turns raw price records into an immutable, deduplicated catalog of
//! geocoded stations:
//! - names and cities are whitespace-trimmed
//! - duplicate station ids collapse to the cheapest price
//! - coordinates come from an injected `City_ST` lookup table, then the
//!   state centroid, then the continental default centroid
//!
//! The catalog is a read-only snapshot; share it by reference or `Arc`
//! between concurrent planning calls.

use crate::error::{Error, ErrorCode, Result, ResultExt};
use fuelroute_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Fallback coordinate when neither city nor state resolves.
pub const DEFAULT_CENTROID: Coordinate = Coordinate::new(39.5, -98.35);

/// Opaque, catalog-unique station identifier.
///
/// Price feeds use numeric ids; anything else is accepted as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawStationId", into = "String")]
pub struct StationId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStationId {
    Number(u64),
    Text(String),
}

impl From<RawStationId> for StationId {
    fn from(raw: RawStationId) -> Self {
        match raw {
            RawStationId::Number(n) => StationId(n.to_string()),
            RawStationId::Text(s) => StationId(s.trim().to_string()),
        }
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A priced, geocoded fuel station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub location: Coordinate,
    /// Retail price per gallon
    pub price: f64,
}

/// One row of a price feed, before cleanup and geocoding.
///
/// Accepts both snake_case fields and the column headers used by OPIS
/// truck-stop price exports.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRecord {
    #[serde(alias = "OPIS Truckstop ID")]
    pub id: StationId,
    #[serde(alias = "Truckstop Name")]
    pub name: String,
    #[serde(alias = "Address", default)]
    pub address: String,
    #[serde(alias = "City")]
    pub city: String,
    #[serde(alias = "State")]
    pub state: String,
    #[serde(alias = "Retail Price")]
    pub price: f64,
}

/// Where a station's coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeSource {
    /// Exact `City_ST` entry
    City,
    /// State centroid
    StateCentroid,
    /// Continental default centroid
    Default,
}

/// Immutable `City_ST -> coordinate` table produced by an offline geocoding pass.
#[derive(Debug, Clone, Default)]
pub struct GeocodeTable {
    entries: HashMap<String, Coordinate>,
}

impl GeocodeTable {
    /// Build the lookup key for a city/state pair.
    pub fn key(city: &str, state: &str) -> String {
        format!("{}_{}", city.trim(), state.trim())
    }

    pub fn new(entries: HashMap<String, Coordinate>) -> Self {
        Self { entries }
    }

    /// Parse a JSON object of `"City_ST": [lat, lon]` pairs.
    ///
    /// Entries outside lat [-90, 90] / lon [-180, 180] are dropped with a
    /// warning; a table written as `[lon, lat]` shows up here.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, [f64; 2]> = serde_json::from_str(content)?;
        let total = raw.len();
        let entries: HashMap<String, Coordinate> = raw
            .into_iter()
            .map(|(k, v)| (k, Coordinate::from(v)))
            .filter(|(_, coord)| coord.is_valid())
            .collect();

        if entries.len() < total {
            tracing::warn!(
                dropped = total - entries.len(),
                kept = entries.len(),
                "Geocode entries out of range, expected [lat, lon] pairs"
            );
        }

        Ok(Self { entries })
    }

    /// Load the table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| map_read_error(path, e))?;
        Self::from_json(&content).context(format!("Geocode table: {}", path.display()))
    }

    /// Load the table, falling back to an empty table if it is missing or unreadable.
    ///
    /// Stations then resolve through state centroids only.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %e.message,
                    "Geocode table unavailable, using state centroids"
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, city: &str, state: &str) -> Option<Coordinate> {
        self.entries.get(&Self::key(city, state)).copied()
    }

    /// Resolve a city/state to a coordinate, noting which tier answered.
    pub fn resolve(&self, city: &str, state: &str) -> (Coordinate, GeocodeSource) {
        if let Some(coord) = self.get(city, state) {
            (coord, GeocodeSource::City)
        } else if let Some(coord) = state_centroid(state) {
            (coord, GeocodeSource::StateCentroid)
        } else {
            (DEFAULT_CENTROID, GeocodeSource::Default)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How many catalog stations resolved at each geocoding tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeocodeStats {
    pub city: usize,
    pub state_centroid: usize,
    pub default_centroid: usize,
}

/// Deduplicated, geocoded station snapshot.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
    geocode_stats: GeocodeStats,
}

impl StationCatalog {
    /// Wrap stations that already carry coordinates.
    ///
    /// Duplicate ids still collapse to the cheapest entry.
    pub fn from_stations(stations: Vec<Station>) -> Result<Self> {
        for station in &stations {
            validate_price(station.id.as_str(), station.price)?;
        }
        Ok(Self {
            stations: dedupe_cheapest(stations),
            geocode_stats: GeocodeStats::default(),
        })
    }

    /// Clean, deduplicate and geocode raw price records.
    pub fn from_records(records: Vec<PriceRecord>, geocodes: &GeocodeTable) -> Result<Self> {
        let mut stats = GeocodeStats::default();
        let mut stations = Vec::with_capacity(records.len());

        for record in records {
            if record.id.as_str().is_empty() {
                return Err(Error::new(
                    ErrorCode::MissingStationId,
                    format!("Price record for '{}' has no station id", record.name.trim()),
                ));
            }
            validate_price(record.id.as_str(), record.price)?;

            let city = record.city.trim().to_string();
            let state = record.state.trim().to_string();
            let (location, source) = geocodes.resolve(&city, &state);
            match source {
                GeocodeSource::City => stats.city += 1,
                GeocodeSource::StateCentroid => stats.state_centroid += 1,
                GeocodeSource::Default => stats.default_centroid += 1,
            }

            stations.push(Station {
                id: record.id,
                name: record.name.trim().to_string(),
                address: record.address.trim().to_string(),
                city,
                state,
                location,
                price: record.price,
            });
        }

        let raw_count = stations.len();
        let stations = dedupe_cheapest(stations);

        tracing::info!(
            records = raw_count,
            stations = stations.len(),
            geocoded = stats.city,
            state_centroid = stats.state_centroid,
            default_centroid = stats.default_centroid,
            "Station catalog built"
        );

        Ok(Self {
            stations,
            geocode_stats: stats,
        })
    }

    /// Load price records and geocode them.
    ///
    /// `.csv` files are read as a headered price export (extra columns are
    /// ignored); anything else is parsed as a JSON array of records.
    pub fn load(prices_path: impl AsRef<Path>, geocodes: &GeocodeTable) -> Result<Self> {
        let path = prices_path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| map_read_error(path, e))?;
        let records = if is_csv(path) {
            price_records_from_csv(&content)
        } else {
            serde_json::from_str(&content).map_err(Error::from)
        }
        .context(format!("Price file: {}", path.display()))?;
        Self::from_records(records, geocodes)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn geocode_stats(&self) -> GeocodeStats {
        self.geocode_stats
    }

    /// Mean price across the whole catalog, `None` when empty.
    ///
    /// Used to price a plan that found no stops.
    pub fn average_price(&self) -> Option<f64> {
        if self.stations.is_empty() {
            return None;
        }
        let total: f64 = self.stations.iter().map(|s| s.price).sum();
        Some(total / self.stations.len() as f64)
    }

    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.stations.iter().find(|s| &s.id == id)
    }
}

fn validate_price(id: &str, price: f64) -> Result<()> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_price(id, price))
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Parse a headered CSV price export into records.
pub fn price_records_from_csv(content: &str) -> Result<Vec<PriceRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let records = reader
        .deserialize::<PriceRecord>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
    Ok(records)
}

fn map_read_error(path: &Path, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::file_not_found(path)
    } else {
        Error::from(err).with_context(format!("Reading {}", path.display()))
    }
}

/// Keep one station per id, the cheapest; ties keep the first seen.
/// Surviving stations stay in first-seen order.
fn dedupe_cheapest(stations: Vec<Station>) -> Vec<Station> {
    let mut index: HashMap<StationId, usize> = HashMap::with_capacity(stations.len());
    let mut kept: Vec<Station> = Vec::with_capacity(stations.len());

    for station in stations {
        match index.get(&station.id) {
            Some(&i) => {
                if station.price < kept[i].price {
                    kept[i] = station;
                }
            }
            None => {
                index.insert(station.id.clone(), kept.len());
                kept.push(station);
            }
        }
    }

    kept
}

/// Geographic centroid of a US state by postal abbreviation.
pub fn state_centroid(state: &str) -> Option<Coordinate> {
    let (lat, lon) = match state.trim().to_ascii_uppercase().as_str() {
        "AL" => (32.806671, -86.791130),
        "AK" => (61.370716, -152.404419),
        "AZ" => (33.729759, -111.431221),
        "AR" => (34.969704, -92.373123),
        "CA" => (36.116203, -119.681564),
        "CO" => (39.059811, -105.311104),
        "CT" => (41.597782, -72.755371),
        "DE" => (39.318523, -75.507141),
        "FL" => (27.766279, -81.686783),
        "GA" => (33.040619, -83.643074),
        "HI" => (21.094318, -157.498337),
        "ID" => (44.240459, -114.478828),
        "IL" => (40.349457, -88.986137),
        "IN" => (39.849426, -86.258278),
        "IA" => (42.011539, -93.210526),
        "KS" => (38.526600, -96.726486),
        "KY" => (37.668140, -84.670067),
        "LA" => (31.169960, -91.867805),
        "ME" => (44.693947, -69.381927),
        "MD" => (39.063946, -76.802101),
        "MA" => (42.230171, -71.530106),
        "MI" => (43.326618, -84.536095),
        "MN" => (45.694454, -93.900192),
        "MS" => (32.741646, -89.678696),
        "MO" => (38.456085, -92.288368),
        "MT" => (46.921925, -110.454353),
        "NE" => (41.125370, -98.268082),
        "NV" => (38.313515, -117.055374),
        "NH" => (43.452492, -71.563896),
        "NJ" => (40.298904, -74.521011),
        "NM" => (34.840515, -106.248482),
        "NY" => (42.165726, -74.948051),
        "NC" => (35.630066, -79.806419),
        "ND" => (47.528912, -99.784012),
        "OH" => (40.388783, -82.764915),
        "OK" => (35.565342, -96.928917),
        "OR" => (44.572021, -122.070938),
        "PA" => (40.590752, -77.209755),
        "RI" => (41.680893, -71.511780),
        "SC" => (33.856892, -80.945007),
        "SD" => (44.299782, -99.438828),
        "TN" => (35.747845, -86.692345),
        "TX" => (31.054487, -97.563461),
        "UT" => (40.150032, -111.862434),
        "VT" => (44.045876, -72.710686),
        "VA" => (37.769337, -78.169968),
        "WA" => (47.400902, -121.490494),
        "WV" => (38.491226, -80.954453),
        "WI" => (44.268543, -89.616508),
        "WY" => (42.755966, -107.302490),
        _ => return None,
    };
    Some(Coordinate::new(lat, lon))
}
