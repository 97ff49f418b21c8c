//! Structured error handling with codes, context and recovery suggestions
//!
//! Errors carry:
//! - An error code for programmatic handling
//! - Optional context describing what was being attempted
//! - An optional recovery suggestion shown to the user
//! - A serializable report form for JSON output

use fuelroute_geo::GeoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,
    DataParseError = 2003,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Input errors (4xxx)
    InvalidInput = 4000,
    EmptyRoute = 4001,
    InvalidDistance = 4002,
    EmptyCatalog = 4003,
    InvalidCoordinate = 4004,

    // Catalog errors (5xxx)
    CatalogError = 5000,
    InvalidPrice = 5001,
    MissingStationId = 5002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Input",
            5 => "Catalog",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether this is a caller-contract violation (`4xxx`)
    pub fn is_invalid_input(&self) -> bool {
        self.code.category() == "Input"
    }

    /// Process exit code matching this error's category
    pub fn exit_code(&self) -> i32 {
        match self.code.category() {
            "Input" => exit_codes::INVALID_INPUT,
            "Configuration" => exit_codes::CONFIG_ERROR,
            "IO" | "Catalog" => exit_codes::DATA_ERROR,
            _ => exit_codes::FAILURE,
        }
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
            .with_suggestion("Fix the value in fuelroute.toml or remove it to use the default")
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn empty_route() -> Self {
        Self::new(ErrorCode::EmptyRoute, "Route polyline has no points")
            .with_suggestion("Check the routing response; a route needs at least one coordinate")
    }

    pub fn invalid_distance(miles: f64) -> Self {
        Self::new(
            ErrorCode::InvalidDistance,
            format!("Total route distance must be a positive number of miles, got {}", miles),
        )
    }

    pub fn empty_catalog() -> Self {
        Self::new(ErrorCode::EmptyCatalog, "Station catalog is empty")
            .with_suggestion("Load a price file with at least one priced station")
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CatalogError, message)
    }

    pub fn invalid_price(station_id: &str, price: f64) -> Self {
        Self::new(
            ErrorCode::InvalidPrice,
            format!("Station {} has invalid price {}", station_id, price),
        )
        .with_suggestion("Prices must be finite and non-negative")
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for the command-line front end
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DATA_ERROR: i32 = 4;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::DataParseError, format!("JSON parse error: {}", err))
            .with_source(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let location = err
            .position()
            .map(|pos| format!(" (line {})", pos.line()))
            .unwrap_or_default();
        Error::new(ErrorCode::DataParseError, format!("CSV parse error{}: {}", location, err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<GeoError> for Error {
    fn from(err: GeoError) -> Self {
        let code = match err {
            GeoError::EmptyPolyline => ErrorCode::EmptyRoute,
            GeoError::InvalidCoordinate(_) => ErrorCode::InvalidCoordinate,
            GeoError::PolylineEncoding(_) => ErrorCode::Internal,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
