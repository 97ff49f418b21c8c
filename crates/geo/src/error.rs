//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A route polyline needs at least one point
    #[error("Polyline has no points")]
    EmptyPolyline,

    /// Polyline could not be encoded
    #[error("Polyline encoding failed: {0}")]
    PolylineEncoding(String),
}

/// Error code for integration with fuelroute-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Empty polyline
    EmptyPolyline = 10002,
    /// Polyline encoding failure
    PolylineEncoding = 10003,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::EmptyPolyline => GeoErrorCode::EmptyPolyline,
            GeoError::PolylineEncoding(_) => GeoErrorCode::PolylineEncoding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GeoError::EmptyPolyline.code() as u32, 10002);
        assert_eq!(
            GeoError::InvalidCoordinate("x".into()).code(),
            GeoErrorCode::InvalidCoordinate
        );
    }
}
