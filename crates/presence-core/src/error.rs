//! Error types for presence marking
//!
//! The geometric and heuristic checks never fail; errors only come from
//! malformed input at the edges (coordinates, arrival times, config files).

use thiserror::Error;

/// Main error type for presence operations
#[derive(Error, Debug)]
pub enum PresenceError {
    // ===== Input Errors =====
    /// Coordinate outside the valid latitude/longitude range
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Geofence radius that is negative or not finite
    #[error("Invalid geofence radius: {0}m")]
    InvalidRadius(f64),

    /// Arrival time that is not HH:MM or HH:MM:SS
    #[error("Invalid arrival time: {0}")]
    InvalidArrivalTime(String),

    /// Negative or non-finite sensor reading
    #[error("Invalid {field} reading: {value}")]
    InvalidReading { field: &'static str, value: f64 },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    // ===== Serialization Errors =====
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Request body that is not valid JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Request body sent without a JSON content type
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    // ===== General Errors =====
    /// I/O failure outside of a missing file
    #[error("I/O error: {0}")]
    Io(String),

    /// Request did not finish in time
    #[error("Request timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PresenceError {
    /// Check if this error is a client error (bad input)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PresenceError::InvalidCoordinate { .. }
                | PresenceError::InvalidRadius(_)
                | PresenceError::InvalidArrivalTime(_)
                | PresenceError::InvalidReading { .. }
                | PresenceError::Deserialization(_)
                | PresenceError::MalformedBody(_)
                | PresenceError::UnsupportedContentType(_)
        )
    }

    /// Get an error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PresenceError::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            PresenceError::InvalidRadius(_) => "INVALID_RADIUS",
            PresenceError::InvalidArrivalTime(_) => "INVALID_ARRIVAL_TIME",
            PresenceError::InvalidReading { .. } => "INVALID_READING",
            PresenceError::InvalidConfig(_) => "INVALID_CONFIG",
            PresenceError::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            PresenceError::Serialization(_) => "SERIALIZATION_ERROR",
            PresenceError::Deserialization(_) => "DESERIALIZATION_ERROR",
            PresenceError::MalformedBody(_) => "MALFORMED_BODY",
            PresenceError::UnsupportedContentType(_) => "UNSUPPORTED_CONTENT_TYPE",
            PresenceError::Io(_) => "IO_ERROR",
            PresenceError::Timeout { .. } => "TIMEOUT",
            PresenceError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for presence operations
pub type Result<T> = std::result::Result<T, PresenceError>;

impl From<std::io::Error> for PresenceError {
    fn from(err: std::io::Error) -> Self {
        PresenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PresenceError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            PresenceError::Deserialization(err.to_string())
        } else {
            PresenceError::Serialization(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = PresenceError::InvalidRadius(-5.0);
        assert_eq!(err.error_code(), "INVALID_RADIUS");
        assert_eq!(err.to_string(), "Invalid geofence radius: -5m");
    }

    #[test]
    fn test_is_client_error() {
        assert!(PresenceError::InvalidArrivalTime("25:00".to_string()).is_client_error());
        assert!(!PresenceError::ConfigNotFound("x.json".to_string()).is_client_error());
        assert!(!PresenceError::Timeout { duration_ms: 10 }.is_client_error());
    }

    #[test]
    fn test_json_syntax_error_maps_to_deserialization() {
        let err: PresenceError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "DESERIALIZATION_ERROR");
    }
}
