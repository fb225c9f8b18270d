//! Office geofence and the distance-based validity check

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PresenceError, Result};
use crate::location::GeoPoint;

/// Office latitude used when the remote settings omit it
pub const DEFAULT_OFFICE_LATITUDE: f64 = -6.360427;
/// Office longitude used when the remote settings omit it
pub const DEFAULT_OFFICE_LONGITUDE: f64 = 107.095709;
/// Office name used when the remote settings omit it
pub const DEFAULT_OFFICE_NAME: &str = "SMK Al-Luthfah";
/// Maximum allowed distance from the office in meters
pub const DEFAULT_MAX_RADIUS_M: f64 = 1000.0;
/// Scheduled start of the working day
pub const DEFAULT_START_TIME: &str = "08:00";

/// Circular boundary around the registered office location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeGeofence {
    /// Office location
    pub center: GeoPoint,
    /// Maximum allowed distance from the center in meters
    pub max_radius_m: f64,
    /// Display name of the office
    pub name: String,
}

impl Default for OfficeGeofence {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(DEFAULT_OFFICE_LATITUDE, DEFAULT_OFFICE_LONGITUDE),
            max_radius_m: DEFAULT_MAX_RADIUS_M,
            name: DEFAULT_OFFICE_NAME.to_string(),
        }
    }
}

/// Result of checking a position against a geofence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceCheck {
    pub valid: bool,
    pub distance_m: f64,
    pub max_radius_m: f64,
    pub message: String,
}

impl OfficeGeofence {
    pub fn new(center: GeoPoint, max_radius_m: f64, name: impl Into<String>) -> Self {
        Self {
            center,
            max_radius_m,
            name: name.into(),
        }
    }

    /// Build a geofence from the remote configuration record.
    ///
    /// Each field falls back to its default on its own when it is missing
    /// or does not parse. A negative radius also falls back.
    pub fn from_remote(settings: &RemoteOfficeSettings) -> Self {
        fn parse_or(raw: &Option<String>, fallback: f64) -> f64 {
            raw.as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(fallback)
        }

        Self {
            center: GeoPoint::new(
                parse_or(&settings.office_latitude, DEFAULT_OFFICE_LATITUDE),
                parse_or(&settings.office_longitude, DEFAULT_OFFICE_LONGITUDE),
            ),
            max_radius_m: match parse_or(&settings.max_radius, DEFAULT_MAX_RADIUS_M) {
                radius if radius < 0.0 => {
                    warn!(radius, "Ignoring negative remote geofence radius");
                    DEFAULT_MAX_RADIUS_M
                }
                radius => radius,
            },
            name: settings
                .office_name
                .clone()
                .unwrap_or_else(|| DEFAULT_OFFICE_NAME.to_string()),
        }
    }

    /// Check that the center is a real coordinate and the radius usable
    pub fn validate(&self) -> Result<()> {
        self.center.validate()?;
        if !self.max_radius_m.is_finite() || self.max_radius_m < 0.0 {
            return Err(PresenceError::InvalidRadius(self.max_radius_m));
        }
        Ok(())
    }

    /// Distance from the office center in meters
    pub fn distance_from(&self, point: &GeoPoint) -> f64 {
        point.distance_to(&self.center)
    }

    /// Check whether `point` lies within the allowed radius (inclusive)
    pub fn check(&self, point: &GeoPoint) -> GeofenceCheck {
        let distance_m = self.distance_from(point);
        let valid = distance_m <= self.max_radius_m;
        let message = if valid {
            format!(
                "Location valid ({}m from {})",
                distance_m.round() as i64,
                self.name
            )
        } else {
            format!(
                "Location too far! You are {}m from {} (maximum {}m)",
                distance_m.round() as i64,
                self.name,
                self.max_radius_m.round() as i64
            )
        };

        GeofenceCheck {
            valid,
            distance_m,
            max_radius_m: self.max_radius_m,
            message,
        }
    }
}

/// Office settings as returned by the remote configuration service.
///
/// Numeric values arrive as strings and any field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteOfficeSettings {
    #[serde(default)]
    pub default_start_time: Option<String>,
    #[serde(default)]
    pub office_latitude: Option<String>,
    #[serde(default)]
    pub office_longitude: Option<String>,
    #[serde(default)]
    pub office_name: Option<String>,
    #[serde(default)]
    pub max_radius: Option<String>,
}

impl RemoteOfficeSettings {
    /// Scheduled start time, defaulting to 08:00
    pub fn start_time(&self) -> &str {
        self.default_start_time
            .as_deref()
            .unwrap_or(DEFAULT_START_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office() -> OfficeGeofence {
        OfficeGeofence::new(GeoPoint::new(0.0, 0.0), 1000.0, "Main Office")
    }

    #[test]
    fn test_inside_radius_is_valid() {
        let check = office().check(&GeoPoint::new(0.001, 0.0));
        assert!(check.valid);
        assert_eq!(check.message, "Location valid (111m from Main Office)");
    }

    #[test]
    fn test_outside_radius_is_rejected() {
        let check = office().check(&GeoPoint::new(0.1, 0.0));
        assert!(!check.valid);
        assert_eq!(
            check.message,
            "Location too far! You are 11119m from Main Office (maximum 1000m)"
        );
    }

    #[test]
    fn test_boundary_distance_is_valid() {
        let point = GeoPoint::new(0.005, 0.0);
        let mut fence = office();
        fence.max_radius_m = fence.distance_from(&point);
        assert!(fence.check(&point).valid);
    }

    #[test]
    fn test_from_remote_uses_parsed_values() {
        let settings = RemoteOfficeSettings {
            default_start_time: Some("07:30".to_string()),
            office_latitude: Some("-6.2".to_string()),
            office_longitude: Some(" 106.8 ".to_string()),
            office_name: Some("Branch".to_string()),
            max_radius: Some("250".to_string()),
        };
        let fence = OfficeGeofence::from_remote(&settings);
        assert_eq!(fence.center, GeoPoint::new(-6.2, 106.8));
        assert_eq!(fence.max_radius_m, 250.0);
        assert_eq!(fence.name, "Branch");
        assert_eq!(settings.start_time(), "07:30");
    }

    #[test]
    fn test_from_remote_falls_back_per_field() {
        let settings = RemoteOfficeSettings {
            office_latitude: Some("not-a-number".to_string()),
            max_radius: Some("500".to_string()),
            ..Default::default()
        };
        let fence = OfficeGeofence::from_remote(&settings);
        assert_eq!(fence.center.latitude, DEFAULT_OFFICE_LATITUDE);
        assert_eq!(fence.center.longitude, DEFAULT_OFFICE_LONGITUDE);
        assert_eq!(fence.max_radius_m, 500.0);
        assert_eq!(fence.name, DEFAULT_OFFICE_NAME);
        assert_eq!(settings.start_time(), DEFAULT_START_TIME);
    }

    #[test]
    fn test_from_remote_ignores_negative_radius() {
        let settings = RemoteOfficeSettings {
            max_radius: Some("-5".to_string()),
            ..Default::default()
        };
        let fence = OfficeGeofence::from_remote(&settings);
        assert_eq!(fence.max_radius_m, DEFAULT_MAX_RADIUS_M);
        assert!(fence.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_radius() {
        let mut fence = office();
        fence.max_radius_m = -1.0;
        assert!(matches!(fence.validate(), Err(PresenceError::InvalidRadius(_))));
    }
}
