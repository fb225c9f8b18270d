//! Geographic location types and great-circle distance

use serde::{Deserialize, Serialize};

use crate::error::{PresenceError, Result};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point without range checks
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Create a point, rejecting coordinates outside the valid ranges
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    /// Check that both coordinates are finite and within range
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(PresenceError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Calculate distance to another point in meters (Haversine formula)
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }
}

/// Great-circle distance between two points in meters.
///
/// Uses the `atan2` form of the Haversine formula over a sphere of radius
/// [`EARTH_RADIUS_M`]. Symmetric, and exactly zero for coincident points.
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// A device-reported location fix with optional sensor readings.
///
/// Absent readings mean the provider did not report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Reported position
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Horizontal accuracy radius in meters
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Ground speed in meters per second
    #[serde(default)]
    pub speed: Option<f64>,
    /// Altitude in meters above sea level
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Set by the OS when a mock provider produced the fix
    #[serde(default)]
    pub is_from_mock_provider: bool,
}

impl LocationFix {
    /// A fix with only a position and every optional reading absent
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            accuracy: None,
            speed: None,
            altitude: None,
            is_from_mock_provider: false,
        }
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    pub fn with_speed(mut self, meters_per_second: f64) -> Self {
        self.speed = Some(meters_per_second);
        self
    }

    pub fn with_altitude(mut self, meters: f64) -> Self {
        self.altitude = Some(meters);
        self
    }

    pub fn from_mock_provider(mut self, mock: bool) -> Self {
        self.is_from_mock_provider = mock;
        self
    }

    /// Check the position and the non-negative readings
    pub fn validate(&self) -> Result<()> {
        self.point.validate()?;
        for (field, value) in [("accuracy", self.accuracy), ("speed", self.speed)] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(PresenceError::InvalidReading { field, value });
                }
            }
        }
        Ok(())
    }
}
