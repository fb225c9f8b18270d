//! Presence Core - Geofenced presence marking with fake-location detection
//!
//! This crate decides whether a staff member may mark presence from a mobile
//! device: the reported position must be inside the office geofence, and the
//! location fix must not look spoofed.
//!
//! # Modules
//!
//! - [`location`] - Geographic points, location fixes and Haversine distance
//! - [`geofence`] - Office geofence and the radius check
//! - [`authenticity`] - Layered fake-location heuristic
//! - [`presence`] - Presence gate combining both checks
//! - [`config`] - Configuration types
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust
//! use presence_core::{
//!     GeoPoint, LocationFix, NoPackages, OfficeGeofence, PresenceGate, SpoofingAppList,
//! };
//! use presence_core::presence::{parse_arrival_time, PresenceAttempt};
//!
//! let office = OfficeGeofence::new(GeoPoint::new(-6.360427, 107.095709), 1000.0, "Main Office");
//! let gate = PresenceGate::new(office, SpoofingAppList::default());
//!
//! let here = GeoPoint::new(-6.3610, 107.0960);
//! let attempt = PresenceAttempt {
//!     member_id: 42,
//!     arrival_time: parse_arrival_time("07:58:00").unwrap(),
//!     point: here,
//!     fix: Some(LocationFix::new(here).with_accuracy(8.0)),
//! };
//!
//! let outcome = gate.evaluate(&attempt, &NoPackages);
//! assert!(outcome.is_accepted());
//! ```

pub mod location;
pub mod geofence;
pub mod authenticity;
pub mod presence;

pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{PresenceError, Result};

pub use location::{haversine_distance, GeoPoint, LocationFix, EARTH_RADIUS_M};
pub use geofence::{GeofenceCheck, OfficeGeofence, RemoteOfficeSettings};
pub use authenticity::{
    detect_fake_location, AuthenticityVerdict, Layer, NoPackages, PackageLookup, SpoofingAppList,
};
pub use presence::{
    AttendanceRecord, PresenceAttempt, PresenceGate, PresenceOutcome, PresenceRequest,
};
pub use config::PresenceConfig;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
