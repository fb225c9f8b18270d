//! Presence marking gate
//!
//! A presence mark is accepted only when the reported position lies inside the
//! office geofence and, when a full location fix is available, the fix passes
//! the fake-location heuristic. The accepted outcome carries the request that
//! is forwarded to the attendance service.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::authenticity::{
    detect_fake_location, AuthenticityVerdict, PackageLookup, SpoofingAppList,
};
use crate::error::{PresenceError, Result};
use crate::geofence::{GeofenceCheck, OfficeGeofence};
use crate::location::{GeoPoint, LocationFix};

/// Wire format of arrival times
pub const ARRIVAL_TIME_FORMAT: &str = "%H:%M:%S";

/// Parse an arrival time given as `HH:MM:SS` or `HH:MM`
pub fn parse_arrival_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, ARRIVAL_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| PresenceError::InvalidArrivalTime(raw.to_string()))
}

/// A staff member's attempt to mark presence
#[derive(Debug, Clone)]
pub struct PresenceAttempt {
    pub member_id: u32,
    pub arrival_time: NaiveTime,
    pub point: GeoPoint,
    /// Full fix from the location provider. Absent when the caller only
    /// has raw coordinates.
    pub fix: Option<LocationFix>,
}

/// Request forwarded to the attendance service once a mark is accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceRequest {
    pub member_id: u32,
    /// `HH:MM:SS`
    pub arrival_time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_mock_location: bool,
    pub gps_accuracy: Option<f64>,
}

impl PresenceRequest {
    fn from_attempt(attempt: &PresenceAttempt, verdict: Option<&AuthenticityVerdict>) -> Self {
        Self {
            member_id: attempt.member_id,
            arrival_time: attempt.arrival_time.format(ARRIVAL_TIME_FORMAT).to_string(),
            latitude: attempt.point.latitude,
            longitude: attempt.point.longitude,
            is_mock_location: verdict.is_some_and(|v| v.is_fake),
            gps_accuracy: attempt.fix.as_ref().and_then(|fix| fix.accuracy),
        }
    }
}

/// Decision for one presence attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PresenceOutcome {
    /// Position outside the office geofence
    OutOfRange { geofence: GeofenceCheck },
    /// Location fix judged fake
    FakeLocation { verdict: AuthenticityVerdict },
    /// Mark may be submitted. `verified` is false when no fix was supplied
    /// and the authenticity check did not run.
    Accepted {
        geofence: GeofenceCheck,
        verified: bool,
        request: PresenceRequest,
    },
}

impl PresenceOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PresenceOutcome::Accepted { .. })
    }

    /// Text surfaced to the user
    pub fn user_message(&self) -> &str {
        match self {
            PresenceOutcome::OutOfRange { geofence } => &geofence.message,
            PresenceOutcome::FakeLocation { verdict } => &verdict.reason,
            PresenceOutcome::Accepted { geofence, .. } => &geofence.message,
        }
    }
}

/// Geofence plus authenticity policy applied to presence attempts
#[derive(Debug, Clone, Default)]
pub struct PresenceGate {
    geofence: OfficeGeofence,
    spoofing_apps: SpoofingAppList,
}

impl PresenceGate {
    pub fn new(geofence: OfficeGeofence, spoofing_apps: SpoofingAppList) -> Self {
        Self {
            geofence,
            spoofing_apps,
        }
    }

    pub fn geofence(&self) -> &OfficeGeofence {
        &self.geofence
    }

    pub fn spoofing_apps(&self) -> &SpoofingAppList {
        &self.spoofing_apps
    }

    /// Run the authenticity heuristic with this gate's block list
    pub fn verify_fix(
        &self,
        fix: &LocationFix,
        device: &impl PackageLookup,
    ) -> AuthenticityVerdict {
        detect_fake_location(fix, &self.spoofing_apps, device)
    }

    /// Decide whether `attempt` may be submitted.
    ///
    /// The geofence is checked first; the heuristic only runs when the attempt
    /// carries a full fix.
    pub fn evaluate(
        &self,
        attempt: &PresenceAttempt,
        device: &impl PackageLookup,
    ) -> PresenceOutcome {
        let geofence = self.geofence.check(&attempt.point);
        if !geofence.valid {
            warn!(
                member_id = attempt.member_id,
                distance_m = geofence.distance_m,
                "Presence rejected: outside geofence"
            );
            return PresenceOutcome::OutOfRange { geofence };
        }

        let verdict = attempt.fix.as_ref().map(|fix| self.verify_fix(fix, device));
        if let Some(verdict) = verdict.as_ref().filter(|v| v.is_fake) {
            warn!(
                member_id = attempt.member_id,
                confidence = verdict.confidence,
                reason = %verdict.reason,
                "Presence rejected: fake location"
            );
            return PresenceOutcome::FakeLocation {
                verdict: verdict.clone(),
            };
        }

        // TODO: decide with the attendance office whether fix-less attempts
        // should be rejected instead of accepted unverified.
        let verified = verdict.is_some();
        if verified {
            info!(member_id = attempt.member_id, "Presence accepted");
        } else {
            warn!(
                member_id = attempt.member_id,
                "Presence accepted without a location fix, authenticity not verified"
            );
        }

        PresenceOutcome::Accepted {
            request: PresenceRequest::from_attempt(attempt, verdict.as_ref()),
            geofence,
            verified,
        }
    }
}

/// Attendance record returned by the attendance service after a mark
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u64,
    pub member_id: u32,
    pub date: String,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub late_minutes: Option<i64>,
    #[serde(default)]
    pub lateness_category: Option<String>,
    #[serde(default)]
    pub sanction: Option<String>,
}

/// Sanction text meaning nothing was applied
pub const NO_SANCTION: &str = "No sanction";

const PRESENCE_RECORDED: &str = "Presence recorded!";

impl AttendanceRecord {
    /// Confirmation shown after a successful mark
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        if let Some(category) = &self.lateness_category {
            lines.push(format!("Status: {category}"));
        }
        if let Some(minutes) = self.late_minutes.filter(|&m| m > 0) {
            lines.push(format!("Late by: {minutes} minutes"));
        }
        if let Some(sanction) = self.sanction.as_deref().filter(|&s| s != NO_SANCTION) {
            lines.push(format!("Sanction: {sanction}"));
        }

        if lines.is_empty() {
            PRESENCE_RECORDED.to_string()
        } else {
            format!("{PRESENCE_RECORDED}\n\n{}", lines.join("\n"))
        }
    }

    /// Confirmation for a reply that may carry no record
    pub fn summary_for(record: Option<&AttendanceRecord>) -> String {
        record
            .map(AttendanceRecord::summary)
            .unwrap_or_else(|| PRESENCE_RECORDED.to_string())
    }
}
