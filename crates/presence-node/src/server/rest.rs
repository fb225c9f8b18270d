//! REST API endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::debug;

use presence_core::presence::{parse_arrival_time, PresenceAttempt};
use presence_core::{
    haversine_distance, AttendanceRecord, AuthenticityVerdict, GeoPoint, GeofenceCheck,
    OfficeGeofence, PresenceOutcome,
};

use super::messages::{
    ApiError, ApiJson, AuthenticityRequest, DistanceRequest, DistanceResponse, PresenceBody,
    SummaryResponse,
};
use crate::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Node info endpoint
#[derive(Serialize)]
pub struct NodeInfo {
    pub version: &'static str,
    pub name: String,
    pub office: String,
    /// Scheduled start of the working day
    pub start_time: String,
}

pub async fn node_info(State(state): State<Arc<AppState>>) -> Json<NodeInfo> {
    Json(NodeInfo {
        version: env!("CARGO_PKG_VERSION"),
        name: state.config.server.name.clone(),
        office: state.gate.geofence().name.clone(),
        start_time: state.config.start_time.clone(),
    })
}

/// Service statistics
#[derive(Serialize)]
pub struct NodeStats {
    pub evaluations: u64,
    pub uptime_seconds: u64,
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<NodeStats> {
    Json(NodeStats {
        evaluations: state.evaluations.load(Ordering::Relaxed),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Configured office geofence
pub async fn get_geofence(State(state): State<Arc<AppState>>) -> Json<OfficeGeofence> {
    Json(state.gate.geofence().clone())
}

/// Great-circle distance between two points
pub async fn distance(
    ApiJson(body): ApiJson<DistanceRequest>,
) -> Result<Json<DistanceResponse>, ApiError> {
    body.from.validate()?;
    body.to.validate()?;
    Ok(Json(DistanceResponse {
        distance_m: haversine_distance(&body.from, &body.to),
    }))
}

/// Check a position against the office geofence
pub async fn check_geofence(
    State(state): State<Arc<AppState>>,
    ApiJson(point): ApiJson<GeoPoint>,
) -> Result<Json<GeofenceCheck>, ApiError> {
    point.validate()?;
    Ok(Json(state.gate.geofence().check(&point)))
}

/// Run the fake-location heuristic on a fix
pub async fn check_authenticity(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<AuthenticityRequest>,
) -> Result<Json<AuthenticityVerdict>, ApiError> {
    body.fix.validate()?;
    state.evaluations.fetch_add(1, Ordering::Relaxed);
    Ok(Json(state.gate.verify_fix(&body.fix, &body.installed_packages)))
}

/// Evaluate a presence mark
pub async fn mark_presence(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<PresenceBody>,
) -> Result<Json<PresenceOutcome>, ApiError> {
    let point = GeoPoint::try_new(body.latitude, body.longitude)?;
    if let Some(fix) = &body.fix {
        fix.validate()?;
    }
    let attempt = PresenceAttempt {
        member_id: body.member_id,
        arrival_time: parse_arrival_time(&body.arrival_time)?,
        point,
        fix: body.fix,
    };

    state.evaluations.fetch_add(1, Ordering::Relaxed);
    let outcome = state.gate.evaluate(&attempt, &body.installed_packages);
    debug!(
        member_id = attempt.member_id,
        accepted = outcome.is_accepted(),
        "Presence evaluated"
    );
    Ok(Json(outcome))
}

/// Confirmation text for the record the attendance service returned
pub async fn attendance_summary(
    ApiJson(record): ApiJson<Option<AttendanceRecord>>,
) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        message: AttendanceRecord::summary_for(record.as_ref()),
    })
}
