//! HTTP API server
//!
//! This module provides the REST endpoints that expose the presence core.

pub mod messages;
pub mod rest;

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use presence_core::PresenceError;

use crate::AppState;
use messages::ApiError;

/// Create the server router
pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = state.config.server.request_timeout;
    with_layers(routes(), timeout).with_state(state)
}

fn routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health check
        .route("/health", get(rest::health))
        // Node info
        .route("/api/info", get(rest::node_info))
        .route("/api/stats", get(rest::get_stats))
        .route("/api/geofence", get(rest::get_geofence))
        // Checks
        .route("/api/distance", post(rest::distance))
        .route("/api/geofence/check", post(rest::check_geofence))
        .route("/api/authenticity", post(rest::check_authenticity))
        .route("/api/presence", post(rest::mark_presence))
        .route("/api/attendance/summary", post(rest::attendance_summary))
}

fn with_layers(router: Router<Arc<AppState>>, timeout: Duration) -> Router<Arc<AppState>> {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    timeout_error(err, timeout)
                }))
                .timeout(timeout),
        )
        // CORS for the mobile web client
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

fn timeout_error(err: BoxError, timeout: Duration) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError(PresenceError::Timeout {
            duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })
    } else {
        ApiError(PresenceError::Internal(err.to_string()))
    }
}
