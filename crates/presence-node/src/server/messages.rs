//! Request and response bodies for the REST API

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use presence_core::{GeoPoint, LocationFix, PresenceError};

/// Body of `POST /api/distance`
#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub distance_m: f64,
}

/// Response of `POST /api/attendance/summary`
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub message: String,
}

/// Body of `POST /api/authenticity`
#[derive(Debug, Deserialize)]
pub struct AuthenticityRequest {
    pub fix: LocationFix,
    /// Package identifiers reported by the device
    #[serde(default)]
    pub installed_packages: Vec<String>,
}

/// Body of `POST /api/presence`
#[derive(Debug, Deserialize)]
pub struct PresenceBody {
    pub member_id: u32,
    /// `HH:MM:SS` or `HH:MM`
    pub arrival_time: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub fix: Option<LocationFix>,
    #[serde(default)]
    pub installed_packages: Vec<String>,
}

/// Error returned by handlers, rendered as `{"error": .., "code": ..}`
#[derive(Debug)]
pub struct ApiError(pub PresenceError);

impl From<PresenceError> for ApiError {
    fn from(err: PresenceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PresenceError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            PresenceError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            PresenceError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            err if err.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let reason = rejection.body_text();
        let err = match rejection {
            JsonRejection::JsonDataError(_) => PresenceError::Deserialization(reason),
            JsonRejection::JsonSyntaxError(_) => PresenceError::MalformedBody(reason),
            JsonRejection::MissingJsonContentType(_) => {
                PresenceError::UnsupportedContentType(reason)
            }
            _ => PresenceError::MalformedBody(reason),
        };
        Self(err)
    }
}

/// JSON body extractor whose rejections use the `ApiError` body
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.0.to_string(),
            "code": self.0.error_code(),
        });
        (self.status(), Json(body)).into_response()
    }
}
