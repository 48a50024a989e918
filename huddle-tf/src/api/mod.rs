//! HTTP API: error mapping and handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use huddle_common::Error;
use serde::Serialize;
use serde_json::json;
use tracing::error;

pub mod jam;
pub mod matching;
pub mod sse;
pub mod survey;

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Wrapper mapping domain errors onto HTTP responses
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::NotMember(_) | Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::EmptyContent
            | Error::SessionExpired
            | Error::Duplicate(_)
            | Error::NotReady(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                error!("Internal error serving request: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "team_formation".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
