//! HTTP error mapping.
//!
//! Adapts `AppError` to axum responses. Only faults the routing layer is
//! responsible for reach this type — retrieval failures and configuration
//! errors. Generation failures never do; the adapter converts those to
//! fail-soft answer strings before they get here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docbridge_core::AppError;
use serde_json::json;

/// Wrapper turning an `AppError` into a JSON error response.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Transport(_)
            | AppError::UpstreamStatus { .. }
            | AppError::Serialization(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(error = %self.0, status = %status, "Request failed");

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}
