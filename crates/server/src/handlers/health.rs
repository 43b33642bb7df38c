//! Health endpoint for the EXAONE backend.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use docbridge_llm::ExaoneClient;

use crate::AppState;

/// Health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// `GET /exaone/health` — report EXAONE server reachability.
///
/// Probe failures are reported as `"unhealthy"`, never as an HTTP error.
pub async fn exaone_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = ExaoneClient::new(state.config.exaone_base_url.clone());
    let healthy = backend.check_health().await;

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        service: "exaone".to_string(),
    })
}
