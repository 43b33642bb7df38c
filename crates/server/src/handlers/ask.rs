//! Answer endpoints.
//!
//! `GET /gemini` and `GET /exaone` share one flow: fetch candidate documents
//! from the search service, normalize them, and hand them to the selected
//! backend. The two endpoints differ only in which backend the factory
//! constructs.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use docbridge_llm::{create_backend, generate_answer};
use docbridge_retrieval::{normalize_response, ApiClient};

use crate::error::ApiError;
use crate::AppState;

/// Query parameters shared by both answer endpoints.
#[derive(Debug, Deserialize)]
pub struct AskParams {
    pub query: String,
    pub index_name: String,
    pub path: String,
}

/// Answer response body.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub message: String,
}

/// `GET /gemini` — answer via the hosted Gemini backend.
pub async fn gemini(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Json<AskResponse>, ApiError> {
    answer_with_backend("gemini", &state, params).await
}

/// `GET /exaone` — answer via the local EXAONE backend.
pub async fn exaone(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Json<AskResponse>, ApiError> {
    answer_with_backend("exaone", &state, params).await
}

async fn answer_with_backend(
    backend_name: &str,
    state: &AppState,
    params: AskParams,
) -> Result<Json<AskResponse>, ApiError> {
    let config = &state.config;

    let client = ApiClient::new(&config.search_base_url)
        .with_timeout(Duration::from_secs(config.request_timeout_secs));

    // A retrieval failure is a hard dependency fault and propagates to the
    // client; generation failures below never do.
    let raw = client
        .get(
            "/search",
            &[
                ("file_path", params.path.as_str()),
                ("index_name", params.index_name.as_str()),
                ("query", params.query.as_str()),
            ],
        )
        .await?;

    let documents = normalize_response(&raw);
    tracing::info!(
        backend = backend_name,
        documents = documents.len(),
        "Retrieved candidate documents"
    );

    let backend = create_backend(backend_name, config)?;
    let message = generate_answer(backend.as_ref(), &params.query, &documents).await;

    Ok(Json(AskResponse { message }))
}
