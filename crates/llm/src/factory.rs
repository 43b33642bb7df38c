//! Backend factory.
//!
//! Resolves a backend name plus application configuration into a concrete
//! [`AnswerBackend`]. Selecting a backend is a construction-time decision;
//! handlers pick the variant here and then only see the trait.

use std::sync::Arc;
use std::time::Duration;

use docbridge_core::{AppConfig, AppError, AppResult};

use crate::backend::AnswerBackend;
use crate::providers::{ExaoneClient, GeminiClient};

/// Create an answer backend by name.
///
/// # Arguments
/// * `backend` - Backend identifier ("gemini" or "exaone")
/// * `config` - Application configuration (credentials, base URLs, timeout)
///
/// # Errors
/// Returns `AppError::Config` when the backend is unknown or, for Gemini,
/// when no API key is configured.
pub fn create_backend(backend: &str, config: &AppConfig) -> AppResult<Arc<dyn AnswerBackend>> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    match backend.to_lowercase().as_str() {
        "gemini" => {
            let api_key = config.gemini_api_key.clone().ok_or_else(|| {
                AppError::Config("Gemini backend requires GEMINI_API_KEY".to_string())
            })?;
            let client =
                GeminiClient::new(api_key, config.gemini_model.clone()).with_timeout(timeout);
            Ok(Arc::new(client))
        }
        "exaone" => {
            let client = ExaoneClient::new(config.exaone_base_url.clone()).with_timeout(timeout);
            Ok(Arc::new(client))
        }
        other => Err(AppError::Config(format!("Unknown backend: {}", other))),
    }
}
