//! Gemini backend implementation.
//!
//! Talks to the hosted Generative Language API over REST:
//! `POST /v1beta/models/<model>:generateContent?key=<api_key>`.

use std::time::Duration;

use async_trait::async_trait;
use docbridge_core::{AppError, AppResult};
use docbridge_retrieval::ApiClient;
use serde::Deserialize;
use serde_json::json;

use crate::backend::{AnswerBackend, ContextStyle, FailureKind};

/// Default base URL of the Generative Language API.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Generative Language API response format (the parts we read).
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Hosted Gemini answer backend.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a client for the given API key and model version.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pull the generated text out of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> AppResult<String> {
        let text = response
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Backend(
                "Gemini response contained no text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl AnswerBackend for GeminiClient {
    fn backend_name(&self) -> &str {
        "gemini"
    }

    fn context_style(&self) -> ContextStyle {
        ContextStyle::Numbered
    }

    fn failure_message(&self, kind: FailureKind) -> &'static str {
        match kind {
            FailureKind::Unreachable => "Gemini 서버에 연결할 수 없습니다.",
            FailureKind::UpstreamStatus => "Gemini API 호출 중 오류가 발생했습니다.",
            FailureKind::Processing => "Gemini 처리 중 오류가 발생했습니다.",
        }
    }

    async fn complete(&self, prompt: &str) -> AppResult<String> {
        tracing::info!(model = %self.model, "Sending generation request to Gemini");

        let client = ApiClient::new(&self.base_url).with_timeout(self.timeout);
        let endpoint = format!(
            "/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });

        let raw = client.post(&endpoint, &body).await?;
        let response: GenerateContentResponse = serde_json::from_value(raw)?;

        Self::extract_text(response)
    }
}
