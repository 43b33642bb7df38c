//! EXAONE backend implementation.
//!
//! Talks to a local EXAONE inference server: `POST /generate` for text
//! generation and `GET /health` for the liveness probe.

use std::time::Duration;

use async_trait::async_trait;
use docbridge_core::AppResult;
use docbridge_retrieval::ApiClient;
use serde_json::{json, Value};

use crate::backend::{AnswerBackend, ContextStyle, FailureKind};

/// Sampling parameters sent with every generation request.
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.9;

/// Timeout for the health probe, in seconds. Deliberately short — the probe
/// reports reachability, it does not wait out a slow server.
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Local EXAONE answer backend.
pub struct ExaoneClient {
    base_url: String,
    timeout: Duration,
}

impl ExaoneClient {
    /// Create a client for the given server base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the generation request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check whether the EXAONE server is reachable.
    ///
    /// Returns `true` only on HTTP 200. Every failure mode — timeout,
    /// connection refused, DNS failure — is swallowed and reported as
    /// `false`, never raised. No retries.
    pub async fn check_health(&self) -> bool {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };

        match client.get(format!("{}/health", self.base_url)).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(err) => {
                tracing::debug!(error = %err, "EXAONE health probe failed");
                false
            }
        }
    }

    /// Pull the generated text out of the response payload.
    ///
    /// The server's response field is not contractually fixed: `text` wins,
    /// then `response`, then the whole payload stringified.
    fn extract_text(raw: Value) -> String {
        if let Some(text) = raw.get("text").and_then(Value::as_str) {
            return text.to_string();
        }
        if let Some(text) = raw.get("response").and_then(Value::as_str) {
            return text.to_string();
        }
        raw.to_string()
    }
}

#[async_trait]
impl AnswerBackend for ExaoneClient {
    fn backend_name(&self) -> &str {
        "exaone"
    }

    fn context_style(&self) -> ContextStyle {
        ContextStyle::Plain
    }

    fn failure_message(&self, kind: FailureKind) -> &'static str {
        match kind {
            FailureKind::Unreachable => "EXAONE 서버에 연결할 수 없습니다.",
            FailureKind::UpstreamStatus => "EXAONE API 호출 중 오류가 발생했습니다.",
            FailureKind::Processing => "EXAONE 처리 중 오류가 발생했습니다.",
        }
    }

    async fn complete(&self, prompt: &str) -> AppResult<String> {
        tracing::info!("Sending generation request to EXAONE");

        let client = ApiClient::new(&self.base_url).with_timeout(self.timeout);
        let body = json!({
            "prompt": prompt,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "top_p": TOP_P,
        });

        let raw = client.post("/generate", &body).await?;
        Ok(Self::extract_text(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_complete_reads_text_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_partial_json(json!({
                "max_tokens": 1000,
                "temperature": 0.7,
                "top_p": 0.9
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "답변"})))
            .mount(&server)
            .await;

        let backend = ExaoneClient::new(server.uri());
        assert_eq!(backend.complete("prompt").await.unwrap(), "답변");
    }

    #[tokio::test]
    async fn test_complete_falls_back_to_response_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "답변"})))
            .mount(&server)
            .await;

        let backend = ExaoneClient::new(server.uri());
        assert_eq!(backend.complete("prompt").await.unwrap(), "답변");
    }

    #[tokio::test]
    async fn test_complete_stringifies_unknown_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tokens": [1, 2]})))
            .mount(&server)
            .await;

        let backend = ExaoneClient::new(server.uri());
        let text = backend.complete("prompt").await.unwrap();
        assert!(text.contains("tokens"));
    }

    #[tokio::test]
    async fn test_generate_answer_appends_citations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "answer"})))
            .mount(&server)
            .await;

        let backend = ExaoneClient::new(server.uri());
        let docs = docbridge_retrieval::normalize_response(&json!([
            {"content": "A", "metadata": {"filename": "x.txt"}},
            {"text": "B", "source": "y.txt"}
        ]));

        let answer = crate::generate_answer(&backend, "질문", &docs).await;
        assert_eq!(answer, "answer\n\n**참조된 문서:**\nx.txt\ny.txt\n");
    }

    #[tokio::test]
    async fn test_generate_answer_fail_soft_on_unreachable() {
        let backend = ExaoneClient::new("http://127.0.0.1:1");
        let docs = docbridge_retrieval::normalize_response(&json!([{"text": "A"}]));
        let answer = crate::generate_answer(&backend, "질문", &docs).await;
        assert_eq!(answer, "EXAONE 서버에 연결할 수 없습니다.");
    }

    #[tokio::test]
    async fn test_generate_answer_fail_soft_on_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = ExaoneClient::new(server.uri());
        let docs = docbridge_retrieval::normalize_response(&json!([{"text": "A"}]));
        let answer = crate::generate_answer(&backend, "질문", &docs).await;
        assert_eq!(answer, "EXAONE API 호출 중 오류가 발생했습니다.");
    }

    #[tokio::test]
    async fn test_check_health_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let backend = ExaoneClient::new(server.uri());
        assert!(backend.check_health().await);
    }

    #[tokio::test]
    async fn test_check_health_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = ExaoneClient::new(server.uri());
        assert!(!backend.check_health().await);
    }

    #[tokio::test]
    async fn test_check_health_unreachable() {
        let backend = ExaoneClient::new("http://127.0.0.1:1");
        assert!(!backend.check_health().await);
    }
}
