//! HTTP transport client.
//!
//! A thin wrapper around reqwest for GET/POST requests against a base URL.
//! Each call builds its own client, so there is no connection pooling or
//! shared state across invocations — every request is a fresh, isolated
//! attempt with no retries.

use std::time::Duration;

use docbridge_core::{AppError, AppResult};
use serde_json::Value;

/// Default timeout for requests, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// JSON transport client bound to a single base URL.
///
/// The endpoint passed to [`get`](ApiClient::get) / [`post`](ApiClient::post)
/// is concatenated to the base URL verbatim, so it must start with `/`.
/// Query parameters are passed structurally and percent-encoded by reqwest.
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new client with the default 30s timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Issue a GET request and parse the response body as JSON.
    ///
    /// # Errors
    /// - `AppError::Transport` when the host is unreachable or the request
    ///   times out
    /// - `AppError::UpstreamStatus` when the response status is not 2xx
    /// - `AppError::Serialization` when the body is not valid JSON
    pub async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {}", url);

        let client = self.build_client()?;
        let mut request = client.get(&url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("GET {} failed: {}", url, e)))?;

        Self::parse_json(response).await
    }

    /// Issue a POST request with a JSON body and parse the response as JSON.
    ///
    /// Error mapping matches [`get`](ApiClient::get).
    pub async fn post(&self, endpoint: &str, body: &Value) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("POST {}", url);

        let client = self.build_client()?;
        let response = client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("POST {} failed: {}", url, e)))?;

        Self::parse_json(response).await
    }

    /// Build a fresh reqwest client scoped to this call.
    fn build_client(&self) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {}", e)))
    }

    /// Check the status and decode the body.
    async fn parse_json(response: reqwest::Response) -> AppResult<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Serialization(format!("Invalid JSON response: {}", e)))
    }
}
