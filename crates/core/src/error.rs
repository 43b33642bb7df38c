//! Error types for the docbridge gateway.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, transport, upstream HTTP status,
//! LLM backend, and serialization errors.

use thiserror::Error;

/// Unified error type for the docbridge gateway.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection-level transport errors (unreachable host, timeout, DNS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// An upstream service answered with a non-success HTTP status
    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus {
        /// The HTTP status code the upstream responded with
        status: u16,
    },

    /// LLM backend errors (malformed or unusable generation response)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_display() {
        let err = AppError::UpstreamStatus { status: 503 };
        assert_eq!(err.to_string(), "Upstream returned HTTP 503");
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
