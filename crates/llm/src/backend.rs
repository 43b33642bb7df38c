//! Answer-backend abstraction.
//!
//! This module defines the contract every LLM backend implements. The
//! orchestration around it (document cap, prompt template, citation block,
//! fail-soft messages) lives in [`crate::answer`], so a backend only has to
//! describe itself and turn a prompt into text.

use async_trait::async_trait;
use docbridge_core::{AppError, AppResult};

/// Failure category of a backend generation call.
///
/// The adapter tier never lets a generation fault escape; instead the fault
/// is classified into one of these categories and mapped to a fixed,
/// backend-labeled user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend host could not be reached (connect error, timeout, DNS)
    Unreachable,

    /// The backend answered with a non-success HTTP status
    UpstreamStatus,

    /// Malformed response, missing text, or any other processing fault
    Processing,
}

impl FailureKind {
    /// Classify an error from a backend call into a failure category.
    pub fn classify(err: &AppError) -> Self {
        match err {
            AppError::Transport(_) => Self::Unreachable,
            AppError::UpstreamStatus { .. } => Self::UpstreamStatus,
            _ => Self::Processing,
        }
    }
}

/// How a backend labels context sections in the grounding prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStyle {
    /// `[문서 <i>: <filename>]`
    Numbered,

    /// `[<filename>]`
    Plain,
}

/// Trait for answer-generation backends.
///
/// Implementations cover the backend-specific parts only: wire format,
/// response extraction, and the fixed failure messages. Which backend to use
/// is a construction-time choice made by the caller (see
/// [`crate::factory::create_backend`]), never a runtime branch inside the
/// adapter.
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Get the backend name (e.g., "gemini", "exaone").
    fn backend_name(&self) -> &str;

    /// Context-section labeling style for this backend's prompt.
    fn context_style(&self) -> ContextStyle;

    /// Fixed user-facing message for a failed generation.
    fn failure_message(&self, kind: FailureKind) -> &'static str;

    /// Send a raw prompt to the backend and return the generated text.
    ///
    /// # Errors
    /// Transport, status, and extraction failures are returned as-is; the
    /// shared driver converts them into fail-soft messages.
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_transport() {
        let err = AppError::Transport("connection refused".to_string());
        assert_eq!(FailureKind::classify(&err), FailureKind::Unreachable);
    }

    #[test]
    fn test_classify_status() {
        let err = AppError::UpstreamStatus { status: 500 };
        assert_eq!(FailureKind::classify(&err), FailureKind::UpstreamStatus);
    }

    #[test]
    fn test_classify_other() {
        let err = AppError::Serialization("bad json".to_string());
        assert_eq!(FailureKind::classify(&err), FailureKind::Processing);

        let err = AppError::Backend("no text".to_string());
        assert_eq!(FailureKind::classify(&err), FailureKind::Processing);
    }
}
