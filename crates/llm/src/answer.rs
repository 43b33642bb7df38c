//! Document-grounded answer generation.
//!
//! The shared half of every backend adapter: cap the retrieved documents,
//! build the grounding prompt, call the backend, and append the citation
//! block. Keeping this in one place means the two backends cannot diverge in
//! prompt or citation behavior.

use std::collections::BTreeSet;

use docbridge_retrieval::CandidateDocument;

use crate::backend::{AnswerBackend, ContextStyle, FailureKind};

/// Maximum number of retrieved documents used to ground a prompt.
/// Earlier documents win; anything beyond the cap is dropped silently.
pub const MAX_CONTEXT_DOCUMENTS: usize = 5;

/// Fixed reply when retrieval produced no documents. No backend call is made.
pub const NO_DOCUMENTS_MESSAGE: &str = "관련된 문서를 찾을 수 없어 답변을 제공할 수 없습니다.";

/// Header line of the appended citation block.
pub const CITATION_HEADER: &str = "**참조된 문서:**";

/// Context string plus the filenames that went into it.
struct Grounding {
    context: String,
    citations: BTreeSet<String>,
}

/// Generate a grounded answer for `query` from the retrieved documents.
///
/// This is the whole shared algorithm:
/// 1. empty document list → [`NO_DOCUMENTS_MESSAGE`], no backend call
/// 2. first [`MAX_CONTEXT_DOCUMENTS`] documents become labeled context
///    sections; their filenames form the citation set
/// 3. the fixed instruction prompt embeds query and context
/// 4. the backend is invoked once
/// 5. on success the trimmed text gets the sorted citation block appended
/// 6. on any failure the backend's fixed message for the failure category is
///    returned — generation never raises once documents were non-empty
pub async fn generate_answer(
    backend: &dyn AnswerBackend,
    query: &str,
    documents: &[CandidateDocument],
) -> String {
    if documents.is_empty() {
        tracing::info!(
            backend = backend.backend_name(),
            "No documents retrieved, skipping generation"
        );
        return NO_DOCUMENTS_MESSAGE.to_string();
    }

    let grounding = build_grounding(backend.context_style(), documents);
    let prompt = build_prompt(query, &grounding.context);

    tracing::debug!(
        backend = backend.backend_name(),
        documents = grounding.citations.len(),
        "Sending grounded prompt"
    );

    match backend.complete(&prompt).await {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                tracing::warn!(
                    backend = backend.backend_name(),
                    "Backend returned no usable text"
                );
                backend.failure_message(FailureKind::Processing).to_string()
            } else {
                render_answer(trimmed, &grounding.citations)
            }
        }
        Err(err) => {
            tracing::warn!(
                backend = backend.backend_name(),
                error = %err,
                "Generation failed"
            );
            backend.failure_message(FailureKind::classify(&err)).to_string()
        }
    }
}

/// Build the context string and citation set from the capped document list.
fn build_grounding(style: ContextStyle, documents: &[CandidateDocument]) -> Grounding {
    let mut context = String::new();
    let mut citations = BTreeSet::new();

    for (i, document) in documents.iter().take(MAX_CONTEXT_DOCUMENTS).enumerate() {
        let (filename, content) = document.resolve(i + 1);

        match style {
            ContextStyle::Numbered => {
                context.push_str(&format!("\n\n[문서 {}: {}]\n", i + 1, filename));
            }
            ContextStyle::Plain => {
                context.push_str(&format!("\n\n[{}]\n", filename));
            }
        }
        context.push_str(&content);
        citations.insert(filename);
    }

    Grounding { context, citations }
}

/// Build the fixed instruction prompt embedding query and context.
fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "다음 문서들을 참조하여 사용자의 질문에 대해 정확하고 도움이 되는 답변을 해주세요.\n\
         \n\
         질문: {query}\n\
         \n\
         참조 문서들:\n\
         {context}\n\
         \n\
         답변 요구사항:\n\
         1. 질문에 직접적으로 관련된 정보를 우선적으로 활용해주세요\n\
         2. 한국어로 자연스럽게 답변해주세요\n\
         3. 구체적인 정보와 예시를 포함해주세요\n\
         4. 답변에서 문서를 언급할 때는 실제 파일명을 사용해주세요 (예: \"sample.txt에 따르면...\")\n\
         5. 답변 끝에 참조한 문서 목록을 실제 파일명으로 포함해주세요\n\
         6. 연관없는 문서는 목록에서 제외해주세요\n\
         7. 연관없는 문서는 언급하지 말아주세요\n\
         \n\
         답변:"
    )
}

/// Append the citation block: header, then one line per unique filename in
/// ascending lexicographic order.
fn render_answer(answer: &str, citations: &BTreeSet<String>) -> String {
    let mut out = String::from(answer);
    out.push_str("\n\n");
    out.push_str(CITATION_HEADER);
    out.push('\n');
    for filename in citations {
        out.push_str(filename);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docbridge_core::{AppError, AppResult};
    use docbridge_retrieval::normalize_response;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum MockOutcome {
        Text(&'static str),
        Unreachable,
        Status,
    }

    struct MockBackend {
        outcome: MockOutcome,
        style: ContextStyle,
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
    }

    impl MockBackend {
        fn replying(text: &'static str) -> Self {
            Self {
                outcome: MockOutcome::Text(text),
                style: ContextStyle::Numbered,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }

        fn failing(outcome: MockOutcome) -> Self {
            Self {
                outcome,
                style: ContextStyle::Numbered,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }

        fn with_style(mut self, style: ContextStyle) -> Self {
            self.style = style;
            self
        }
    }

    #[async_trait]
    impl AnswerBackend for MockBackend {
        fn backend_name(&self) -> &str {
            "mock"
        }

        fn context_style(&self) -> ContextStyle {
            self.style
        }

        fn failure_message(&self, kind: FailureKind) -> &'static str {
            match kind {
                FailureKind::Unreachable => "mock unreachable",
                FailureKind::UpstreamStatus => "mock status error",
                FailureKind::Processing => "mock processing error",
            }
        }

        async fn complete(&self, prompt: &str) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            match &self.outcome {
                MockOutcome::Text(text) => Ok(text.to_string()),
                MockOutcome::Unreachable => {
                    Err(AppError::Transport("connection refused".to_string()))
                }
                MockOutcome::Status => Err(AppError::UpstreamStatus { status: 500 }),
            }
        }
    }

    fn sample_documents() -> Vec<CandidateDocument> {
        normalize_response(&json!([
            {"content": "A", "metadata": {"filename": "x.txt"}},
            {"text": "B", "source": "y.txt"}
        ]))
    }

    #[tokio::test]
    async fn test_empty_documents_short_circuits() {
        let backend = MockBackend::replying("answer");
        let answer = generate_answer(&backend, "질문", &[]).await;
        assert_eq!(answer, NO_DOCUMENTS_MESSAGE);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_round_trip_with_citations() {
        let backend = MockBackend::replying("answer");
        let answer = generate_answer(&backend, "질문", &sample_documents()).await;
        assert_eq!(answer, "answer\n\n**참조된 문서:**\nx.txt\ny.txt\n");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backend_text_is_trimmed() {
        let backend = MockBackend::replying("  answer \n");
        let answer = generate_answer(&backend, "질문", &sample_documents()).await;
        assert!(answer.starts_with("answer\n\n"));
    }

    #[tokio::test]
    async fn test_document_cap_limits_citations() {
        let docs: Vec<CandidateDocument> = normalize_response(&json!([
            {"text": "1", "source": "f.txt"},
            {"text": "2", "source": "e.txt"},
            {"text": "3", "source": "d.txt"},
            {"text": "4", "source": "c.txt"},
            {"text": "5", "source": "b.txt"},
            {"text": "6", "source": "a.txt"},
            {"text": "7", "source": "g.txt"}
        ]));

        let backend = MockBackend::replying("answer");
        let answer = generate_answer(&backend, "질문", &docs).await;

        // Only the first five documents appear, sorted ascending
        assert_eq!(
            answer,
            "answer\n\n**참조된 문서:**\nb.txt\nc.txt\nd.txt\ne.txt\nf.txt\n"
        );
        assert!(!answer.contains("a.txt"));
        assert!(!answer.contains("g.txt"));
    }

    #[tokio::test]
    async fn test_duplicate_filenames_deduplicated() {
        let docs = normalize_response(&json!([
            {"text": "chunk 1", "source": "same.txt"},
            {"text": "chunk 2", "source": "same.txt"}
        ]));

        let backend = MockBackend::replying("answer");
        let answer = generate_answer(&backend, "질문", &docs).await;
        assert_eq!(answer, "answer\n\n**참조된 문서:**\nsame.txt\n");
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_soft() {
        let backend = MockBackend::failing(MockOutcome::Unreachable);
        let answer = generate_answer(&backend, "질문", &sample_documents()).await;
        assert_eq!(answer, "mock unreachable");
    }

    #[tokio::test]
    async fn test_status_failure_fails_soft() {
        let backend = MockBackend::failing(MockOutcome::Status);
        let answer = generate_answer(&backend, "질문", &sample_documents()).await;
        assert_eq!(answer, "mock status error");
    }

    #[tokio::test]
    async fn test_blank_backend_text_is_processing_failure() {
        let backend = MockBackend::replying("   \n ");
        let answer = generate_answer(&backend, "질문", &sample_documents()).await;
        assert_eq!(answer, "mock processing error");
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let backend = MockBackend::replying("answer");
        let docs = sample_documents();
        let first = generate_answer(&backend, "질문", &docs).await;
        let second = generate_answer(&backend, "질문", &docs).await;
        assert_eq!(first, second);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_numbered_context_labels() {
        let backend = MockBackend::replying("answer");
        generate_answer(&backend, "질문", &sample_documents()).await;

        let prompt = backend.last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("질문: 질문"));
        assert!(prompt.contains("[문서 1: x.txt]\nA"));
        assert!(prompt.contains("[문서 2: y.txt]\nB"));
    }

    #[tokio::test]
    async fn test_plain_context_labels() {
        let backend = MockBackend::replying("answer").with_style(ContextStyle::Plain);
        generate_answer(&backend, "질문", &sample_documents()).await;

        let prompt = backend.last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("[x.txt]\nA"));
        assert!(prompt.contains("[y.txt]\nB"));
        assert!(!prompt.contains("[문서 1"));
    }

    #[tokio::test]
    async fn test_placeholder_filenames_in_citations() {
        let docs = normalize_response(&json!([{"score": 1}, {"text": "B"}]));
        let backend = MockBackend::replying("answer");
        let answer = generate_answer(&backend, "질문", &docs).await;
        assert_eq!(answer, "answer\n\n**참조된 문서:**\ndocument_1\ndocument_2\n");
    }
}
