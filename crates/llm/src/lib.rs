//! LLM integration crate for the docbridge gateway.
//!
//! This crate provides a backend-agnostic abstraction for document-grounded
//! answer generation. Heterogeneous LLM backends are swapped behind a single
//! trait, while the grounding prompt, document cap, and citation discipline
//! live in one shared driver so the variants cannot drift apart.
//!
//! # Backends
//! - **Gemini**: hosted Generative Language API
//! - **EXAONE**: local inference server
//!
//! # Example
//! ```no_run
//! use docbridge_llm::{generate_answer, providers::ExaoneClient};
//!
//! # async fn example() {
//! let backend = ExaoneClient::new("http://localhost:8080");
//! let answer = generate_answer(&backend, "질문", &[]).await;
//! println!("{}", answer);
//! # }
//! ```

pub mod answer;
pub mod backend;
pub mod factory;
pub mod providers;

// Re-export main types
pub use answer::{generate_answer, CITATION_HEADER, MAX_CONTEXT_DOCUMENTS, NO_DOCUMENTS_MESSAGE};
pub use backend::{AnswerBackend, ContextStyle, FailureKind};
pub use factory::create_backend;
pub use providers::{ExaoneClient, GeminiClient};
