//! Document retrieval crate for the docbridge gateway.
//!
//! This crate covers the two leaf concerns of the gateway:
//! - A small HTTP transport client (`ApiClient`) for talking to external
//!   JSON services
//! - Normalization of the search collaborator's loosely-shaped document
//!   responses into `CandidateDocument` values
//!
//! # Example
//! ```no_run
//! use docbridge_retrieval::{ApiClient, normalize_response};
//!
//! # async fn example() -> docbridge_core::AppResult<()> {
//! let client = ApiClient::new("http://localhost:8000");
//! let raw = client.get("/search", &[("query", "rust")]).await?;
//! let documents = normalize_response(&raw);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod document;

// Re-export main types
pub use client::ApiClient;
pub use document::{normalize_response, CandidateDocument, DocumentMetadata};
