//! Candidate-document shapes and response normalization.
//!
//! The search collaborator does not commit to a response envelope or a
//! document schema, so both are modeled permissively here: the envelope is
//! unwrapped by [`normalize_response`] and each document is parsed into the
//! [`CandidateDocument`] sum type, whose fallback arm accepts any JSON value.
//! Normalization never fails — an unrecognized shape degrades to an opaque
//! blob or an empty list, not an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata attached to an annotated document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Original filename of the document, when the indexer recorded one
    pub filename: Option<String>,
}

/// A single retrieved document, in one of the three accepted shapes.
///
/// Variants are tried in declaration order; `Opaque` is the catch-all, so
/// deserialization of a candidate document cannot fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateDocument {
    /// `{content, metadata: {filename?}}`
    Annotated {
        content: String,
        metadata: DocumentMetadata,
    },

    /// `{text, source? | filename?}`
    Flat {
        text: String,
        source: Option<String>,
        filename: Option<String>,
    },

    /// Anything else — stringified on use
    Opaque(Value),
}

impl CandidateDocument {
    /// Reduce this document to a `(filename, content)` pair.
    ///
    /// `index` is the 1-based position of the document in the retrieved
    /// list; it seeds the `document_<index>` placeholder when no usable
    /// filename is present. The filename is never empty.
    pub fn resolve(&self, index: usize) -> (String, String) {
        let placeholder = || format!("document_{}", index);

        match self {
            Self::Annotated { content, metadata } => {
                let filename = metadata
                    .filename
                    .clone()
                    .filter(|f| !f.is_empty())
                    .unwrap_or_else(placeholder);
                (filename, content.clone())
            }
            Self::Flat {
                text,
                source,
                filename,
            } => {
                let filename = source
                    .clone()
                    .filter(|f| !f.is_empty())
                    .or_else(|| filename.clone().filter(|f| !f.is_empty()))
                    .unwrap_or_else(placeholder);
                (filename, text.clone())
            }
            Self::Opaque(value) => {
                let content = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (placeholder(), content)
            }
        }
    }
}

/// Unwrap the search service's response envelope into candidate documents.
///
/// Accepted envelopes:
/// - an object with a `results` key (its value is used: array → elements,
///   null → empty, anything else → wrapped as a single document)
/// - any other object (wrapped as a single document)
/// - an array (used directly)
/// - anything else (empty — "no documents", never an error)
pub fn normalize_response(raw: &Value) -> Vec<CandidateDocument> {
    match raw {
        Value::Object(map) => match map.get("results") {
            Some(results) => collect_documents(results),
            None => vec![parse_document(raw)],
        },
        Value::Array(_) => collect_documents(raw),
        _ => Vec::new(),
    }
}

fn collect_documents(value: &Value) -> Vec<CandidateDocument> {
    match value {
        Value::Array(items) => items.iter().map(parse_document).collect(),
        Value::Null => Vec::new(),
        other => vec![parse_document(other)],
    }
}

fn parse_document(value: &Value) -> CandidateDocument {
    // The Opaque arm accepts any value, so this only falls back defensively
    serde_json::from_value(value.clone()).unwrap_or_else(|_| CandidateDocument::Opaque(value.clone()))
}
