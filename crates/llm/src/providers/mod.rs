//! Backend provider implementations.

pub mod exaone;
pub mod gemini;

pub use exaone::ExaoneClient;
pub use gemini::GeminiClient;
