//! Error types for Storyloom
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur in Storyloom
#[derive(Debug, Error)]
pub enum StoryloomError {
    /// Generative service call failed (not retried, surfaced to the caller)
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Malformed preference or feedback input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Prompt template rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Preference/feedback store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Storyloom operations
pub type Result<T> = std::result::Result<T, StoryloomError>;
