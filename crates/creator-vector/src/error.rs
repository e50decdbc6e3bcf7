//! Vector store error types.

use thiserror::Error;

/// Errors that can occur during vector store operations.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Store returned a non-success status
    #[error("Vector store error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Store client could not be configured
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Upsert was called without any vectors
    #[error("No vectors to upsert")]
    NothingToUpsert,
}

impl From<serde_json::Error> for VectorError {
    fn from(e: serde_json::Error) -> Self {
        VectorError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for VectorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            VectorError::Serialization(e.to_string())
        } else {
            VectorError::Http(e.to_string())
        }
    }
}
