//! Embedding error types.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Provider reported "too many requests"
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    /// Provider answered successfully but with a zero-length vector
    #[error("Embedding returned empty values")]
    EmptyEmbedding,

    /// Provider returned a non-success status
    #[error("Provider error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be decoded
    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client could not be configured
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Every retry was consumed
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<EmbeddingError>,
    },
}

impl EmbeddingError {
    /// Whether this error is the provider's "too many requests" signal.
    ///
    /// Some providers surface quota errors with a generic status and the
    /// code embedded in the message, so the text is checked as well.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            EmbeddingError::RateLimited(_) => true,
            EmbeddingError::Api { status, body } => {
                *status == 429 || mentions_rate_limit(body)
            }
            EmbeddingError::Http(message) => mentions_rate_limit(message),
            _ => false,
        }
    }
}

fn mentions_rate_limit(text: &str) -> bool {
    text.contains("429") || text.contains("Too Many Requests") || text.contains("RESOURCE_EXHAUSTED")
}
