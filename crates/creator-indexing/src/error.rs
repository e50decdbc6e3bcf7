//! Error types for the indexing pipeline.

use std::fmt;
use std::path::PathBuf;

use creator_embeddings::EmbeddingError;
use creator_vector::VectorError;
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Input file missing or unreadable
    #[error("Cannot read input file {path}: {message}")]
    Data { path: PathBuf, message: String },

    /// JSON encoding/decoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Nothing in the input passed the eligibility filter
    #[error("No eligible records among {total} loaded")]
    NoEligibleRecords { total: usize },

    /// Every embedding attempt failed
    #[error("No vectors to upsert ({failed} records failed to embed)")]
    NothingToUpsert { failed: usize },

    /// Vector store error
    #[error("Vector error: {0}")]
    Vector(#[from] VectorError),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl From<serde_json::Error> for IndexingError {
    fn from(err: serde_json::Error) -> Self {
        IndexingError::Serialization(err.to_string())
    }
}

/// A record that could not be embedded. The run continues past it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingFailure {
    pub id: String,
    /// Display name, for operator-facing output
    pub label: String,
    pub error: String,
}

impl fmt::Display for EmbeddingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.label, self.id, self.error)
    }
}
