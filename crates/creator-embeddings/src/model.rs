//! Embedding model trait and types.
//!
//! Defines the interface for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::EmbeddingError;

/// Vector embedding as returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// The embedding vector
    pub values: Vec<f32>,
}

impl Embedding {
    /// Wrap provider output without modification.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Get the embedding dimension
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name (e.g., "gemini-embedding-001")
    pub name: String,
    /// Expected embedding dimension, when known up front
    pub dimension: Option<usize>,
}

/// Trait for embedding models.
///
/// Implementations must be thread-safe (Send + Sync) so they can be shared
/// behind an `Arc`, even though the pipeline calls them sequentially.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Get model information
    fn info(&self) -> &ModelInfo;

    /// Generate embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}

#[async_trait]
impl<T: EmbeddingModel + ?Sized> EmbeddingModel for std::sync::Arc<T> {
    fn info(&self) -> &ModelInfo {
        (**self).info()
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        (**self).embed(text).await
    }
}

#[async_trait]
impl<T: EmbeddingModel + ?Sized> EmbeddingModel for Box<T> {
    fn info(&self) -> &ModelInfo {
        (**self).info()
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        (**self).embed(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_raw_values() {
        let emb = Embedding::new(vec![3.0, 4.0]);
        assert_eq!(emb.values, vec![3.0, 4.0]);
        assert_eq!(emb.dimension(), 2);
    }
}
