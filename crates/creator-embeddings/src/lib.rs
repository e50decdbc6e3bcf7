//! # creator-embeddings
//!
//! Embedding generation for the creator index.
//!
//! This crate turns profile descriptions into vectors by calling a hosted
//! embedding provider, and owns the retry behavior used against that
//! provider's quota.
//!
//! ## Features
//! - `EmbeddingModel` async trait with Gemini and deterministic mock implementations
//! - Linear backoff on rate-limit signals (20s, 40s, 60s by default)
//! - Injectable `Clock` so pacing and backoff are testable without waiting

pub mod clock;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod model;
pub mod retry;

pub use clock::{Clock, ManualClock, TokioClock};
pub use error::EmbeddingError;
pub use gemini::{GeminiConfig, GeminiEmbedder};
pub use mock::MockEmbedder;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
pub use retry::{retry_with_backoff, LinearBackoff, RetryPolicy, RetryingEmbedder};
