//! Embedding and indexing pipeline for the creator index.
//!
//! This crate turns an exported JSON array of creator profiles into vectors
//! in a vector store, and checks the result afterwards.
//!
//! ## Key Components
//!
//! - [`load_records`]: Reads the export and applies the eligibility filter
//! - [`synthesize`] / [`build_metadata`]: Profile text and flat metadata
//! - [`RateLimiter`] / [`FixedWindowLimiter`]: Quota pacing
//! - [`ChunkScheduler`]: Sequential, chunked embedding with per-record failures
//! - [`IndexingPipeline`]: Load → embed → upsert coordinator
//! - [`verify`]: Read-only count and field check against the store
//!
//! ## Flow
//!
//! 1. Records are loaded and filtered; ineligible records are counted and skipped
//! 2. Eligible records are embedded in chunks sized to the provider quota
//! 3. Successful vectors are upserted in fixed-size batches
//! 4. The verifier samples stored records and checks their metadata
//!
//! ## Example
//!
//! ```ignore
//! use creator_indexing::{load_records, FixedWindowLimiter, IndexingPipeline, PipelineConfig};
//!
//! let loaded = load_records(&settings.expanded_input_path())?;
//! let limiter = FixedWindowLimiter::from_settings(&settings.pacing, clock);
//! let pipeline = IndexingPipeline::new(&embedder, &limiter, &store, PipelineConfig::from_settings(&settings));
//! let summary = pipeline.run(&loaded).await?;
//! ```

pub mod error;
pub mod loader;
pub mod pacing;
pub mod pipeline;
pub mod scheduler;
pub mod text;
pub mod verify;

pub use error::{EmbeddingFailure, IndexingError};
pub use loader::{load_records, LoadedRecords};
pub use pacing::{FixedWindowLimiter, RateLimiter};
pub use pipeline::{IndexingPipeline, PipelineConfig, RunSummary};
pub use scheduler::{chunk_plan, ChunkScheduler, ScheduleOutcome};
pub use text::{build_metadata, format_thousands, synthesize, PLACEHOLDER_TEXT};
pub use verify::{verify, FieldCheck, FieldStatus, RecordCheck, VerificationReport, REQUIRED_FIELDS};
