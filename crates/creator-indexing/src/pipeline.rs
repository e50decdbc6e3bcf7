//! End-to-end embedding run.
//!
//! Coordinates the chunk scheduler and the batch upserter over a loaded
//! record set. The run is sequential: every provider call and every store
//! write happens one after another on the calling task.

use creator_embeddings::EmbeddingModel;
use creator_types::Settings;
use creator_vector::{upsert_in_batches, UpsertReport, VectorStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{EmbeddingFailure, IndexingError};
use crate::loader::LoadedRecords;
use crate::pacing::RateLimiter;
use crate::scheduler::ChunkScheduler;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Eligible records per quota window
    pub chunk_size: usize,
    /// Vectors per upsert call
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 90,
            batch_size: 50,
        }
    }
}

impl PipelineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            chunk_size: settings.pacing.chunk_size,
            batch_size: settings.vector_store.batch_size,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub eligible: usize,
    pub excluded: usize,
    pub chunks: usize,
    pub embedded: usize,
    pub failures: Vec<EmbeddingFailure>,
    pub dimension: Option<usize>,
    pub upsert: UpsertReport,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Every eligible record embedded and every batch committed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.upsert.is_complete()
    }
}

/// Load → embed → upsert coordinator.
pub struct IndexingPipeline<'a> {
    embedder: &'a dyn EmbeddingModel,
    limiter: &'a dyn RateLimiter,
    store: &'a dyn VectorStore,
    config: PipelineConfig,
}

impl<'a> IndexingPipeline<'a> {
    pub fn new(
        embedder: &'a dyn EmbeddingModel,
        limiter: &'a dyn RateLimiter,
        store: &'a dyn VectorStore,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            limiter,
            store,
            config,
        }
    }

    /// Embed every eligible record and write the results to the store.
    ///
    /// Fails before any provider call when nothing is eligible, and before
    /// any store write when nothing embedded.
    pub async fn run(&self, loaded: &LoadedRecords) -> Result<RunSummary, IndexingError> {
        if loaded.eligible.is_empty() {
            return Err(IndexingError::NoEligibleRecords {
                total: loaded.total,
            });
        }
        info!(
            total = loaded.total,
            eligible = loaded.eligible.len(),
            excluded = loaded.excluded,
            model = %self.embedder.info().name,
            store = self.store.name(),
            "Starting embedding run"
        );

        let scheduler = ChunkScheduler::new(self.embedder, self.limiter, self.config.chunk_size);
        let outcome = scheduler.run(&loaded.eligible).await;

        if outcome.vectors.is_empty() {
            return Err(IndexingError::NothingToUpsert {
                failed: outcome.failed(),
            });
        }

        info!(
            vectors = outcome.vectors.len(),
            failed = outcome.failed(),
            batch_size = self.config.batch_size,
            "Uploading vectors"
        );
        let upsert = upsert_in_batches(self.store, &outcome.vectors, self.config.batch_size).await?;
        if !upsert.is_complete() {
            warn!(
                failed_batches = upsert.batches_failed,
                failed_vectors = upsert.failed_ids.len(),
                "Some upsert batches failed"
            );
        }

        Ok(RunSummary {
            total_records: loaded.total,
            eligible: loaded.eligible.len(),
            excluded: loaded.excluded,
            chunks: outcome.chunks,
            embedded: outcome.vectors.len(),
            dimension: outcome.dimension,
            failures: outcome.failures,
            upsert,
        })
    }
}
