//! Chunked, paced embedding of eligible records.
//!
//! Records are processed strictly in order, one provider call at a time.
//! A record that fails to embed is recorded and skipped; the pass always
//! runs to the end of the input.

use std::ops::Range;

use creator_embeddings::EmbeddingModel;
use creator_types::SourceRecord;
use creator_vector::VectorRecord;
use tracing::{info, warn};

use crate::error::EmbeddingFailure;
use crate::pacing::RateLimiter;
use crate::text::{build_metadata, synthesize};

/// Emit a progress line after this many successful embeddings.
const PROGRESS_EVERY: usize = 10;

/// Split `total` items into consecutive ranges of at most `chunk_size`.
pub fn chunk_plan(total: usize, chunk_size: usize) -> Vec<Range<usize>> {
    let chunk_size = chunk_size.max(1);
    (0..total)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(total))
        .collect()
}

/// Result of one scheduler pass.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome {
    /// Successfully embedded records, in input order
    pub vectors: Vec<VectorRecord>,
    pub failures: Vec<EmbeddingFailure>,
    pub chunks: usize,
    /// Dimension of the first embedding produced
    pub dimension: Option<usize>,
}

impl ScheduleOutcome {
    pub fn embedded(&self) -> usize {
        self.vectors.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Drives text synthesis and embedding over the eligible records.
pub struct ChunkScheduler<'a> {
    embedder: &'a dyn EmbeddingModel,
    limiter: &'a dyn RateLimiter,
    chunk_size: usize,
}

impl<'a> ChunkScheduler<'a> {
    pub fn new(
        embedder: &'a dyn EmbeddingModel,
        limiter: &'a dyn RateLimiter,
        chunk_size: usize,
    ) -> Self {
        Self {
            embedder,
            limiter,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Embed every record, pacing calls through the rate limiter.
    pub async fn run(&self, records: &[SourceRecord]) -> ScheduleOutcome {
        let plan = chunk_plan(records.len(), self.chunk_size);
        let total_chunks = plan.len();
        let mut outcome = ScheduleOutcome {
            chunks: total_chunks,
            ..Default::default()
        };

        for (chunk_index, range) in plan.into_iter().enumerate() {
            self.limiter.before_chunk(chunk_index, total_chunks).await;
            info!(
                chunk = chunk_index + 1,
                total_chunks,
                first = range.start + 1,
                last = range.end,
                "Embedding chunk"
            );

            for (position, record) in records[range].iter().enumerate() {
                self.limiter.before_call(position).await;
                self.embed_one(record, records.len(), &mut outcome).await;
            }
        }

        info!(
            embedded = outcome.embedded(),
            failed = outcome.failed(),
            "Embedding pass complete"
        );
        outcome
    }

    async fn embed_one(&self, record: &SourceRecord, total: usize, outcome: &mut ScheduleOutcome) {
        // Eligible records always carry an id
        let Some(id) = record.id() else {
            return;
        };

        let text = synthesize(record);
        match self.embedder.embed(&text).await {
            Ok(embedding) => {
                if outcome.dimension.is_none() {
                    info!(dimension = embedding.dimension(), "First embedding received");
                    outcome.dimension = Some(embedding.dimension());
                }
                let metadata = build_metadata(record, &text);
                outcome
                    .vectors
                    .push(VectorRecord::new(id, embedding.into_values(), metadata));

                let done = outcome.vectors.len();
                if done % PROGRESS_EVERY == 0 {
                    info!(embedded = done, total, "Embedding progress");
                }
            }
            Err(e) => {
                warn!(id, record = record.label(), error = %e, "Failed to embed record");
                outcome.failures.push(EmbeddingFailure {
                    id: id.to_string(),
                    label: record.label().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::FixedWindowLimiter;
    use async_trait::async_trait;
    use creator_embeddings::{Embedding, EmbeddingError, ManualClock, MockEmbedder, ModelInfo};
    use std::sync::Arc;
    use std::time::Duration;

    fn eligible(n: usize) -> Vec<SourceRecord> {
        (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": format!("c{}", i),
                    "profile": {"name": format!("Creator {}", i)},
                    "brand": {"niche": "Fitness"}
                }))
                .unwrap()
            })
            .collect()
    }

    fn limiter(clock: &Arc<ManualClock>) -> FixedWindowLimiter {
        FixedWindowLimiter::new(
            Duration::from_millis(200),
            Duration::from_secs(62),
            clock.clone(),
        )
    }

    #[test]
    fn test_chunk_plan() {
        assert_eq!(chunk_plan(185, 90), vec![0..90, 90..180, 180..185]);
        assert_eq!(chunk_plan(90, 90), vec![0..90]);
        assert_eq!(chunk_plan(0, 90), Vec::<Range<usize>>::new());
        assert_eq!(chunk_plan(3, 0), vec![0..1, 1..2, 2..3]);
    }

    #[tokio::test]
    async fn test_chunked_pacing_185_records() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(&clock);
        let embedder = MockEmbedder::new(8);
        let scheduler = ChunkScheduler::new(&embedder, &limiter, 90);

        let outcome = scheduler.run(&eligible(185)).await;

        assert_eq!(outcome.chunks, 3);
        assert_eq!(outcome.embedded(), 185);
        assert_eq!(outcome.failed(), 0);
        assert_eq!(outcome.dimension, Some(8));
        assert_eq!(embedder.calls(), 185);

        let sleeps = clock.sleeps();
        let pauses: Vec<usize> = sleeps
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == Duration::from_secs(62))
            .map(|(i, _)| i)
            .collect();
        // 89 delays in chunk 1, then the pause; 89 more, then the pause
        assert_eq!(pauses, vec![89, 179]);
        let delays = sleeps
            .iter()
            .filter(|d| **d == Duration::from_millis(200))
            .count();
        assert_eq!(delays, 89 + 89 + 4);
    }

    #[tokio::test]
    async fn test_output_order_and_metadata() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(&clock);
        let embedder = MockEmbedder::new(4);
        let scheduler = ChunkScheduler::new(&embedder, &limiter, 90);

        let outcome = scheduler.run(&eligible(3)).await;
        let ids: Vec<&str> = outcome.vectors.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["c0", "c1", "c2"]);
        assert_eq!(
            outcome.vectors[0].metadata["text"].as_str(),
            Some("Creator 0 is an influencer. specializing in Fitness")
        );
    }

    /// Fails for texts mentioning a given name.
    struct RejectingEmbedder {
        info: ModelInfo,
        reject: &'static str,
    }

    #[async_trait]
    impl EmbeddingModel for RejectingEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            if text.contains(self.reject) {
                return Err(EmbeddingError::RetriesExhausted {
                    attempts: 4,
                    last: Box::new(EmbeddingError::RateLimited("429".into())),
                });
            }
            Ok(Embedding::new(vec![1.0, 0.0]))
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_pass() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(&clock);
        let embedder = RejectingEmbedder {
            info: ModelInfo {
                name: "rejecting".into(),
                dimension: Some(2),
            },
            reject: "Creator 1 ",
        };
        let scheduler = ChunkScheduler::new(&embedder, &limiter, 2);

        let outcome = scheduler.run(&eligible(4)).await;

        assert_eq!(outcome.embedded(), 3);
        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.failures[0].id, "c1");
        assert_eq!(outcome.failures[0].label, "Creator 1");
        assert!(outcome.failures[0].error.contains("Gave up after 4 attempts"));
        assert_eq!(outcome.chunks, 2);
    }
}
