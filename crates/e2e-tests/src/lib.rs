//! End-to-end test infrastructure for the creator index.
//!
//! Provides a shared TestHarness and record builders for tests covering the
//! full load → embed → upsert → verify pipeline without network access.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use creator_embeddings::{Clock, EmbeddingModel, ManualClock, RetryPolicy, RetryingEmbedder};
use creator_indexing::{
    load_records, verify, FixedWindowLimiter, IndexingError, IndexingPipeline, LoadedRecords,
    PipelineConfig, RunSummary, VerificationReport,
};
use creator_vector::InMemoryStore;

/// Shared test harness for E2E tests.
///
/// Owns a temp directory for the input file, an in-memory vector store and
/// a manual clock that records every pacing and backoff wait.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Path of the JSON export
    pub input_path: PathBuf,
    pub store: InMemoryStore,
    pub clock: Arc<ManualClock>,
    pub config: PipelineConfig,
}

impl TestHarness {
    /// Create a new harness with default chunk and batch sizes.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let input_path = temp_dir.path().join("influencers_data.json");
        Self {
            _temp_dir: temp_dir,
            input_path,
            store: InMemoryStore::new(),
            clock: Arc::new(ManualClock::new()),
            config: PipelineConfig::default(),
        }
    }

    /// Write `records` as the JSON export.
    pub fn write_input(&self, records: &[Value]) {
        let body = serde_json::to_string_pretty(records).expect("Failed to serialize records");
        std::fs::write(&self.input_path, body).expect("Failed to write input file");
    }

    pub fn load(&self) -> Result<LoadedRecords, IndexingError> {
        load_records(&self.input_path)
    }

    /// Load the input and run the pipeline with production pacing, waits
    /// recorded on the harness clock.
    pub async fn run<E: EmbeddingModel>(&self, embedder: E) -> Result<RunSummary, IndexingError> {
        let loaded = self.load()?;
        let clock: Arc<dyn Clock> = self.clock.clone();
        let embedder =
            RetryingEmbedder::new(embedder, RetryPolicy::rate_limited(3, Duration::from_secs(20)), clock.clone());
        let limiter = FixedWindowLimiter::new(Duration::from_millis(200), Duration::from_secs(62), clock);
        let pipeline = IndexingPipeline::new(&embedder, &limiter, &self.store, self.config.clone());
        pipeline.run(&loaded).await
    }

    /// Verify the harness store against the current input file.
    pub async fn verify(&self) -> Result<VerificationReport, IndexingError> {
        let loaded = self.load()?;
        verify(&self.store, loaded.eligible.len() as u64, &loaded.sample_ids(5)).await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A record with every field the exporter produces.
pub fn full_record(id: &str, name: &str, followers: i64) -> Value {
    json!({
        "id": id,
        "profile": {
            "name": name,
            "location": "Mumbai",
            "gender": "Female",
            "type": "Lifestyle",
            "link": format!("https://instagram.com/{}", name.to_lowercase())
        },
        "brand": {"niche": "Fashion", "brand_fit": "Apparel", "vibe": "Playful"},
        "metrics": {"followers": followers, "avg_views": 12000, "engagement_rate": 3.4},
        "audience": {"mf_split": "30/70", "india_split": "88%", "age_concentration": "18-24"},
        "commercials": "Reel: 25k",
        "contact": {"email": format!("{}@example.com", id), "contact_no": "+91 90000 00000"}
    })
}

/// Minimal eligible record: id, name and niche only.
pub fn minimal_record(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "profile": {"name": name},
        "brand": {"niche": "Travel"}
    })
}

/// `n` minimal eligible records with zero-padded ids.
pub fn many_records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| minimal_record(&format!("r{:04}", i), &format!("Creator {}", i)))
        .collect()
}
