//! Error path E2E tests for the creator index.
//!
//! Fatal preconditions abort before any provider call or store write;
//! per-record failures are counted and the run continues.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;

use creator_embeddings::{Embedding, EmbeddingError, EmbeddingModel, MockEmbedder, ModelInfo};
use creator_indexing::IndexingError;
use e2e_tests::{minimal_record, TestHarness};

#[tokio::test]
async fn test_missing_input_file() {
    let harness = TestHarness::new();

    let result = harness.run(MockEmbedder::new(8)).await;

    assert!(matches!(result, Err(IndexingError::Data { .. })));
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_unparseable_input_file() {
    let harness = TestHarness::new();
    std::fs::write(&harness.input_path, "[{\"id\": ").unwrap();

    let result = harness.run(MockEmbedder::new(8)).await;
    assert!(matches!(result, Err(IndexingError::Data { .. })));
}

#[tokio::test]
async fn test_no_eligible_records() {
    let harness = TestHarness::new();
    harness.write_input(&[
        json!({"id": "1", "brand": {"niche": "Food"}}),
        json!({"id": "2", "profile": {"name": "Name Only"}}),
    ]);
    let embedder = Arc::new(MockEmbedder::new(8));

    let result = harness.run(embedder.clone()).await;

    assert!(matches!(
        result,
        Err(IndexingError::NoEligibleRecords { total: 2 })
    ));
    assert_eq!(embedder.calls(), 0);
}

/// Rejects texts containing a marker with a non-retryable error.
struct SelectiveEmbedder {
    info: ModelInfo,
    reject: &'static str,
}

#[async_trait]
impl EmbeddingModel for SelectiveEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.contains(self.reject) {
            return Err(EmbeddingError::Api {
                status: 400,
                body: "content blocked".into(),
            });
        }
        Ok(Embedding::new(vec![0.5; 8]))
    }
}

#[tokio::test]
async fn test_record_failure_does_not_stop_run() {
    let harness = TestHarness::new();
    harness.write_input(&[
        minimal_record("a1", "Asha"),
        minimal_record("b2", "Blocked"),
        minimal_record("c3", "Ravi"),
    ]);
    let embedder = SelectiveEmbedder {
        info: ModelInfo {
            name: "selective".into(),
            dimension: Some(8),
        },
        reject: "Blocked",
    };

    let summary = harness.run(embedder).await.unwrap();

    assert_eq!(summary.embedded, 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].id, "b2");
    assert_eq!(harness.store.ids(), vec!["a1".to_string(), "c3".to_string()]);
    // Non-retryable errors never wait
    assert!(harness.clock.sleeps().iter().all(|d| d.as_millis() == 200));
}

#[tokio::test]
async fn test_all_records_fail_is_fatal() {
    let harness = TestHarness::new();
    harness.write_input(&[minimal_record("a1", "Blocked")]);
    let embedder = SelectiveEmbedder {
        info: ModelInfo {
            name: "selective".into(),
            dimension: Some(8),
        },
        reject: "Blocked",
    };

    let result = harness.run(embedder).await;

    assert!(matches!(
        result,
        Err(IndexingError::NothingToUpsert { failed: 1 })
    ));
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_empty_store_verification() {
    let harness = TestHarness::new();
    harness.write_input(&[minimal_record("a1", "Asha")]);

    let report = harness.verify().await.unwrap();

    assert!(report.is_empty_store());
    assert_eq!(report.expected_count, 1);
    assert!(!report.passed());
}
