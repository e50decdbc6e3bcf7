//! Sequential batch upserter.
//!
//! Splits accumulated vectors into fixed-size batches and writes them one
//! at a time. A failed batch is recorded and skipped; batches already
//! committed stay committed.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::VectorError;
use crate::record::VectorRecord;
use crate::store::VectorStore;

/// Outcome of one upsert pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpsertReport {
    /// Batches the store acknowledged
    pub batches_committed: usize,
    /// Batches the store rejected
    pub batches_failed: usize,
    /// Vectors in committed batches
    pub vectors_upserted: usize,
    /// Ids belonging to rejected batches
    pub failed_ids: Vec<String>,
}

impl UpsertReport {
    pub fn is_complete(&self) -> bool {
        self.batches_failed == 0
    }
}

/// Write `records` to `store` in batches of `batch_size`.
///
/// Returns [`VectorError::NothingToUpsert`] when `records` is empty. Batch
/// failures do not abort the pass; they are reported in the result.
pub async fn upsert_in_batches(
    store: &dyn VectorStore,
    records: &[VectorRecord],
    batch_size: usize,
) -> Result<UpsertReport, VectorError> {
    if records.is_empty() {
        return Err(VectorError::NothingToUpsert);
    }

    let batch_size = batch_size.max(1);
    let total_batches = records.len().div_ceil(batch_size);
    let mut report = UpsertReport::default();

    for (index, batch) in records.chunks(batch_size).enumerate() {
        match store.upsert(batch).await {
            Ok(_) => {
                report.batches_committed += 1;
                report.vectors_upserted += batch.len();
                info!(
                    batch = index + 1,
                    total_batches,
                    count = batch.len(),
                    store = store.name(),
                    "Upserted batch"
                );
            }
            Err(e) => {
                report.batches_failed += 1;
                report.failed_ids.extend(batch.iter().map(|r| r.id.clone()));
                warn!(
                    batch = index + 1,
                    total_batches,
                    count = batch.len(),
                    error = %e,
                    "Upsert batch failed"
                );
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::record::Metadata;

    fn records(n: usize) -> Vec<VectorRecord> {
        (0..n)
            .map(|i| VectorRecord::new(format!("id-{:03}", i), vec![i as f32; 4], Metadata::new()))
            .collect()
    }

    #[tokio::test]
    async fn test_batches_of_fifty() {
        let store = InMemoryStore::new();
        let report = upsert_in_batches(&store, &records(120), 50).await.unwrap();

        assert_eq!(report.batches_committed, 3);
        assert_eq!(report.batches_failed, 0);
        assert_eq!(report.vectors_upserted, 120);
        assert!(report.is_complete());
        assert_eq!(store.len(), 120);
    }

    #[tokio::test]
    async fn test_single_batch() {
        let store = InMemoryStore::new();
        let report = upsert_in_batches(&store, &records(2), 50).await.unwrap();
        assert_eq!(report.batches_committed, 1);
        assert_eq!(report.vectors_upserted, 2);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_roll_back() {
        // id-051 lands in the second batch of three
        let store = InMemoryStore::new().with_rejected_ids(["id-051"]);
        let report = upsert_in_batches(&store, &records(120), 50).await.unwrap();

        assert_eq!(report.batches_committed, 2);
        assert_eq!(report.batches_failed, 1);
        assert_eq!(report.vectors_upserted, 70);
        assert_eq!(report.failed_ids.len(), 50);
        assert_eq!(report.failed_ids.first().map(String::as_str), Some("id-050"));
        assert!(!report.is_complete());
        assert_eq!(store.len(), 70);
        assert!(store.get("id-000").is_some());
        assert!(store.get("id-119").is_some());
    }

    #[tokio::test]
    async fn test_empty_is_error() {
        let store = InMemoryStore::new();
        let result = upsert_in_batches(&store, &[], 50).await;
        assert!(matches!(result, Err(VectorError::NothingToUpsert)));
    }
}
