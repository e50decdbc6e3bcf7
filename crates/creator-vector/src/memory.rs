//! In-memory vector store.
//!
//! Backed by a `BTreeMap` so iteration and fetch results are ordered by id.
//! Used by tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::VectorError;
use crate::record::VectorRecord;
use crate::store::{NamespaceStats, StoreStats, VectorStore};

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<String, VectorRecord>,
    dimension: Option<usize>,
}

/// Vector store held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    namespace: String,
    inner: RwLock<Inner>,
    /// Ids whose batches are refused, to exercise partial failures
    rejected_ids: BTreeSet<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Refuse any upsert batch containing one of these ids.
    pub fn with_rejected_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of a stored record.
    pub fn get(&self, id: &str) -> Option<VectorRecord> {
        self.read().records.get(id).cloned()
    }

    /// All stored ids in order.
    pub fn ids(&self) -> Vec<String> {
        self.read().records.keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, VectorError> {
        if let Some(rejected) = records.iter().find(|r| self.rejected_ids.contains(&r.id)) {
            return Err(VectorError::Api {
                status: 400,
                body: format!("record {} rejected", rejected.id),
            });
        }

        let mut inner = self.write();

        // Validate the whole batch before writing any of it
        let mut expected = inner.dimension;
        for record in records {
            match expected {
                Some(d) if d != record.dimension() => {
                    return Err(VectorError::DimensionMismatch {
                        expected: d,
                        actual: record.dimension(),
                    });
                }
                None => expected = Some(record.dimension()),
                _ => {}
            }
        }
        inner.dimension = expected;

        for record in records {
            inner.records.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn fetch(&self, ids: &[String]) -> Result<BTreeMap<String, VectorRecord>, VectorError> {
        let inner = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.records.get(id).map(|r| (id.clone(), r.clone())))
            .collect())
    }

    async fn describe_stats(&self) -> Result<StoreStats, VectorError> {
        let inner = self.read();
        let count = inner.records.len() as u64;
        let mut namespaces = BTreeMap::new();
        if count > 0 {
            namespaces.insert(
                self.namespace.clone(),
                NamespaceStats {
                    vector_count: count,
                },
            );
        }
        Ok(StoreStats {
            total_vector_count: count,
            dimension: inner.dimension,
            namespaces,
        })
    }

    async fn delete_all(&self) -> Result<(), VectorError> {
        let mut inner = self.write();
        inner.records.clear();
        Ok(())
    }
}
