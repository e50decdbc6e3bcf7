//! Vector store trait and types.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VectorError;
use crate::record::VectorRecord;

/// Per-namespace statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceStats {
    pub vector_count: u64,
}

/// Aggregate statistics for the whole index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Records across every namespace
    pub total_vector_count: u64,
    /// Index dimension, once known
    pub dimension: Option<usize>,
    pub namespaces: BTreeMap<String, NamespaceStats>,
}

/// Trait for vector stores.
///
/// A store instance is bound to one namespace. Upserting an id that already
/// exists replaces the stored record.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Namespace this instance reads and writes
    fn namespace(&self) -> &str;

    /// Insert or overwrite records by id. Returns the acknowledged count.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, VectorError>;

    /// Fetch records by id. Ids that do not exist are absent from the map.
    async fn fetch(&self, ids: &[String]) -> Result<BTreeMap<String, VectorRecord>, VectorError>;

    /// Aggregate index statistics.
    async fn describe_stats(&self) -> Result<StoreStats, VectorError>;

    /// Remove every record in this namespace.
    async fn delete_all(&self) -> Result<(), VectorError>;
}
