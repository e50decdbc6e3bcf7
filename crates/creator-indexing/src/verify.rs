//! Post-load verification against the live store.
//!
//! Read-only: compares the stored count with what was expected and checks
//! that sampled records carry every required metadata field.

use std::fmt;

use creator_vector::{Metadata, VectorStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::IndexingError;

/// Metadata fields every stored record must carry.
pub const REQUIRED_FIELDS: [&str; 15] = [
    "name",
    "instagram",
    "followers",
    "niche",
    "brand_fit",
    "mf_split",
    "india_split",
    "age_concentration",
    "commercials",
    "follower_tier",
    "engagement_rate",
    "avg_views",
    "email",
    "contact_no",
    "text",
];

const PREVIEW_CHARS: usize = 40;

/// State of one required field on one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "preview", rename_all = "snake_case")]
pub enum FieldStatus {
    /// Present with a value; holds the first 40 characters
    Present(String),
    /// Present but blank
    Empty,
    Missing,
}

impl FieldStatus {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldStatus::Missing)
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldStatus::Present(preview) => write!(f, "= {}", preview),
            FieldStatus::Empty => f.write_str("= (empty)"),
            FieldStatus::Missing => f.write_str("= MISSING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCheck {
    pub field: &'static str,
    pub status: FieldStatus,
}

/// Required-field check for one fetched record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCheck {
    pub id: String,
    pub fields: Vec<FieldCheck>,
}

impl RecordCheck {
    pub fn from_metadata(id: impl Into<String>, metadata: &Metadata) -> Self {
        let fields = REQUIRED_FIELDS
            .into_iter()
            .map(|field| FieldCheck {
                field,
                status: match metadata.get(field) {
                    None => FieldStatus::Missing,
                    Some(value) if value.is_empty() => FieldStatus::Empty,
                    Some(value) => {
                        FieldStatus::Present(value.to_string().chars().take(PREVIEW_CHARS).collect())
                    }
                },
            })
            .collect();
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn all_present(&self) -> bool {
        self.fields.iter().all(|f| !f.status.is_missing())
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.status.is_missing())
            .map(|f| f.field)
            .collect()
    }
}

/// Outcome of a verification pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    /// Records in the verified namespace
    pub total_count: u64,
    pub expected_count: u64,
    /// Ids requested from the store
    pub sampled: Vec<String>,
    /// Checks for the sampled ids that were found
    pub records: Vec<RecordCheck>,
    /// Sampled ids the store did not return
    pub missing_ids: Vec<String>,
    /// Every fetched record has every required field
    pub all_fields_present: bool,
}

impl VerificationReport {
    pub fn is_empty_store(&self) -> bool {
        self.total_count == 0
    }

    pub fn count_matches(&self) -> bool {
        self.total_count == self.expected_count
    }

    /// Nothing missing: every sampled id found with every required field.
    pub fn passed(&self) -> bool {
        !self.is_empty_store() && self.all_fields_present && self.missing_ids.is_empty()
    }
}

/// Check the store's aggregate count and a sample of records.
///
/// An empty store short-circuits without fetching. `all_fields_present` is
/// false when none of the sampled ids was found.
pub async fn verify(
    store: &dyn VectorStore,
    expected_count: u64,
    sample_ids: &[String],
) -> Result<VerificationReport, IndexingError> {
    let stats = store.describe_stats().await?;
    let total_count = stats.total_vector_count;
    info!(total = total_count, expected = expected_count, "Store record count");

    let mut report = VerificationReport {
        total_count,
        expected_count,
        sampled: sample_ids.to_vec(),
        records: Vec::new(),
        missing_ids: Vec::new(),
        all_fields_present: false,
    };

    if total_count == 0 {
        warn!("Vector store is empty");
        return Ok(report);
    }
    if total_count != expected_count {
        warn!(
            total = total_count,
            expected = expected_count,
            "Store count differs from expected"
        );
    }

    let fetched = store.fetch(sample_ids).await?;
    for id in sample_ids {
        match fetched.get(id) {
            Some(record) => report
                .records
                .push(RecordCheck::from_metadata(id.clone(), &record.metadata)),
            None => report.missing_ids.push(id.clone()),
        }
    }

    report.all_fields_present =
        !report.records.is_empty() && report.records.iter().all(RecordCheck::all_present);

    info!(
        fetched = report.records.len(),
        sampled = sample_ids.len(),
        all_fields_present = report.all_fields_present,
        "Verification complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use creator_vector::{
        InMemoryStore, MetadataValue, NamespaceStats, StoreStats, VectorError, VectorRecord,
    };
    use std::collections::BTreeMap;

    fn complete_metadata(name: &str) -> Metadata {
        let mut metadata = Metadata::new();
        for field in REQUIRED_FIELDS {
            metadata.insert(field.to_string(), MetadataValue::from("x"));
        }
        metadata.insert("name".into(), name.into());
        metadata.insert("followers".into(), MetadataValue::Number(12_000.0));
        metadata.insert("email".into(), "".into());
        metadata
    }

    async fn store_with(records: Vec<VectorRecord>) -> InMemoryStore {
        let store = InMemoryStore::new();
        store.upsert(&records).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_all_fields_present() {
        let store = store_with(vec![
            VectorRecord::new("a", vec![1.0], complete_metadata("Asha")),
            VectorRecord::new("b", vec![1.0], complete_metadata("Ravi")),
        ])
        .await;

        let report = verify(&store, 2, &["a".into(), "b".into()]).await.unwrap();
        assert_eq!(report.total_count, 2);
        assert!(report.count_matches());
        assert_eq!(report.records.len(), 2);
        assert!(report.missing_ids.is_empty());
        assert!(report.all_fields_present);
        assert!(report.passed());

        let check = &report.records[0];
        let status = |name: &str| {
            check
                .fields
                .iter()
                .find(|f| f.field == name)
                .map(|f| f.status.clone())
                .unwrap()
        };
        assert_eq!(status("name"), FieldStatus::Present("Asha".into()));
        assert_eq!(status("followers"), FieldStatus::Present("12000".into()));
        assert_eq!(status("email"), FieldStatus::Empty);
    }

    #[tokio::test]
    async fn test_missing_commercials_fails() {
        let mut metadata = complete_metadata("Asha");
        metadata.remove("commercials");
        let store = store_with(vec![VectorRecord::new("a", vec![1.0], metadata)]).await;

        let report = verify(&store, 1, &["a".into()]).await.unwrap();
        assert!(!report.all_fields_present);
        assert!(!report.passed());
        assert_eq!(report.records[0].missing_fields(), vec!["commercials"]);
    }

    #[tokio::test]
    async fn test_reports_missing_ids_and_count_mismatch() {
        let store = store_with(vec![VectorRecord::new("a", vec![1.0], complete_metadata("Asha"))]).await;

        let report = verify(&store, 5, &["a".into(), "ghost".into()]).await.unwrap();
        assert!(!report.count_matches());
        assert_eq!(report.missing_ids, vec!["ghost".to_string()]);
        assert!(report.all_fields_present);
        assert!(!report.passed());
    }

    #[tokio::test]
    async fn test_empty_store_short_circuits() {
        let store = InMemoryStore::new();
        let report = verify(&store, 3, &["a".into()]).await.unwrap();
        assert!(report.is_empty_store());
        assert!(report.records.is_empty());
        assert!(report.missing_ids.is_empty());
        assert!(!report.passed());
    }

    /// Stats keyed by a namespace name the store was not configured with.
    struct RenamedNamespaceStore {
        inner: InMemoryStore,
    }

    #[async_trait]
    impl VectorStore for RenamedNamespaceStore {
        fn name(&self) -> &str {
            "renamed"
        }

        fn namespace(&self) -> &str {
            ""
        }

        async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, VectorError> {
            self.inner.upsert(records).await
        }

        async fn fetch(
            &self,
            ids: &[String],
        ) -> Result<BTreeMap<String, VectorRecord>, VectorError> {
            self.inner.fetch(ids).await
        }

        async fn describe_stats(&self) -> Result<StoreStats, VectorError> {
            let mut namespaces = BTreeMap::new();
            namespaces.insert(
                "__default__".to_string(),
                NamespaceStats { vector_count: 311 },
            );
            Ok(StoreStats {
                total_vector_count: 311,
                dimension: Some(8),
                namespaces,
            })
        }

        async fn delete_all(&self) -> Result<(), VectorError> {
            self.inner.delete_all().await
        }
    }

    #[tokio::test]
    async fn test_uses_aggregate_count() {
        let store = RenamedNamespaceStore {
            inner: store_with(vec![VectorRecord::new("a", vec![1.0], complete_metadata("Asha"))])
                .await,
        };

        let report = verify(&store, 311, &["a".into()]).await.unwrap();
        assert_eq!(report.total_count, 311);
        assert!(!report.is_empty_store());
        assert!(report.count_matches());
        assert_eq!(report.records.len(), 1);
        assert!(report.passed());
    }

    #[test]
    fn test_preview_truncated() {
        let mut metadata = complete_metadata("Asha");
        metadata.insert("text".into(), "a".repeat(100).into());
        let check = RecordCheck::from_metadata("a", &metadata);
        let text = check.fields.iter().find(|f| f.field == "text").unwrap();
        assert_eq!(text.status, FieldStatus::Present("a".repeat(40)));
    }
}
