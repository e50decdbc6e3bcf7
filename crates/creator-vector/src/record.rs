//! Vector records and their flat metadata.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive metadata value accepted by the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    /// Whether the value carries no information ("" or an empty list).
    pub fn is_empty(&self) -> bool {
        match self {
            MetadataValue::Text(s) => s.trim().is_empty(),
            MetadataValue::List(items) => items.is_empty(),
            MetadataValue::Bool(_) | MetadataValue::Number(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            MetadataValue::Number(n) => write!(f, "{}", n),
            MetadataValue::Text(s) => f.write_str(s),
            MetadataValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

/// Flat key to primitive map stored alongside each vector.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// One entry in the vector store, keyed by the creator's external id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, values: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            values,
            metadata,
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_wire_format() {
        let mut metadata = Metadata::new();
        metadata.insert("name".into(), "Asha".into());
        metadata.insert("followers".into(), 125_000i64.into());
        metadata.insert("verified".into(), true.into());
        let record = VectorRecord::new("abc", vec![0.5, 0.25], metadata);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "values": [0.5, 0.25],
                "metadata": {"followers": 125000.0, "name": "Asha", "verified": true}
            })
        );
    }

    #[test]
    fn test_deserialize_store_response() {
        let json = r#"{"id": "x", "metadata": {"followers": 12400, "niche": "Food", "tags": ["a", "b"]}}"#;
        let record: VectorRecord = serde_json::from_str(json).unwrap();
        assert!(record.values.is_empty());
        assert_eq!(record.metadata["followers"], MetadataValue::Number(12400.0));
        assert_eq!(record.metadata["niche"].as_str(), Some("Food"));
        assert_eq!(
            record.metadata["tags"],
            MetadataValue::List(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_display_and_emptiness() {
        assert_eq!(MetadataValue::Number(12400.0).to_string(), "12400");
        assert_eq!(MetadataValue::Number(3.5).to_string(), "3.5");
        assert!(MetadataValue::Text("  ".into()).is_empty());
        assert!(!MetadataValue::Number(0.0).is_empty());
    }
}
