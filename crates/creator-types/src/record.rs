//! Source records exported by the upstream ingestion step.
//!
//! The export is loosely typed: counts arrive as numbers, numeric strings
//! ("12,400") or null, and identifiers may be numeric. Every nested field is
//! optional. The lenient deserializers below normalize those shapes once so
//! downstream code only deals with `Option`s.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw creator profile as exported by the ingestion step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Stable external identifier, used as the vector id
    #[serde(default, deserialize_with = "de_opt_text")]
    pub id: Option<String>,

    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub brand: Brand,

    #[serde(default)]
    pub metrics: Metrics,

    #[serde(default)]
    pub audience: Audience,

    /// Free-text history of past campaigns and pricing
    #[serde(default, deserialize_with = "de_opt_text")]
    pub commercials: Option<String>,

    #[serde(default)]
    pub contact: Contact,
}

/// Identity fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub gender: Option<String>,
    /// Creator classification (e.g. "Lifestyle", "UGC")
    #[serde(default, rename = "type", deserialize_with = "de_opt_text")]
    pub kind: Option<String>,
    /// Profile URL (usually Instagram)
    #[serde(default, deserialize_with = "de_opt_text")]
    pub link: Option<String>,
}

/// Brand positioning fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub niche: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub brand_fit: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub vibe: Option<String>,
}

/// Reach and engagement numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, deserialize_with = "de_opt_count")]
    pub followers: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub avg_views: Option<f64>,
    /// Percentage, e.g. `3.4` for 3.4%
    #[serde(default, deserialize_with = "de_opt_number")]
    pub engagement_rate: Option<f64>,
}

/// Audience composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audience {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub mf_split: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub india_split: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub age_concentration: Option<String>,
}

/// Contact details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub contact_no: Option<String>,
}

/// Return the trimmed value if the field holds non-blank text.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl SourceRecord {
    /// Non-blank external identifier.
    pub fn id(&self) -> Option<&str> {
        non_blank(&self.id)
    }

    /// Non-blank display name.
    pub fn name(&self) -> Option<&str> {
        non_blank(&self.profile.name)
    }

    /// Follower count, if the export carried one.
    pub fn followers(&self) -> Option<i64> {
        self.metrics.followers
    }

    /// Whether this record carries enough data to be worth embedding.
    ///
    /// Requires an id and a name, plus at least one of niche, a positive
    /// follower count, or brand fit.
    pub fn is_eligible(&self) -> bool {
        if self.id().is_none() || self.name().is_none() {
            return false;
        }
        non_blank(&self.brand.niche).is_some()
            || self.followers().is_some_and(|n| n > 0)
            || non_blank(&self.brand.brand_fit).is_some()
    }

    /// Label used in logs: the name when present, otherwise the id.
    pub fn label(&self) -> &str {
        self.name().or_else(|| self.id()).unwrap_or("<unnamed>")
    }
}

fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn de_opt_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => {
            let cleaned = clean_numeric(&s);
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    })
}

fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => clean_numeric(&s).parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|f| f.is_finite()))
}

fn clean_numeric(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '%') && !c.is_whitespace())
        .collect()
}
