//! Profile description and metadata mapping.
//!
//! Both functions are pure: the same record always produces the same text
//! and the same metadata, which keeps repeated runs idempotent.

use creator_types::record::non_blank;
use creator_types::{FollowerTier, SourceRecord};
use creator_vector::{Metadata, MetadataValue};

/// Text used when a record carries no describable field.
pub const PLACEHOLDER_TEXT: &str = "Influencer profile";

const CLAUSE_SEPARATOR: &str = ". ";

/// Build the natural-language description that gets embedded.
pub fn synthesize(record: &SourceRecord) -> String {
    let profile = &record.profile;
    let brand = &record.brand;
    let metrics = &record.metrics;
    let audience = &record.audience;

    let mut clauses: Vec<String> = Vec::new();
    if let Some(name) = non_blank(&profile.name) {
        clauses.push(format!("{} is an influencer", name));
    }
    if let Some(location) = non_blank(&profile.location) {
        clauses.push(format!("based in {}", location));
    }
    if let Some(gender) = non_blank(&profile.gender) {
        clauses.push(format!("({})", gender));
    }
    if let Some(kind) = non_blank(&profile.kind) {
        clauses.push(format!("classified as a {} creator", kind));
    }
    if let Some(niche) = non_blank(&brand.niche) {
        clauses.push(format!("specializing in {}", niche));
    }
    if let Some(fit) = non_blank(&brand.brand_fit) {
        clauses.push(format!("suited for brands in {}", fit));
    }
    if let Some(vibe) = non_blank(&brand.vibe) {
        clauses.push(format!("with a {} content style", vibe));
    }

    let mut reach = Vec::new();
    if let Some(followers) = metrics.followers.filter(|n| *n > 0) {
        reach.push(format!("{} followers", format_thousands(followers as f64)));
    }
    if let Some(views) = metrics.avg_views.filter(|n| *n > 0.0) {
        reach.push(format!("averaging {} views per post", format_thousands(views)));
    }
    if let Some(rate) = metrics.engagement_rate.filter(|n| *n > 0.0) {
        reach.push(format!("{}% engagement rate", rate));
    }
    if !reach.is_empty() {
        clauses.push(format!("with {}", reach.join(", ")));
    }

    let mut demographics = Vec::new();
    if let Some(split) = non_blank(&audience.mf_split) {
        demographics.push(format!("male/female split of {}", split));
    }
    if let Some(split) = non_blank(&audience.india_split) {
        demographics.push(format!("India audience split of {}", split));
    }
    if let Some(ages) = non_blank(&audience.age_concentration) {
        demographics.push(format!("audience concentrated in age group {}", ages));
    }
    if !demographics.is_empty() {
        clauses.push(format!("Audience demographics: {}", demographics.join(", ")));
    }

    if let Some(commercials) = non_blank(&record.commercials).filter(|c| *c != "-") {
        clauses.push(format!(
            "Past campaign performance and commercials: {}",
            commercials
        ));
    }

    if clauses.is_empty() {
        PLACEHOLDER_TEXT.to_string()
    } else {
        clauses.join(CLAUSE_SEPARATOR)
    }
}

/// Map a record and its description to the flat metadata stored with the
/// vector. Absent strings become `""`, absent numbers become `0`.
pub fn build_metadata(record: &SourceRecord, text: &str) -> Metadata {
    let text_or_empty = |value: &Option<String>| -> MetadataValue {
        MetadataValue::Text(non_blank(value).unwrap_or_default().to_string())
    };
    let profile = &record.profile;
    let brand = &record.brand;
    let metrics = &record.metrics;
    let audience = &record.audience;

    let mut metadata = Metadata::new();
    metadata.insert(
        "name".into(),
        non_blank(&profile.name).unwrap_or("Unknown").into(),
    );
    metadata.insert("instagram".into(), text_or_empty(&profile.link));
    metadata.insert("gender".into(), text_or_empty(&profile.gender));
    metadata.insert("location".into(), text_or_empty(&profile.location));
    metadata.insert("type".into(), text_or_empty(&profile.kind));
    metadata.insert("niche".into(), text_or_empty(&brand.niche));
    metadata.insert("brand_fit".into(), text_or_empty(&brand.brand_fit));
    metadata.insert("vibe".into(), text_or_empty(&brand.vibe));
    metadata.insert(
        "followers".into(),
        metrics.followers.unwrap_or(0).into(),
    );
    metadata.insert(
        "follower_tier".into(),
        FollowerTier::from_followers(metrics.followers).as_str().into(),
    );
    metadata.insert("avg_views".into(), metrics.avg_views.unwrap_or(0.0).into());
    metadata.insert(
        "engagement_rate".into(),
        metrics.engagement_rate.unwrap_or(0.0).into(),
    );
    metadata.insert("mf_split".into(), text_or_empty(&audience.mf_split));
    metadata.insert("india_split".into(), text_or_empty(&audience.india_split));
    metadata.insert(
        "age_concentration".into(),
        text_or_empty(&audience.age_concentration),
    );
    metadata.insert("commercials".into(), text_or_empty(&record.commercials));
    metadata.insert("contact_no".into(), text_or_empty(&record.contact.contact_no));
    metadata.insert("email".into(), text_or_empty(&record.contact.email));
    metadata.insert("text".into(), text.into());
    metadata
}

/// Format with comma-grouped thousands and at most three decimals.
pub fn format_thousands(value: f64) -> String {
    let formatted = format_decimal(value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Round to three decimals and drop trailing zeros.
fn format_decimal(value: f64) -> String {
    let rounded = format!("{:.3}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
