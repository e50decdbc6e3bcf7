//! # creator-types
//!
//! Shared domain types for the creator index.
//!
//! This crate defines the data structures used throughout the pipeline:
//! - Source records: raw creator profiles exported by the ingestion step
//! - Follower tiers: popularity buckets derived from follower counts
//! - Settings: layered configuration for the pipeline and its clients
//!
//! ## Usage
//!
//! ```rust
//! use creator_types::{FollowerTier, SourceRecord};
//!
//! let record: SourceRecord = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
//! assert!(!record.is_eligible());
//! assert_eq!(FollowerTier::from_followers(None), FollowerTier::Unknown);
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod tier;

pub use config::{
    Credentials, EmbeddingSettings, PacingSettings, Settings, VectorStoreSettings, VerifySettings,
};
pub use error::SettingsError;
pub use record::{Audience, Brand, Contact, Metrics, Profile, SourceRecord};
pub use tier::FollowerTier;
