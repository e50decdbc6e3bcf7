//! # creator-vector
//!
//! Vector storage for the creator index.
//!
//! Records are keyed by the creator's external id, so writing the same id
//! again overwrites the previous vector and metadata instead of appending.
//!
//! ## Features
//! - `VectorStore` async trait: upsert, fetch, stats, purge
//! - Pinecone REST data-plane client with control-plane host lookup
//! - `BTreeMap`-backed in-memory store with identical overwrite semantics
//! - Sequential fixed-size batch upserter that records per-batch failures

pub mod error;
pub mod memory;
pub mod pinecone;
pub mod record;
pub mod store;
pub mod upsert;

pub use error::VectorError;
pub use memory::InMemoryStore;
pub use pinecone::{PineconeConfig, PineconeStore};
pub use record::{Metadata, MetadataValue, VectorRecord};
pub use store::{NamespaceStats, StoreStats, VectorStore};
pub use upsert::{upsert_in_batches, UpsertReport};
