//! Configuration loading for the creator index.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/creator-index/config.toml`.
//! Environment overrides use the `CREATOR_` prefix with `__` between nested
//! keys (`CREATOR_PACING__CHUNK_SIZE=45`). The provider-conventional
//! variables `GEMINI_API_KEY`, `PINECONE_API_KEY`, `PINECONE_INDEX` and
//! `PINECONE_HOST` fill credentials that are still unset afterwards.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Provider name ("gemini" or "mock")
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Model identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// API key (normally from GEMINI_API_KEY, not stored in the config file)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Requested output dimensionality, when the model supports truncation
    #[serde(default)]
    pub dimensions: Option<usize>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt when the provider rate-limits
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Linear backoff step: retry N waits N * step seconds
    #[serde(default = "default_backoff_step_secs")]
    pub backoff_step_secs: u64,
}

fn default_embedding_provider() -> String {
    "gemini".to_string()
}

fn default_embedding_model() -> String {
    "gemini-embedding-001".to_string()
}

fn default_embedding_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_step_secs() -> u64 {
    20
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            api_key: None,
            base_url: default_embedding_base_url(),
            dimensions: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_step_secs: default_backoff_step_secs(),
        }
    }
}

impl EmbeddingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::from_secs(self.backoff_step_secs)
    }
}

/// Vector store (Pinecone) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreSettings {
    /// API key (normally from PINECONE_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Index name, resolved to a data-plane host through the control plane
    #[serde(default)]
    pub index_name: Option<String>,

    /// Data-plane host; skips control-plane resolution when set
    #[serde(default)]
    pub host: Option<String>,

    /// Namespace inside the index ("" is the default namespace)
    #[serde(default)]
    pub namespace: String,

    /// Control-plane base URL
    #[serde(default = "default_control_plane_url")]
    pub control_plane_url: String,

    /// Vectors per upsert request
    #[serde(default = "default_upsert_batch_size")]
    pub batch_size: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_control_plane_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_upsert_batch_size() -> usize {
    50
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: None,
            host: None,
            namespace: String::new(),
            control_plane_url: default_control_plane_url(),
            batch_size: default_upsert_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl VectorStoreSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Request pacing against the embedding provider quota.
///
/// The defaults target a 100 requests/minute quota: 90 calls per window,
/// 200ms between calls, and a 62s pause before each window after the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingSettings {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_call_delay_ms")]
    pub call_delay_ms: u64,

    #[serde(default = "default_chunk_pause_ms")]
    pub chunk_pause_ms: u64,
}

fn default_chunk_size() -> usize {
    90
}

fn default_call_delay_ms() -> u64 {
    200
}

fn default_chunk_pause_ms() -> u64 {
    62_000
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            call_delay_ms: default_call_delay_ms(),
            chunk_pause_ms: default_chunk_pause_ms(),
        }
    }
}

impl PacingSettings {
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    pub fn chunk_pause(&self) -> Duration {
        Duration::from_millis(self.chunk_pause_ms)
    }
}

/// Post-load verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySettings {
    /// Number of ids sampled from the head of the input file
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Expected total record count; defaults to the eligible count
    #[serde(default)]
    pub expected_count: Option<u64>,
}

fn default_sample_size() -> usize {
    5
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            expected_count: None,
        }
    }
}

/// Resolved vector store credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub index_name: Option<String>,
    pub host: Option<String>,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the exported JSON array of source records
    #[serde(default = "default_input_path")]
    pub input_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub embedding: EmbeddingSettings,

    #[serde(default)]
    pub vector_store: VectorStoreSettings,

    #[serde(default)]
    pub pacing: PacingSettings,

    #[serde(default)]
    pub verify: VerifySettings,
}

fn default_input_path() -> String {
    "influencers_data.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            log_level: default_log_level(),
            embedding: EmbeddingSettings::default(),
            vector_store: VectorStoreSettings::default(),
            pacing: PacingSettings::default(),
            verify: VerifySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/creator-index/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (CREATOR_*), then provider variables for unset credentials
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, SettingsError> {
        let config_dir = ProjectDirs::from("", "", "creator-index")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("input_path", default_input_path())?
            .set_default("log_level", default_log_level())?
            .set_default("embedding.provider", default_embedding_provider())?
            .set_default("embedding.model", default_embedding_model())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CREATOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_provider_env(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Fill unset credentials from provider-conventional variables.
    pub fn apply_provider_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if self.embedding.api_key.is_none() {
            self.embedding.api_key = lookup("GEMINI_API_KEY");
        }
        if self.vector_store.api_key.is_none() {
            self.vector_store.api_key = lookup("PINECONE_API_KEY");
        }
        if self.vector_store.index_name.is_none() {
            self.vector_store.index_name = lookup("PINECONE_INDEX");
        }
        if self.vector_store.host.is_none() {
            self.vector_store.host = lookup("PINECONE_HOST");
        }
    }

    /// Validate numeric settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.pacing.chunk_size == 0 {
            return Err(SettingsError::Invalid(
                "pacing.chunk_size must be > 0".to_string(),
            ));
        }
        if self.vector_store.batch_size == 0 {
            return Err(SettingsError::Invalid(
                "vector_store.batch_size must be > 0".to_string(),
            ));
        }
        if self.verify.sample_size == 0 {
            return Err(SettingsError::Invalid(
                "verify.sample_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The embedding API key, or a fatal error when it is unset.
    pub fn embedding_api_key(&self) -> Result<&str, SettingsError> {
        self.embedding
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(SettingsError::MissingCredential {
                name: "embedding.api_key",
                hint: "GEMINI_API_KEY",
            })
    }

    /// Vector store credentials, or a fatal error when the key or index is unset.
    pub fn store_credentials(&self) -> Result<Credentials, SettingsError> {
        let store = &self.vector_store;
        let api_key = store
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(SettingsError::MissingCredential {
                name: "vector_store.api_key",
                hint: "PINECONE_API_KEY",
            })?;
        let index_name = store.index_name.clone().filter(|s| !s.trim().is_empty());
        let host = store.host.clone().filter(|s| !s.trim().is_empty());
        if index_name.is_none() && host.is_none() {
            return Err(SettingsError::MissingCredential {
                name: "vector_store.index_name",
                hint: "PINECONE_INDEX or PINECONE_HOST",
            });
        }
        Ok(Credentials {
            api_key: api_key.to_string(),
            index_name,
            host,
        })
    }

    /// Input path with a leading `~/` expanded.
    pub fn expanded_input_path(&self) -> PathBuf {
        if let Some(rest) = self.input_path.strip_prefix("~/") {
            if let Some(dirs) = directories::BaseDirs::new() {
                return dirs.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.input_path)
    }
}
