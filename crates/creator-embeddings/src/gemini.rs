//! Gemini embedding client.
//!
//! Calls the `models/{model}:embedContent` endpoint of the Generative
//! Language API, one text per request.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Default API base.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for [`GeminiEmbedder`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    /// Requested output dimensionality; provider default when `None`
    pub dimensions: Option<usize>,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            model: "gemini-embedding-001".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            dimensions: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_dimensions(mut self, dimensions: Option<usize>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

/// Embedding model backed by the Gemini API.
pub struct GeminiEmbedder {
    config: GeminiConfig,
    client: Client,
    info: ModelInfo,
    /// Dimension every vector in this run must have
    dimension: OnceLock<usize>,
}

impl GeminiEmbedder {
    pub fn new(config: GeminiConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::Config(e.to_string()))?;

        let dimension = OnceLock::new();
        if let Some(d) = config.dimensions {
            let _ = dimension.set(d);
        }

        let info = ModelInfo {
            name: config.model.clone(),
            dimension: config.dimensions,
        };

        Ok(Self {
            config,
            client,
            info,
            dimension,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:embedContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn check_dimension(&self, actual: usize) -> Result<(), EmbeddingError> {
        let expected = *self.dimension.get_or_init(|| actual);
        if expected != actual {
            return Err(EmbeddingError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingModel for GeminiEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    #[instrument(skip(self, text), fields(model = %self.config.model, chars = text.len()))]
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("text is empty".to_string()));
        }

        let request = EmbedContentRequest {
            model: format!("models/{}", self.config.model),
            content: Content {
                parts: [Part { text }],
            },
            output_dimensionality: self.config.dimensions,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Http(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::RateLimited(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Parse(e.to_string()))?;

        let values = body.embedding.map(|e| e.values).unwrap_or_default();
        if values.is_empty() {
            return Err(EmbeddingError::EmptyEmbedding);
        }
        self.check_dimension(values.len())?;

        debug!(dimension = values.len(), "Embedding generated");
        Ok(Embedding::new(values))
    }
}
