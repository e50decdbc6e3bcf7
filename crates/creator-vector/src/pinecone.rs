//! Pinecone REST client.
//!
//! Talks to an index's data plane directly. The data-plane host is taken
//! from configuration or looked up once through the control plane.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::VectorError;
use crate::record::VectorRecord;
use crate::store::{NamespaceStats, StoreStats, VectorStore};

const API_VERSION: &str = "2024-07";

/// Connection settings for [`PineconeStore`].
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: SecretString,
    pub index_name: String,
    /// Data-plane host; resolved from `index_name` when `None`
    pub host: Option<String>,
    pub namespace: String,
    pub control_plane_url: String,
    pub timeout: Duration,
}

impl PineconeConfig {
    pub fn new(api_key: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            index_name: index_name.into(),
            host: None,
            namespace: String::new(),
            control_plane_url: "https://api.pinecone.io".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    namespace: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: BTreeMap<String, VectorRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAllRequest<'a> {
    delete_all: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeStatsResponse {
    #[serde(default)]
    total_vector_count: u64,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    namespaces: BTreeMap<String, NamespaceSummary>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceSummary {
    #[serde(default)]
    vector_count: u64,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

/// Vector store backed by a Pinecone serverless or pod index.
pub struct PineconeStore {
    client: Client,
    api_key: SecretString,
    host: String,
    namespace: String,
}

impl PineconeStore {
    /// Build a client, resolving the data-plane host if needed.
    pub async fn connect(config: PineconeConfig) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VectorError::Config(e.to_string()))?;

        let host = match config.host.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => normalize_host(host),
            None => resolve_host(&client, &config).await?,
        };
        info!(index = %config.index_name, host = %host, namespace = %config.namespace, "Connected to Pinecone index");

        Ok(Self {
            client,
            api_key: config.api_key,
            host,
            namespace: config.namespace,
        })
    }

    /// Data-plane base URL in use.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

async fn resolve_host(client: &Client, config: &PineconeConfig) -> Result<String, VectorError> {
    if config.index_name.trim().is_empty() {
        return Err(VectorError::Config(
            "index name is required when no host is configured".to_string(),
        ));
    }
    let url = format!(
        "{}/indexes/{}",
        config.control_plane_url.trim_end_matches('/'),
        config.index_name
    );
    debug!(url = %url, "Resolving index host");

    let response = client
        .get(url)
        .header("Api-Key", config.api_key.expose_secret())
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await?;
    let description: IndexDescription = check(response).await?.json().await?;
    Ok(normalize_host(&description.host))
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

async fn check(response: Response) -> Result<Response, VectorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(VectorError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl VectorStore for PineconeStore {
    fn name(&self) -> &str {
        "pinecone"
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, VectorError> {
        let request = UpsertRequest {
            vectors: records,
            namespace: &self.namespace,
        };
        let response = self
            .authorized(self.client.post(self.url("/vectors/upsert")))
            .json(&request)
            .send()
            .await?;
        let body: UpsertResponse = check(response).await?.json().await?;
        Ok(body.upserted_count)
    }

    async fn fetch(&self, ids: &[String]) -> Result<BTreeMap<String, VectorRecord>, VectorError> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let mut query: Vec<(&str, &str)> = ids.iter().map(|id| ("ids", id.as_str())).collect();
        query.push(("namespace", self.namespace.as_str()));

        let response = self
            .authorized(self.client.get(self.url("/vectors/fetch")))
            .query(&query)
            .send()
            .await?;
        let body: FetchResponse = check(response).await?.json().await?;
        Ok(body.vectors)
    }

    async fn describe_stats(&self) -> Result<StoreStats, VectorError> {
        let response = self
            .authorized(self.client.post(self.url("/describe_index_stats")))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body: DescribeStatsResponse = check(response).await?.json().await?;

        Ok(StoreStats {
            total_vector_count: body.total_vector_count,
            dimension: body.dimension,
            namespaces: body
                .namespaces
                .into_iter()
                .map(|(name, ns)| {
                    (
                        name,
                        NamespaceStats {
                            vector_count: ns.vector_count,
                        },
                    )
                })
                .collect(),
        })
    }

    async fn delete_all(&self) -> Result<(), VectorError> {
        let request = DeleteAllRequest {
            delete_all: true,
            namespace: &self.namespace,
        };
        let response = self
            .authorized(self.client.post(self.url("/vectors/delete")))
            .json(&request)
            .send()
            .await?;

        // Deleting from a namespace that was never written returns 404
        if response.status() == StatusCode::NOT_FOUND {
            debug!(namespace = %self.namespace, "Namespace already empty");
            return Ok(());
        }
        check(response).await?;
        Ok(())
    }
}
