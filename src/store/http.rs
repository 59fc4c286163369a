//! REST client for the external chunk-store backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::store::ChunkStore;
use crate::types::{AppError, ChunkRecord, MetadataMap, Result, ScoredChunk, StoredChunk};

/// Configuration for [`HttpChunkStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpChunkStoreConfig {
    /// Base URL of the chunk-store backend (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize)]
struct StoreResponse {
    id: String,
}

#[derive(Serialize)]
struct SearchRequestBody<'a> {
    embedding: &'a [f32],
    limit: usize,
    threshold: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a MetadataMap>,
}

#[derive(Deserialize)]
struct SearchResponseBody {
    results: Vec<ScoredChunk>,
}

#[derive(Serialize)]
struct FilterRequestBody<'a> {
    filter: &'a MetadataMap,
    limit: usize,
}

#[derive(Deserialize)]
struct FilterResponseBody {
    results: Vec<StoredChunk>,
}

/// Chunk store backed by the external REST backend.
///
/// Every operation is a single request; retry and backoff policy belongs to
/// the backend's operator, not this client.
pub struct HttpChunkStore {
    client: reqwest::Client,
    config: HttpChunkStoreConfig,
}

impl HttpChunkStore {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: HttpChunkStoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build store HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Store(format!(
                        "Store request to /{} timed out after {}s",
                        path, self.config.timeout_secs
                    ))
                } else {
                    AppError::Store(format!("Store request to /{} failed: {}", path, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "Store backend returned {} for /{}: {}",
                status, path, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::Store(format!("Invalid store response from /{}: {}", path, e))
        })
    }
}

#[async_trait]
impl ChunkStore for HttpChunkStore {
    async fn store(&self, record: &ChunkRecord) -> Result<String> {
        let response: StoreResponse = self.post("chunks", record).await?;
        Ok(response.id)
    }

    async fn similarity_search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
        filter: Option<MetadataMap>,
    ) -> Result<Vec<ScoredChunk>> {
        let body = SearchRequestBody {
            embedding,
            limit,
            threshold,
            filter: filter.as_ref(),
        };
        let response: SearchResponseBody = self.post("search", &body).await?;
        Ok(response.results)
    }

    async fn metadata_filter(
        &self,
        filter: &MetadataMap,
        limit: usize,
    ) -> Result<Vec<StoredChunk>> {
        let body = FilterRequestBody { filter, limit };
        let response: FilterResponseBody = self.post("filter", &body).await?;
        Ok(response.results)
    }
}
