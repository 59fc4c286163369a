//! HTTP embedding client for OpenAI-compatible `/embeddings` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::embedder::EmbeddingProvider;
use crate::types::{AppError, Result};

/// Configuration for [`HttpEmbedder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpEmbedderConfig {
    /// Base URL of the embedding API (e.g. `http://localhost:11434/v1`).
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding provider backed by an OpenAI-compatible HTTP API.
///
/// Requests carry a bounded timeout; an elapsed timeout surfaces as an
/// [`AppError::Embedding`] naming the configured duration. Retry policy is
/// left to the operator of the backend.
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    /// Create a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: HttpEmbedderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build embedding HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    async fn request(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&EmbeddingsRequest {
                model: &self.config.model,
                input,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Embedding(format!(
                        "Embedding request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    AppError::Embedding(format!("Embedding request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "Embedding API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            AppError::Embedding(format!("Invalid embedding API response: {}", e))
        })?;

        if parsed.data.len() != input.len() {
            return Err(AppError::Embedding(format!(
                "Embedding API returned {} vectors for {} inputs",
                parsed.data.len(),
                input.len()
            )));
        }

        // The API is allowed to reorder entries; restore input order.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);

        tracing::debug!(
            model = %self.config.model,
            inputs = input.len(),
            "Embeddings computed"
        );

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let mut vectors = self.request(&input).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::Embedding("Embedding API returned no vectors".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }
}
