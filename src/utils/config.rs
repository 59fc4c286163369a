//! TOML-based configuration for the pipeline.
//!
//! Configuration is loaded from a TOML file and can be overridden by
//! `TEXTMILL_*` environment variables. Chunking parameters are validated at
//! load time by constructing a [`FixedSizeChunker`], so an invalid
//! size/overlap combination fails before any document is processed.
//!
//! ```toml
//! [chunking]
//! chunk_size = 200
//! chunk_overlap = 50
//!
//! [embedding]
//! base_url = "http://localhost:11434/v1"
//! model = "nomic-embed-text"
//! timeout_secs = 30
//!
//! [store]
//! base_url = "http://localhost:8000"
//! timeout_secs = 30
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunker::FixedSizeChunker;
use crate::embedder::HttpEmbedderConfig;
use crate::store::HttpChunkStoreConfig;
use crate::types::{AppError, Result};

/// Root configuration loaded from `textmill.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MillConfig {
    /// Default chunking parameters, overridable per request.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding API endpoint.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chunk-store backend endpoint.
    #[serde(default)]
    pub store: StoreConfig,
}

// ============= Chunking Configuration =============

/// Default window size and overlap for the chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target token count per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Trailing tokens repeated at the start of the next chunk.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    200
}

fn default_chunk_overlap() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl ChunkingConfig {
    /// Build the default chunker from these parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] for an invalid size/overlap
    /// combination.
    pub fn build_chunker(&self) -> Result<FixedSizeChunker> {
        FixedSizeChunker::new(self.chunk_size, self.chunk_overlap)
    }
}

// ============= Embedding Configuration =============

/// Embedding API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding API.
    #[serde(default = "default_embedding_url")]
    pub base_url: String,

    /// Model name sent with every request.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_embedding_url(),
            model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl From<EmbeddingConfig> for HttpEmbedderConfig {
    fn from(config: EmbeddingConfig) -> Self {
        Self {
            base_url: config.base_url,
            model: config.model,
            timeout_secs: config.timeout_secs,
        }
    }
}

// ============= Store Configuration =============

/// Chunk-store backend endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the chunk-store backend.
    #[serde(default = "default_store_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_store_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl From<StoreConfig> for HttpChunkStoreConfig {
    fn from(config: StoreConfig) -> Self {
        Self {
            base_url: config.base_url,
            timeout_secs: config.timeout_secs,
        }
    }
}

// ============= Loading =============

impl MillConfig {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the file cannot be read or
    /// parsed, or if the chunking parameters are invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let mut config: MillConfig = toml::from_str(&raw)
            .map_err(|e| AppError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from defaults and environment overrides only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if an override produces invalid
    /// chunking parameters.
    pub fn from_env() -> Result<Self> {
        let mut config = MillConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(size) = env_parse("TEXTMILL_CHUNK_SIZE") {
            self.chunking.chunk_size = size;
        }
        if let Some(overlap) = env_parse("TEXTMILL_CHUNK_OVERLAP") {
            self.chunking.chunk_overlap = overlap;
        }
        if let Ok(url) = std::env::var("TEXTMILL_EMBEDDING_URL") {
            if !url.is_empty() {
                self.embedding.base_url = url;
            }
        }
        if let Ok(model) = std::env::var("TEXTMILL_EMBEDDING_MODEL") {
            if !model.is_empty() {
                self.embedding.model = model;
            }
        }
        if let Ok(url) = std::env::var("TEXTMILL_STORE_URL") {
            if !url.is_empty() {
                self.store.base_url = url;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        self.chunking.build_chunker().map(|_| ())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
