//! # textmill
//!
//! A chunk/embed/store bridge for Retrieval Augmented Generation pipelines.
//!
//! The crate splits documents into overlapping windows of whitespace-delimited
//! tokens, obtains an embedding per chunk from a pluggable provider, and
//! persists the resulting records through a pluggable chunk store. Similarity
//! search and exact metadata filtering delegate to the same store.
//!
//! ## Pipeline
//!
//! 1. **Chunking** — [`chunker::FixedSizeChunker`] windows the text and stamps
//!    per-chunk metadata (`chunk_index`, `token_count`).
//! 2. **Embedding** — each chunk's content goes through an
//!    [`embedder::EmbeddingProvider`].
//! 3. **Storage** — `(content, embedding, metadata)` tuples are persisted via
//!    a [`store::ChunkStore`], which also answers similarity and metadata
//!    queries.
//!
//! Persistence, vector indexing and similarity computation live entirely in
//! the store backend; embedding computation lives in the embedding API. The
//! chunker itself is a pure function and the only algorithmic core.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use textmill::chunker::FixedSizeChunker;
//! use textmill::embedder::{HttpEmbedder, HttpEmbedderConfig};
//! use textmill::service::{ChunkService, IngestRequest, SearchRequest};
//! use textmill::store::{HttpChunkStore, HttpChunkStoreConfig};
//! use textmill::types::MetadataMap;
//!
//! # async fn run() -> textmill::types::Result<()> {
//! let embedder = HttpEmbedder::new(HttpEmbedderConfig {
//!     base_url: "http://localhost:11434/v1".into(),
//!     model: "nomic-embed-text".into(),
//!     timeout_secs: 30,
//! })?;
//! let store = HttpChunkStore::new(HttpChunkStoreConfig {
//!     base_url: "http://localhost:8000".into(),
//!     timeout_secs: 30,
//! })?;
//!
//! let service = ChunkService::new(
//!     FixedSizeChunker::new(200, 50)?,
//!     Arc::new(embedder),
//!     Arc::new(store),
//! );
//!
//! let receipt = service
//!     .ingest(IngestRequest {
//!         content: "The quick brown fox jumps over the lazy dog".into(),
//!         document_id: None,
//!         metadata: MetadataMap::new(),
//!         chunk_size: None,
//!         chunk_overlap: None,
//!     })
//!     .await?;
//! println!("stored {} chunks", receipt.chunks_stored);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`chunker`] - Fixed-size token-window chunking
//! - [`embedder`] - Embedding provider port and HTTP client
//! - [`store`] - Chunk store port, HTTP client, in-memory store
//! - [`service`] - Ingest / search / filter operations
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration loading

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Fixed-size token-window chunking.
pub mod chunker;
/// Embedding provider abstraction and HTTP client.
pub mod embedder;
/// Pipeline operations over injected ports.
pub mod service;
/// Chunk store abstraction and implementations.
pub mod store;
/// Core types (records, queries, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use chunker::FixedSizeChunker;
pub use embedder::{EmbeddingProvider, HttpEmbedder};
pub use service::{ChunkService, FilterRequest, IngestReceipt, IngestRequest, SearchRequest};
pub use store::{ChunkStore, HttpChunkStore, InMemoryChunkStore};
pub use types::{AppError, Chunk, ChunkRecord, MetadataMap, Result, ScoredChunk, StoredChunk};
pub use utils::config::MillConfig;
