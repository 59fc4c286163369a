//! Pipeline operations: ingest, similarity search, metadata filter.
//!
//! [`ChunkService`] wires the chunker to an [`EmbeddingProvider`] and a
//! [`ChunkStore`], both injected at construction. The service holds no other
//! state, so a single instance can serve any number of concurrent callers.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chunker::FixedSizeChunker;
use crate::embedder::EmbeddingProvider;
use crate::store::ChunkStore;
use crate::types::{ChunkRecord, MetadataMap, Result, ScoredChunk, StoredChunk};

// ============= Request/Response Types =============

/// Request to chunk, embed and store one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Document text to ingest.
    pub content: String,
    /// Caller-assigned document identifier; a fresh UUID is assigned when
    /// absent.
    #[serde(default)]
    pub document_id: Option<String>,
    /// Metadata attached to every chunk of this document.
    #[serde(default)]
    pub metadata: MetadataMap,
    /// Per-request chunk size override.
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// Per-request chunk overlap override.
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
}

/// Outcome of an ingest operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// The document identifier under which chunks were stored.
    pub document_id: String,
    /// Store-assigned chunk ids, in chunk-index order.
    pub chunk_ids: Vec<String>,
    /// Number of chunks produced and stored.
    pub chunks_stored: usize,
}

/// Request for a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text; embedded with the same provider used at ingest time.
    pub query: String,
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Minimum similarity score for a result to be included.
    #[serde(default)]
    pub threshold: f32,
    /// Optional metadata constraint applied before ranking.
    #[serde(default)]
    pub filter: Option<MetadataMap>,
}

/// Request for an exact metadata-containment lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Metadata constraint; every pair must match exactly.
    pub filter: MetadataMap,
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

// ============= Service =============

/// Document ingestion and retrieval over injected embedding and store ports.
#[derive(Clone)]
pub struct ChunkService {
    chunker: FixedSizeChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
}

impl ChunkService {
    /// Create a service with the given default chunker and collaborator ports.
    pub fn new(
        chunker: FixedSizeChunker,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn ChunkStore>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            store,
        }
    }

    /// Chunk the document, embed every chunk and persist the resulting
    /// records. Returns assigned chunk ids in chunk-index order.
    ///
    /// Whitespace-only content produces a zero-chunk receipt without touching
    /// the embedder or the store.
    ///
    /// # Errors
    ///
    /// [`AppError::Configuration`](crate::types::AppError::Configuration) when
    /// the per-request size/overlap override is invalid (checked before any
    /// I/O); [`AppError::Embedding`](crate::types::AppError::Embedding) or
    /// [`AppError::Store`](crate::types::AppError::Store) when a collaborator
    /// fails.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestReceipt> {
        let start = Instant::now();

        let chunker = match (request.chunk_size, request.chunk_overlap) {
            (None, None) => self.chunker,
            (size, overlap) => FixedSizeChunker::new(
                size.unwrap_or(self.chunker.chunk_size()),
                overlap.unwrap_or(self.chunker.chunk_overlap()),
            )?,
        };

        let document_id = request
            .document_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let chunks = chunker.chunk(&request.content, &request.metadata);
        if chunks.is_empty() {
            tracing::info!(document_id = %document_id, "Nothing to ingest: no tokens in content");
            return Ok(IngestReceipt {
                document_id,
                chunk_ids: Vec::new(),
                chunks_stored: 0,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let created_at = Utc::now();
        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| ChunkRecord {
                document_id: document_id.clone(),
                chunk_index: chunk.index,
                content: chunk.content,
                embedding,
                chunk_size: chunker.chunk_size(),
                chunk_overlap: chunker.chunk_overlap(),
                metadata: chunk.metadata,
                created_at,
            })
            .collect();

        let chunk_ids = self.store.store_batch(&records).await?;

        tracing::info!(
            document_id = %document_id,
            chunks = chunk_ids.len(),
            chunk_size = chunker.chunk_size(),
            chunk_overlap = chunker.chunk_overlap(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Document ingested"
        );

        Ok(IngestReceipt {
            document_id,
            chunks_stored: chunk_ids.len(),
            chunk_ids,
        })
    }

    /// Embed the query text and return the most similar stored chunks.
    pub async fn search(&self, request: SearchRequest) -> Result<Vec<ScoredChunk>> {
        let start = Instant::now();

        let filtered = request.filter.is_some();
        let query_embedding = self.embedder.embed(&request.query).await?;
        let results = self
            .store
            .similarity_search(
                &query_embedding,
                request.limit,
                request.threshold,
                request.filter,
            )
            .await?;

        tracing::info!(
            results = results.len(),
            limit = request.limit,
            threshold = request.threshold,
            filtered,
            duration_ms = start.elapsed().as_millis() as u64,
            "Search completed"
        );

        Ok(results)
    }

    /// Return stored chunks whose metadata contains every pair of the
    /// request's constraint map.
    pub async fn filter(&self, request: FilterRequest) -> Result<Vec<StoredChunk>> {
        let start = Instant::now();

        let results = self
            .store
            .metadata_filter(&request.filter, request.limit)
            .await?;

        tracing::info!(
            results = results.len(),
            limit = request.limit,
            duration_ms = start.elapsed().as_millis() as u64,
            "Metadata filter completed"
        );

        Ok(results)
    }
}
