//! Core types shared across the crate: chunk records, query results,
//! and the error taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form chunk metadata: string keys mapping to arbitrary JSON values.
///
/// The pipeline never interprets caller-supplied metadata; it is merged with
/// the synthesized `chunk_index` / `token_count` keys at chunking time and
/// passed through to the chunk store unchanged.
pub type MetadataMap = serde_json::Map<String, serde_json::Value>;

// ============= Chunk Types =============

/// One windowed segment of a source document's tokens.
///
/// Chunks are transient output values: they have no identity of their own
/// until a [`ChunkStore`](crate::store::ChunkStore) persists them and assigns
/// a durable id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Space-joined tokens belonging to this window, in original order.
    pub content: String,
    /// Zero-based sequential position among chunks produced from one text.
    pub index: usize,
    /// Caller-supplied metadata merged with `chunk_index` and `token_count`.
    pub metadata: MetadataMap,
}

/// A chunk prepared for persistence: content plus its embedding, provenance
/// and the chunking parameters that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Caller-assigned identifier of the source document.
    pub document_id: String,
    /// Position of this chunk within the source document.
    pub chunk_index: usize,
    /// Chunk text.
    pub content: String,
    /// Fixed-length embedding vector for `content`.
    pub embedding: Vec<f32>,
    /// Token window size used to produce this chunk.
    pub chunk_size: usize,
    /// Token overlap used to produce this chunk.
    pub chunk_overlap: usize,
    /// Merged metadata map.
    pub metadata: MetadataMap,
    /// When the record was assembled.
    pub created_at: DateTime<Utc>,
}

/// A persisted chunk as returned by store queries.
///
/// Embeddings are not echoed back in query results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Store-assigned identifier.
    pub id: String,
    /// Source document identifier.
    pub document_id: String,
    /// Position of this chunk within the source document.
    pub chunk_index: usize,
    /// Chunk text.
    pub content: String,
    /// Merged metadata map.
    pub metadata: MetadataMap,
}

/// A similarity search hit: a stored chunk with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The matching chunk.
    pub chunk: StoredChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

// ============= Error Types =============

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid chunker or service configuration. Raised synchronously at
    /// construction time; nothing downstream can recover from it.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The embedding provider failed or timed out.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The chunk store backend failed.
    #[error("Store error: {0}")]
    Store(String),

    /// A referenced resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller supplied an invalid request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unclassified internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
