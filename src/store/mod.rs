//! Chunk store abstraction.
//!
//! Persistence, vector indexing and similarity computation all live in an
//! external backend reached through the [`ChunkStore`] trait. Two
//! implementations ship with the crate:
//!
//! - [`HttpChunkStore`] — thin REST delegate for the production backend.
//! - [`InMemoryChunkStore`] — process-local store for tests and development.
//!
//! # Metadata filtering
//!
//! Both query operations accept a metadata constraint with exact-containment
//! semantics: a record matches when every key/value pair of the constraint is
//! present and equal in the record's metadata. The constraint map is passed to
//! the backend unchanged; providing containment matching is a capability the
//! backend must supply. [`InMemoryChunkStore`] implements the reference
//! behavior.

mod http;
mod memory;

pub use http::{HttpChunkStore, HttpChunkStoreConfig};
pub use memory::InMemoryChunkStore;

use async_trait::async_trait;

use crate::types::{ChunkRecord, MetadataMap, Result, ScoredChunk, StoredChunk};

/// Persists chunk records and answers similarity and metadata queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persist one record. Returns the identifier assigned by the store.
    async fn store(&self, record: &ChunkRecord) -> Result<String>;

    /// Persist a batch of records, returning assigned ids in input order.
    ///
    /// The default implementation stores sequentially; backends with a batch
    /// endpoint should override it.
    async fn store_batch(&self, records: &[ChunkRecord]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(self.store(record).await?);
        }
        Ok(ids)
    }

    /// Find the chunks most similar to `embedding`.
    ///
    /// Results are sorted by score descending, truncated to `limit`, and
    /// exclude anything scoring below `threshold`. An optional metadata
    /// constraint restricts candidates before ranking.
    async fn similarity_search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
        filter: Option<MetadataMap>,
    ) -> Result<Vec<ScoredChunk>>;

    /// Return up to `limit` chunks whose metadata contains every key/value
    /// pair of `filter`.
    async fn metadata_filter(&self, filter: &MetadataMap, limit: usize)
        -> Result<Vec<StoredChunk>>;
}
