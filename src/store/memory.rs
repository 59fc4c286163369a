//! In-memory chunk store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::store::ChunkStore;
use crate::types::{ChunkRecord, MetadataMap, Result, ScoredChunk, StoredChunk};

/// Process-local chunk store using cosine similarity.
///
/// Data is not persisted and is lost when the process exits. Implements the
/// reference exact-containment semantics for metadata filters.
pub struct InMemoryChunkStore {
    chunks: Arc<RwLock<HashMap<String, StoredRecord>>>,
}

struct StoredRecord {
    chunk: StoredChunk,
    embedding: Vec<f32>,
}

impl InMemoryChunkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Every key/value pair of `filter` must be present and equal in `metadata`.
    fn matches_filter(metadata: &MetadataMap, filter: &MetadataMap) -> bool {
        filter
            .iter()
            .all(|(key, value)| metadata.get(key) == Some(value))
    }
}

impl Default for InMemoryChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn store(&self, record: &ChunkRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let stored = StoredRecord {
            chunk: StoredChunk {
                id: id.clone(),
                document_id: record.document_id.clone(),
                chunk_index: record.chunk_index,
                content: record.content.clone(),
                metadata: record.metadata.clone(),
            },
            embedding: record.embedding.clone(),
        };

        self.chunks.write().insert(id.clone(), stored);
        Ok(id)
    }

    async fn similarity_search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
        filter: Option<MetadataMap>,
    ) -> Result<Vec<ScoredChunk>> {
        let chunks = self.chunks.read();

        let mut results: Vec<ScoredChunk> = chunks
            .values()
            .filter(|record| {
                filter
                    .as_ref()
                    .map(|f| Self::matches_filter(&record.chunk.metadata, f))
                    .unwrap_or(true)
            })
            .filter_map(|record| {
                let score = Self::cosine_similarity(embedding, &record.embedding);
                if score >= threshold {
                    Some(ScoredChunk {
                        chunk: record.chunk.clone(),
                        score,
                    })
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn metadata_filter(
        &self,
        filter: &MetadataMap,
        limit: usize,
    ) -> Result<Vec<StoredChunk>> {
        let chunks = self.chunks.read();

        let mut results: Vec<StoredChunk> = chunks
            .values()
            .filter(|record| Self::matches_filter(&record.chunk.metadata, filter))
            .map(|record| record.chunk.clone())
            .collect();

        // Stable output order for callers and tests.
        results.sort_by(|a, b| {
            (a.document_id.as_str(), a.chunk_index).cmp(&(b.document_id.as_str(), b.chunk_index))
        });
        results.truncate(limit);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn record(document_id: &str, index: usize, content: &str, embedding: Vec<f32>) -> ChunkRecord {
        let mut metadata = MetadataMap::new();
        metadata.insert("chunk_index".into(), json!(index));
        metadata.insert("source".into(), json!(document_id));

        ChunkRecord {
            document_id: document_id.to_string(),
            chunk_index: index,
            content: content.to_string(),
            embedding,
            chunk_size: 200,
            chunk_overlap: 50,
            metadata,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn store_assigns_unique_ids() {
        let store = InMemoryChunkStore::new();

        let id1 = store
            .store(&record("doc", 0, "hello", vec![1.0, 0.0]))
            .await
            .unwrap();
        let id2 = store
            .store(&record("doc", 1, "world", vec![0.0, 1.0]))
            .await
            .unwrap();

        assert_ne!(id1, id2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn search_ranks_by_similarity() {
        let store = InMemoryChunkStore::new();
        store
            .store(&record("a", 0, "exact", vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();
        store
            .store(&record("b", 0, "orthogonal", vec![0.0, 1.0, 0.0]))
            .await
            .unwrap();
        store
            .store(&record("c", 0, "close", vec![0.9, 0.1, 0.0]))
            .await
            .unwrap();

        let results = store
            .similarity_search(&[1.0, 0.0, 0.0], 10, 0.5, None)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "exact");
        assert_eq!(results[1].chunk.content, "close");
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let store = InMemoryChunkStore::new();
        for i in 0..5 {
            store
                .store(&record("doc", i, "chunk", vec![1.0, 0.0]))
                .await
                .unwrap();
        }

        let results = store
            .similarity_search(&[1.0, 0.0], 2, 0.0, None)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn search_applies_metadata_constraint() {
        let store = InMemoryChunkStore::new();
        store
            .store(&record("kept", 0, "kept", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .store(&record("dropped", 0, "dropped", vec![1.0, 0.0]))
            .await
            .unwrap();

        let mut filter = MetadataMap::new();
        filter.insert("source".into(), json!("kept"));

        let results = store
            .similarity_search(&[1.0, 0.0], 10, 0.0, Some(filter))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.document_id, "kept");
    }

    #[tokio::test]
    async fn filter_requires_full_containment() {
        let store = InMemoryChunkStore::new();
        store
            .store(&record("doc1", 0, "first", vec![1.0]))
            .await
            .unwrap();
        store
            .store(&record("doc1", 1, "second", vec![1.0]))
            .await
            .unwrap();
        store
            .store(&record("doc2", 0, "other", vec![1.0]))
            .await
            .unwrap();

        let mut filter = MetadataMap::new();
        filter.insert("source".into(), json!("doc1"));
        filter.insert("chunk_index".into(), json!(1));

        let results = store.metadata_filter(&filter, 10).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "second");
    }

    #[tokio::test]
    async fn filter_on_missing_key_matches_nothing() {
        let store = InMemoryChunkStore::new();
        store
            .store(&record("doc", 0, "chunk", vec![1.0]))
            .await
            .unwrap();

        let mut filter = MetadataMap::new();
        filter.insert("nonexistent".into(), json!("value"));

        let results = store.metadata_filter(&filter, 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_filter_matches_everything() {
        let store = InMemoryChunkStore::new();
        store
            .store(&record("doc", 0, "a", vec![1.0]))
            .await
            .unwrap();
        store
            .store(&record("doc", 1, "b", vec![1.0]))
            .await
            .unwrap();

        let results = store.metadata_filter(&MetadataMap::new(), 10).await.unwrap();
        assert_eq!(results.len(), 2);
        // Stable ordering by (document_id, chunk_index).
        assert_eq!(results[0].content, "a");
        assert_eq!(results[1].content, "b");
    }

    #[test]
    fn cosine_similarity_reference_values() {
        // Identical vectors
        assert!(
            (InMemoryChunkStore::cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 0.001
        );

        // Orthogonal vectors
        assert!(InMemoryChunkStore::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 0.001);

        // Opposite vectors
        assert!(
            (InMemoryChunkStore::cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 0.001
        );

        // Mismatched lengths score zero
        assert_eq!(InMemoryChunkStore::cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
