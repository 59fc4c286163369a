//! Embedding provider abstraction.
//!
//! The pipeline never computes embeddings itself; it hands chunk text to an
//! [`EmbeddingProvider`] and receives a fixed-length vector back. The crate
//! makes no assumption about vector dimensionality — that is a property of the
//! provider and the downstream chunk store.

mod http;

pub use http::{HttpEmbedder, HttpEmbedderConfig};

use async_trait::async_trait;

use crate::types::Result;

/// Converts text into a fixed-length numeric vector.
///
/// Implementations must be safe to share across tasks. Failures (including
/// timeouts after a bounded duration) surface as
/// [`AppError::Embedding`](crate::types::AppError::Embedding).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving input order.
    ///
    /// The default implementation embeds sequentially; providers with a
    /// batch-capable API should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}
