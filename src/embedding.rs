//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that maps text to a dense, fixed-dimension vector.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. Providers must be deterministic for identical text under a
/// fixed model version, and are expected to return L2-normalized vectors so
/// that cosine distance stays in `[0, 2]` and `1 - distance` is a usable
/// similarity.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends with native
/// batching should override it, since batched calls are how the ingestion
/// pipeline amortizes embedding latency across segments.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
