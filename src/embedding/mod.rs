//! Embedding service boundary.
//!
//! The retrieval core treats text embedding as an external capability with a
//! fixed contract: deterministic vectors of one dimension per model version.
//! Failures are surfaced as `RagError::EmbeddingService` with no retry here;
//! the caller decides whether to fall through to remote answer tiers.

pub mod client;

pub use client::HttpEmbedder;

use crate::errors::Result;
use async_trait::async_trait;

/// Converts text to fixed-dimension float vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}
