//! Remote answer services: the fallback tiers behind the local index.
//!
//! Both tiers speak the same request shape (`{prompt, max_tokens,
//! temperature}`) but return their generated text at different field paths,
//! so each gets its own typed response schema validated at the boundary.
//! Every failure mode (timeout, non-2xx, malformed body, empty text) is a
//! `RagError::RemoteApi`; the orchestrator treats any error as "advance to
//! the next tier". Retries are deliberately absent at this layer.

pub mod client;

pub use client::{GeminiClient, GroqClient};

use crate::errors::Result;
use async_trait::async_trait;

/// A hosted answer-generation service
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Human-readable service name for provenance reporting
    fn name(&self) -> &str;

    /// Generate an answer for the prompt
    async fn answer(&self, prompt: &str) -> Result<String>;
}
