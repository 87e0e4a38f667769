//! Fallback orchestrator: Local → Primary → Secondary → Exhausted.
//!
//! One query per invocation. Local search hits on any non-empty result set;
//! a miss walks the remote tiers in fixed order and the first usable answer
//! wins. Embedding failures fall through to the remote tiers; only missing
//! or mismatched index files escape to the caller. Every query terminates
//! in an explicit `Outcome`, never an unhandled error.

use crate::errors::{RagError, Result};
use crate::index::Chunk;
use crate::remote::AnswerService;
use crate::retrieval::context::RagContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Terminal message when no local or remote source produced an answer
pub const NO_ANSWER_MESSAGE: &str =
    "No answer found locally or online. Please consult a healthcare professional.";

const PATIENT_PROMPT: &str = "You are a clinical assistant. Answer the question in simple, \
clear language for a patient. Include key info, treatment, warnings, and common side effects. \
Keep it short and professional.";

const PROFESSIONAL_PROMPT: &str = "You are a clinical assistant. Answer the question in \
professional clinical language for healthcare professionals. Include diagnosis, treatment \
options, mechanism, warnings, and references. Keep it concise and targeted.";

/// Who the answer is written for; controls remote prompt framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Audience {
    #[default]
    Patient,
    Professional,
}

impl Audience {
    fn system_prompt(&self) -> &'static str {
        match self {
            Audience::Patient => PATIENT_PROMPT,
            Audience::Professional => PROFESSIONAL_PROMPT,
        }
    }
}

/// A retrieved chunk with its squared L2 distance from the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Terminal result of one pass through the fallback chain
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The local index produced ranked chunks
    LocalHit(Vec<ScoredChunk>),
    /// A remote tier produced an answer
    RemoteHit { answer: String, source: String },
    /// No local or remote source answered
    Exhausted,
}

impl Outcome {
    /// The user-facing answer text
    pub fn answer_text(&self) -> String {
        match self {
            Outcome::LocalHit(chunks) => chunks
                .iter()
                .map(|s| format!("• {}", s.chunk.text))
                .collect::<Vec<_>>()
                .join("\n\n"),
            Outcome::RemoteHit { answer, .. } => answer.clone(),
            Outcome::Exhausted => NO_ANSWER_MESSAGE.to_string(),
        }
    }

    /// Which tier answered, for provenance reporting
    pub fn source(&self) -> &str {
        match self {
            Outcome::LocalHit(_) => "local",
            Outcome::RemoteHit { source, .. } => source,
            Outcome::Exhausted => "none",
        }
    }
}

/// Search knobs for the local tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of chunks returned by a local search
    pub top_k: usize,
    /// Optional squared-L2 cutoff applied before the hit/miss decision.
    /// `None` keeps the original behavior: any result is a hit.
    pub distance_threshold: Option<f32>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            distance_threshold: None,
        }
    }
}

/// Walks the fixed fallback chain for each query
pub struct RetrievalOrchestrator {
    context: Arc<RagContext>,
    primary: Option<Box<dyn AnswerService>>,
    secondary: Option<Box<dyn AnswerService>>,
    params: SearchParams,
}

impl RetrievalOrchestrator {
    /// Create an orchestrator over a loaded context with no remote tiers
    pub fn new(context: Arc<RagContext>) -> Self {
        Self {
            context,
            primary: None,
            secondary: None,
            params: SearchParams::default(),
        }
    }

    /// Set the first remote tier
    pub fn with_primary(mut self, service: Box<dyn AnswerService>) -> Self {
        self.primary = Some(service);
        self
    }

    /// Set the second remote tier
    pub fn with_secondary(mut self, service: Box<dyn AnswerService>) -> Self {
        self.secondary = Some(service);
        self
    }

    /// Set local search parameters
    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    /// Answer one query: local search first, then the remote tiers in order.
    ///
    /// Only deployment faults (`MissingIndex`, `DimensionMismatch`,
    /// `CorruptIndex`) are returned as errors; every query-specific failure
    /// resolves to an `Outcome`.
    pub async fn answer(&self, query: &str, audience: Audience) -> Result<Outcome> {
        match self.local_search(query).await {
            Ok(chunks) if !chunks.is_empty() => return Ok(Outcome::LocalHit(chunks)),
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            // Embedding/service failures abort the local step only.
            Err(_) => {}
        }

        let prompt = format!("{}\nQuestion: {}", audience.system_prompt(), query);

        for tier in [&self.primary, &self.secondary] {
            if let Some(service) = tier {
                match service.answer(&prompt).await {
                    Ok(answer) => {
                        return Ok(Outcome::RemoteHit {
                            answer,
                            source: service.name().to_string(),
                        })
                    }
                    // Any tier failure advances the chain.
                    Err(_) => continue,
                }
            }
        }

        Ok(Outcome::Exhausted)
    }

    /// Embed the query and search the local index
    async fn local_search(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let query_vector = self.context.embedder().embed(query).await?;
        let corpus = self.context.corpus().await;

        let hits = corpus.index.search(&query_vector, self.params.top_k)?;

        let mut chunks = Vec::with_capacity(hits.len());
        for (id, distance) in hits {
            if let Some(threshold) = self.params.distance_threshold {
                if distance > threshold {
                    continue;
                }
            }
            let chunk = corpus.store.get(id).ok_or_else(|| RagError::CorruptIndex {
                path: std::path::PathBuf::new(),
                reason: format!("vector id {} has no chunk record", id),
            })?;
            chunks.push(ScoredChunk {
                chunk: chunk.clone(),
                distance,
            });
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(text: &str, distance: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                id: 0,
                text: text.to_string(),
                source_id: "doc.txt".to_string(),
                offset: 0,
            },
            distance,
        }
    }

    #[test]
    fn test_local_hit_answer_joins_ranked_chunks() {
        let outcome = Outcome::LocalHit(vec![scored("first", 0.1), scored("second", 0.4)]);
        let text = outcome.answer_text();
        assert!(text.starts_with("• first"));
        assert!(text.contains("• second"));
        assert_eq!(outcome.source(), "local");
    }

    #[test]
    fn test_exhausted_answer_is_safety_message() {
        let outcome = Outcome::Exhausted;
        assert_eq!(outcome.answer_text(), NO_ANSWER_MESSAGE);
        assert_eq!(outcome.source(), "none");
    }

    #[test]
    fn test_remote_hit_reports_source() {
        let outcome = Outcome::RemoteHit {
            answer: "500mg".to_string(),
            source: "gemini".to_string(),
        };
        assert_eq!(outcome.answer_text(), "500mg");
        assert_eq!(outcome.source(), "gemini");
    }

    #[test]
    fn test_audience_prompts_differ() {
        assert_ne!(
            Audience::Patient.system_prompt(),
            Audience::Professional.system_prompt()
        );
        assert_eq!(Audience::default(), Audience::Patient);
    }
}
