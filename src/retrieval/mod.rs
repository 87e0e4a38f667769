//! Online retrieval: loaded corpus context and the fallback orchestrator.

pub mod context;
pub mod orchestrator;

pub use context::{Corpus, RagContext};
pub use orchestrator::{
    Audience, Outcome, RetrievalOrchestrator, ScoredChunk, SearchParams, NO_ANSWER_MESSAGE,
};
