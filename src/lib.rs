//! clinirag - Clinical retrieval core
//!
//! Answers free-text clinical queries from a locally indexed document
//! corpus, escalating to hosted answer services when the local index has
//! nothing relevant.
//!
//! # Architecture
//!
//! - Offline: `index::IndexBuilder` turns a document directory into a
//!   persisted flat vector index plus chunk store.
//! - Online: `retrieval::RetrievalOrchestrator` embeds a query, searches the
//!   index, and walks the fixed fallback chain
//!   (local → primary → secondary → exhausted).

pub mod chunker;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod index;
pub mod remote;
pub mod retrieval;

// Re-export commonly used types
pub use errors::{RagError, Result};
