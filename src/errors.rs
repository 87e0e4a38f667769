//! Error types for the clinirag retrieval core.
//!
//! Splits deployment faults (missing or mismatched index files) from
//! per-query faults (embedding or remote service failures) so the
//! orchestrator can recover from the latter and surface the former.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the retrieval core
#[derive(Error, Debug)]
pub enum RagError {
    /// Index or chunk-store file absent on disk
    #[error("Vector store file missing: {path}")]
    MissingIndex { path: PathBuf },

    /// Query embedder dimension differs from the persisted index dimension
    #[error("Embedding dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding service call failed
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    /// Remote answer service failed (non-fatal, advances the fallback chain)
    #[error("Remote API error from {service}: {reason}")]
    RemoteApi { service: String, reason: String },

    /// Corrupt or unreadable persisted index
    #[error("Invalid index file {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for retrieval operations
pub type Result<T> = std::result::Result<T, RagError>;

impl RagError {
    /// True for errors that indicate a misconfigured deployment rather than
    /// a query-specific condition; only these may escape the query path.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RagError::MissingIndex { .. }
                | RagError::DimensionMismatch { .. }
                | RagError::CorruptIndex { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = RagError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }

    #[test]
    fn test_missing_index_display() {
        let err = RagError::MissingIndex {
            path: PathBuf::from("/tmp/store/index.bin"),
        };
        assert!(err.to_string().contains("index.bin"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(RagError::MissingIndex {
            path: PathBuf::from("x")
        }
        .is_fatal());
        assert!(RagError::DimensionMismatch {
            expected: 1,
            actual: 2
        }
        .is_fatal());
        assert!(!RagError::EmbeddingService("down".to_string()).is_fatal());
        assert!(!RagError::RemoteApi {
            service: "primary".to_string(),
            reason: "timeout".to_string()
        }
        .is_fatal());
    }
}
