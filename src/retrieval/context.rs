//! Query-time retrieval context.
//!
//! Owns the loaded corpus (vector index + chunk store) and the embedder
//! handle. The corpus is immutable once loaded; concurrent queries share it
//! through an `Arc` cloned under a read lock, so a rebuild can swap in a
//! fresh corpus under the write lock while in-flight queries keep reading
//! the old one. Remote calls never hold the lock.

use crate::embedding::Embedder;
use crate::errors::{RagError, Result};
use crate::index::{ChunkStore, VectorIndex};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An immutable loaded corpus: index plus positionally aligned chunks
#[derive(Debug)]
pub struct Corpus {
    pub index: VectorIndex,
    pub store: ChunkStore,
}

impl Corpus {
    /// Pair an index with its chunk store, enforcing 1:1 id alignment
    pub fn new(index: VectorIndex, store: ChunkStore) -> Result<Self> {
        if index.len() != store.len() {
            return Err(RagError::CorruptIndex {
                path: PathBuf::new(),
                reason: format!(
                    "index has {} vectors but chunk store has {} chunks",
                    index.len(),
                    store.len()
                ),
            });
        }
        Ok(Self { index, store })
    }

    /// Load both corpus files from disk
    pub fn load(index_path: &Path, chunks_path: &Path) -> Result<Self> {
        let index = VectorIndex::load(index_path)?;
        let store = ChunkStore::load(chunks_path)?;
        Self::new(index, store)
    }
}

/// Shared retrieval state passed to the orchestrator at construction
pub struct RagContext {
    corpus: RwLock<Arc<Corpus>>,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for RagContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagContext")
            .field("corpus", &self.corpus)
            .finish_non_exhaustive()
    }
}

impl RagContext {
    /// Create a context over an already-built corpus
    pub fn new(corpus: Corpus, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            corpus: RwLock::new(Arc::new(corpus)),
            embedder,
        }
    }

    /// Load the corpus files and create a context
    pub fn load(
        index_path: &Path,
        chunks_path: &Path,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        Ok(Self::new(Corpus::load(index_path, chunks_path)?, embedder))
    }

    /// Snapshot the active corpus. The clone is cheap and keeps the corpus
    /// alive for the duration of a query even across a concurrent reload.
    pub async fn corpus(&self) -> Arc<Corpus> {
        self.corpus.read().await.clone()
    }

    /// The embedder used for query vectors
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Replace the active corpus with freshly persisted files. In-flight
    /// queries observe either the old or the new corpus, never a mix.
    pub async fn reload(&self, index_path: &Path, chunks_path: &Path) -> Result<()> {
        let fresh = Arc::new(Corpus::load(index_path, chunks_path)?);
        let mut guard = self.corpus.write().await;
        *guard = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NullEmbedder;

    #[async_trait]
    impl Embedder for NullEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0])
        }
    }

    fn corpus_of(n: usize) -> Corpus {
        let mut index = VectorIndex::new();
        let mut store = ChunkStore::new();
        for i in 0..n {
            index.add(&[vec![i as f32]]).unwrap();
            store.push(format!("chunk {}", i), "doc.txt".to_string(), i * 10);
        }
        Corpus::new(index, store).unwrap()
    }

    #[test]
    fn test_corpus_rejects_misaligned_sizes() {
        let mut index = VectorIndex::new();
        index.add(&[vec![1.0]]).unwrap();
        let store = ChunkStore::new();
        let err = Corpus::new(index, store).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex { .. }));
    }

    #[tokio::test]
    async fn test_reload_swaps_atomically() {
        let temp = tempfile::TempDir::new().unwrap();
        let index_path = temp.path().join("index.bin");
        let chunks_path = temp.path().join("chunks.json");

        let context = RagContext::new(corpus_of(1), Arc::new(NullEmbedder));
        let before = context.corpus().await;
        assert_eq!(before.store.len(), 1);

        let bigger = corpus_of(3);
        bigger.index.save(&index_path).unwrap();
        bigger.store.save(&chunks_path).unwrap();
        context.reload(&index_path, &chunks_path).await.unwrap();

        // The old snapshot is still intact; new snapshots see the swap.
        assert_eq!(before.store.len(), 1);
        assert_eq!(context.corpus().await.store.len(), 3);
    }

    #[tokio::test]
    async fn test_reload_missing_files_keeps_old_corpus() {
        let temp = tempfile::TempDir::new().unwrap();
        let context = RagContext::new(corpus_of(2), Arc::new(NullEmbedder));

        let err = context
            .reload(
                &temp.path().join("absent.bin"),
                &temp.path().join("absent.json"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::MissingIndex { .. }));
        assert_eq!(context.corpus().await.store.len(), 2);
    }
}
