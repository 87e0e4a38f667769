//! Offline index builder.
//!
//! Single-threaded batch job: read every text document in a directory,
//! chunk, batch-embed, bulk-insert into a fresh index, then persist index
//! and chunk store. Nothing is written until the full build succeeds, and
//! both files land via temp-file + rename, so a failed build leaves the
//! previous corpus untouched.

use crate::chunker;
use crate::embedding::Embedder;
use crate::errors::{RagError, Result};
use crate::index::{ChunkStore, VectorIndex};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Document extensions handed to the chunker as plain text. PDF and other
/// formats are extracted by external collaborators before ingestion.
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Summary of a completed build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub documents: usize,
    pub chunks: usize,
    pub dimension: Option<usize>,
}

/// Composes chunker, embedder, vector index, and chunk store into a
/// persisted corpus
pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    chunk_size: usize,
    chunk_overlap: usize,
    show_progress: bool,
}

impl IndexBuilder {
    /// Create a builder with the given chunking policy
    pub fn new(embedder: Arc<dyn Embedder>, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            embedder,
            chunk_size,
            chunk_overlap,
            show_progress: false,
        }
    }

    /// Enable a terminal progress bar during ingestion
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Build an in-memory corpus from all text documents under `docs_dir`.
    ///
    /// Chunks are embedded one batch per document and bulk-inserted in
    /// document order, so ids stay deterministic across rebuilds.
    pub async fn build(&self, docs_dir: &Path) -> Result<(VectorIndex, ChunkStore)> {
        let documents = read_documents(docs_dir)?;

        let mut index = VectorIndex::new();
        let mut store = ChunkStore::new();

        let bar = self.progress_bar(documents.len() as u64);
        for (source_id, text) in &documents {
            let mut texts = Vec::new();
            for piece in chunker::chunk(text, self.chunk_size, self.chunk_overlap)? {
                let trimmed = piece.text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                store.push(trimmed.to_string(), source_id.clone(), piece.offset);
                texts.push(trimmed.to_string());
            }

            if !texts.is_empty() {
                let vectors = self.embedder.embed_batch(&texts).await?;
                index.add(&vectors)?;
            }
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }

        debug_assert_eq!(index.len(), store.len());

        Ok((index, store))
    }

    /// Build and persist the corpus, returning per-build stats
    pub async fn build_to(
        &self,
        docs_dir: &Path,
        index_path: &Path,
        chunks_path: &Path,
    ) -> Result<BuildStats> {
        let (index, store) = self.build(docs_dir).await?;

        index.save(index_path)?;
        store.save(chunks_path)?;

        let mut sources: Vec<&str> = store.iter().map(|c| c.source_id.as_str()).collect();
        sources.dedup();

        Ok(BuildStats {
            documents: sources.len(),
            chunks: store.len(),
            dimension: index.dimension(),
        })
    }

    fn progress_bar(&self, total: u64) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("Embedding documents");
        Some(bar)
    }
}

/// Read all recognized text documents from a directory, sorted by filename
/// so chunk ids are deterministic across rebuilds.
fn read_documents(docs_dir: &Path) -> Result<Vec<(String, String)>> {
    if !docs_dir.is_dir() {
        return Err(RagError::Config(format!(
            "document directory not found: {}",
            docs_dir.display()
        )));
    }

    let mut paths: Vec<_> = fs::read_dir(docs_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| TEXT_EXTENSIONS.contains(&ext))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let source_id = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let text = fs::read_to_string(&path)?;
        documents.push((source_id, text));
    }

    Ok(documents)
}
