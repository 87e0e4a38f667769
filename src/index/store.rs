//! Chunk store: the sidecar mapping from vector-index ids to chunk text.
//!
//! Records are positional; chunk `i` holds the text behind vector id `i`.
//! Persisted as a JSON array next to the binary index file.

use crate::errors::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// An indexed passage of source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Dense id, equal to the chunk's position in the vector index
    pub id: usize,
    pub text: String,
    /// Originating document (filename)
    pub source_id: String,
    /// Character offset of the chunk within its source document
    pub offset: usize,
}

/// Ordered collection of chunks aligned with vector-index ids
#[derive(Debug, Clone, Default)]
pub struct ChunkStore {
    chunks: Vec<Chunk>,
}

impl ChunkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk, assigning the next dense id. Returns the id.
    pub fn push(&mut self, text: String, source_id: String, offset: usize) -> usize {
        let id = self.chunks.len();
        self.chunks.push(Chunk {
            id,
            text,
            source_id,
            offset,
        });
        id
    }

    /// Get a chunk by id
    pub fn get(&self, id: usize) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if no chunks are stored
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate over all chunks in id order
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Persist the store atomically (write temp file, rename on success)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        {
            let writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(writer, &self.chunks)?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// Load a persisted store
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RagError::MissingIndex {
                path: path.to_path_buf(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let chunks: Vec<Chunk> = serde_json::from_reader(reader)?;

        // Ids must be dense and positional or the index alignment is broken.
        for (position, chunk) in chunks.iter().enumerate() {
            if chunk.id != position {
                return Err(RagError::CorruptIndex {
                    path: path.to_path_buf(),
                    reason: format!("chunk id {} at position {}", chunk.id, position),
                });
            }
        }

        Ok(Self { chunks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_push_assigns_dense_ids() {
        let mut store = ChunkStore::new();
        let a = store.push("first".to_string(), "doc.txt".to_string(), 0);
        let b = store.push("second".to_string(), "doc.txt".to_string(), 450);
        assert_eq!((a, b), (0, 1));
        assert_eq!(store.get(1).unwrap().text, "second");
        assert_eq!(store.get(1).unwrap().offset, 450);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("chunks.json");

        let mut store = ChunkStore::new();
        store.push("Paracetamol dose is 500mg".to_string(), "bnf.txt".to_string(), 0);
        store.push("Ibuprofen dose is 400mg".to_string(), "bnf.txt".to_string(), 450);
        store.save(&path).unwrap();

        let loaded = ChunkStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(0).unwrap().text, "Paracetamol dose is 500mg");
        assert_eq!(loaded.get(1).unwrap().source_id, "bnf.txt");
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ChunkStore::load(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RagError::MissingIndex { .. }));
    }

    #[test]
    fn test_load_rejects_misaligned_ids() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("chunks.json");
        fs::write(
            &path,
            r#"[{"id": 5, "text": "x", "source_id": "a.txt", "offset": 0}]"#,
        )
        .unwrap();
        let err = ChunkStore::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex { .. }));
    }
}
