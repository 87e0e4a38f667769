//! Sliding-window document chunker.
//!
//! Splits raw text into fixed-size overlapping passages, counted in
//! characters. No sentence or paragraph awareness; the window slides by
//! `size - overlap` until its start passes the end of the text.

use crate::errors::{RagError, Result};

/// A chunk of source text together with its character offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkText {
    pub text: String,
    /// Character offset of the chunk start within the source document
    pub offset: usize,
}

/// Split `text` into windows of `size` characters overlapping by `overlap`.
///
/// Text shorter than `size` yields exactly one chunk; empty text yields
/// none. `overlap` must be strictly less than `size`.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<ChunkText>> {
    if size == 0 {
        return Err(RagError::Config("chunk size must be positive".to_string()));
    }
    if overlap >= size {
        return Err(RagError::Config(format!(
            "chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }

    let step = size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(ChunkText {
            text: chars[start..end].iter().collect(),
            offset: start,
        });
        start += step;
    }

    Ok(chunks)
}
