//! Corpus index: flat vector index, chunk store, and the offline builder.
//!
//! Ids are dense integers assigned in insertion order; id `i` in the vector
//! index corresponds exactly to chunk `i` in the chunk store. Both files are
//! rebuilt wholesale when source documents change, never patched in place.

pub mod builder;
pub mod store;
pub mod vector;

pub use builder::{BuildStats, IndexBuilder};
pub use store::{Chunk, ChunkStore};
pub use vector::VectorIndex;
