//! Flat vector index with squared-L2 nearest-neighbor search.
//!
//! Vectors are stored in one contiguous buffer; search is an exhaustive
//! scan. The dimension is fixed by the first `add` call and enforced for
//! every later insert and query. Persistence is a little-endian binary file:
//! magic, format version, vector count, dimension, then raw f32 data.

use crate::errors::{RagError, Result};
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 4] = b"VIDX";
const FORMAT_VERSION: u32 = 1;

/// Flat L2 vector index with dense integer ids
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    /// Row-major vector data, `len = count * dim`
    data: Vec<f32>,
    /// Dimension, fixed by the first insert; `None` while empty
    dim: Option<usize>,
}

impl VectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vectors in the index
    pub fn len(&self) -> usize {
        match self.dim {
            Some(dim) => self.data.len() / dim,
            None => 0,
        }
    }

    /// True if the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimension of the stored vectors, if any have been added
    pub fn dimension(&self) -> Option<usize> {
        self.dim
    }

    /// Add vectors, returning their assigned ids (dense, in call order).
    ///
    /// The first insert fixes the index dimension; vectors of any other
    /// dimension are rejected.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<Vec<usize>> {
        let mut ids = Vec::with_capacity(vectors.len());

        for vector in vectors {
            let dim = match self.dim {
                Some(dim) => dim,
                None => {
                    if vector.is_empty() {
                        return Err(RagError::Config(
                            "cannot index a zero-dimension vector".to_string(),
                        ));
                    }
                    self.dim = Some(vector.len());
                    vector.len()
                }
            };

            if vector.len() != dim {
                return Err(RagError::DimensionMismatch {
                    expected: dim,
                    actual: vector.len(),
                });
            }

            ids.push(self.len());
            self.data.extend_from_slice(vector);
        }

        Ok(ids)
    }

    /// Return up to `k` nearest vectors as `(id, squared L2 distance)`,
    /// ascending by distance with ties in ascending id order.
    ///
    /// An empty index returns an empty result, never an error. A query whose
    /// dimension differs from the index dimension is rejected before any
    /// scan.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        let dim = match self.dim {
            Some(dim) => dim,
            None => return Ok(Vec::new()),
        };

        if query.len() != dim {
            return Err(RagError::DimensionMismatch {
                expected: dim,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(dim)
            .enumerate()
            .map(|(id, row)| (id, squared_l2(query, row)))
            .collect();

        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        Ok(scored)
    }

    /// Persist the index atomically (write temp file, rename on success)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("bin.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            writer.write_all(MAGIC)?;
            writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
            writer.write_all(&(self.len() as u64).to_le_bytes())?;
            writer.write_all(&(self.dim.unwrap_or(0) as u32).to_le_bytes())?;
            for value in &self.data {
                writer.write_all(&value.to_le_bytes())?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// Load a persisted index
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RagError::MissingIndex {
                path: path.to_path_buf(),
            });
        }

        let corrupt = |reason: &str| RagError::CorruptIndex {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let mut reader = BufReader::new(File::open(path)?);

        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|_| corrupt("truncated header"))?;
        if &magic != MAGIC {
            return Err(corrupt("bad magic bytes"));
        }

        let version = read_u32(&mut reader).map_err(|_| corrupt("truncated header"))?;
        if version != FORMAT_VERSION {
            return Err(corrupt(&format!("unsupported format version {}", version)));
        }

        let count = read_u64(&mut reader).map_err(|_| corrupt("truncated header"))? as usize;
        let dim = read_u32(&mut reader).map_err(|_| corrupt("truncated header"))? as usize;

        if count > 0 && dim == 0 {
            return Err(corrupt("non-empty index with zero dimension"));
        }

        let mut data = vec![0f32; count * dim];
        let mut buf = [0u8; 4];
        for value in data.iter_mut() {
            reader
                .read_exact(&mut buf)
                .map_err(|_| corrupt("truncated vector data"))?;
            *value = f32::from_le_bytes(buf);
        }

        Ok(Self {
            data,
            dim: if count > 0 { Some(dim) } else { None },
        })
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn read_u32(reader: &mut impl Read) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64(reader: &mut impl Read) -> std::io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_index() -> VectorIndex {
        let mut index = VectorIndex::new();
        index
            .add(&[
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![0.0, 3.0],
                vec![1.0, 0.0],
            ])
            .unwrap();
        index
    }

    #[test]
    fn test_add_assigns_dense_ids() {
        let mut index = VectorIndex::new();
        let ids = index.add(&[vec![1.0], vec![2.0]]).unwrap();
        assert_eq!(ids, vec![0, 1]);
        let more = index.add(&[vec![3.0]]).unwrap();
        assert_eq!(more, vec![2]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), Some(1));
    }

    #[test]
    fn test_add_rejects_mixed_dimensions() {
        let mut index = VectorIndex::new();
        index.add(&[vec![1.0, 2.0]]).unwrap();
        let err = index.add(&[vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = sample_index();
        let results = index.search(&[0.0, 0.0], 4).unwrap();
        let ids: Vec<usize> = results.iter().map(|r| r.0).collect();
        // id 0 at distance 0, ids 1 and 3 tie at 1.0 (insertion order), id 2 at 9.0
        assert_eq!(ids, vec![0, 1, 3, 2]);
        assert_eq!(results[0].1, 0.0);
        assert_eq!(results[1].1, 1.0);
        assert_eq!(results[3].1, 9.0);
    }

    #[test]
    fn test_search_results_non_decreasing() {
        let index = sample_index();
        let results = index.search(&[0.5, 0.5], 4).unwrap();
        assert!(results.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_search_fewer_entries_than_k() {
        let index = sample_index();
        let results = index.search(&[0.0, 0.0], 100).unwrap();
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = VectorIndex::new();
        let results = index.search(&[1.0, 2.0, 3.0], 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_rejects_dimension_mismatch() {
        let index = sample_index();
        let err = index.search(&[1.0, 2.0, 3.0], 5).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.bin");

        let index = sample_index();
        index.save(&path).unwrap();
        let loaded = VectorIndex::load(&path).unwrap();

        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.dimension(), index.dimension());
        let query = [0.3, 0.7];
        assert_eq!(
            index.search(&query, 4).unwrap(),
            loaded.search(&query, 4).unwrap()
        );
    }

    #[test]
    fn test_save_load_empty_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.bin");

        VectorIndex::new().save(&path).unwrap();
        let loaded = VectorIndex::load(&path).unwrap();
        assert!(loaded.is_empty());
        assert!(loaded.dimension().is_none());
        assert!(loaded.search(&[1.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = VectorIndex::load(&temp.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, RagError::MissingIndex { .. }));
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.bin");
        fs::write(&path, b"NOPE0000000000000000").unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex { .. }));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.bin");
        sample_index().save(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("bin.tmp").exists());
    }
}
