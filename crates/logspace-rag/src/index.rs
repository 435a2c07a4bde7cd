// Vector index
// Flat inner-product index over L2-normalized rows, i.e. cosine similarity.
// Built per request and dropped with it.

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Cannot build an index from zero vectors")]
    Empty,

    #[error("Vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("k must be a positive integer")]
    InvalidK,
}

pub struct VectorIndex {
    dim: usize,
    // row-major, every row unit length (or all zeros)
    data: Vec<f32>,
}

impl VectorIndex {
    /// Build an index over `vectors`. Every row must have the same, non-zero dimension.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self, IndexError> {
        let first = vectors.first().ok_or(IndexError::Empty)?;
        let dim = first.len();
        if dim == 0 {
            return Err(IndexError::Empty);
        }

        let mut data = Vec::with_capacity(dim * vectors.len());
        for vector in vectors {
            if vector.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    expected: dim,
                    found: vector.len(),
                });
            }
            let start = data.len();
            data.extend_from_slice(vector);
            normalize(&mut data[start..]);
        }

        Ok(Self { dim, data })
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Top `k` rows by cosine similarity to `query`, as `(score, position)` pairs.
    ///
    /// Scores are non-increasing; order among exact ties is unspecified.
    /// A `k` larger than the index returns every row.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, usize)>, IndexError> {
        if k == 0 {
            return Err(IndexError::InvalidK);
        }
        if query.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                found: query.len(),
            });
        }

        let mut query = query.to_vec();
        normalize(&mut query);

        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, row)| (dot(row, &query), position))
            .collect();

        let by_score_desc = |a: &(f32, usize), b: &(f32, usize)| -> Ordering { b.0.total_cmp(&a.0) };

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_score_desc);
            scored.truncate(k);
        }
        scored.sort_by(by_score_desc);
        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale to unit length in place; zero vectors are left untouched
fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
