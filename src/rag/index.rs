//! Vector Index - exact inner-product search over unit vectors
//!
//! Every row is L2-normalized on the way in, so inner product equals cosine
//! similarity. Search is brute force: each query is compared against every
//! stored vector. Per-session document sets are tens to low thousands of
//! chunks, so exhaustive search costs little and loses no recall.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::distance::l2_normalize_rows;
use crate::embeddings::Embedder;
use crate::error::{Result, RetrievalError};

/// One ranked match: chunk position and inner-product score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub position: usize,
    pub score: f32,
}

/// Exact cosine index over one document batch.
///
/// Row `i` is the normalized embedding of chunk `i`. Immutable once built;
/// a new batch means a new index.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    vectors: Array2<f32>,
}

impl FlatIndex {
    /// Index holding no vectors
    pub fn empty(dimensions: usize) -> Self {
        Self {
            vectors: Array2::zeros((0, dimensions)),
        }
    }

    /// Take ownership of an embedding matrix, normalizing each row
    pub fn from_embeddings(mut embeddings: Array2<f32>) -> Self {
        l2_normalize_rows(&mut embeddings);
        Self {
            vectors: embeddings.as_standard_layout().into_owned(),
        }
    }

    /// Embed all chunks in one batched call and index them.
    ///
    /// Returns the index together with a copy of the normalized embedding
    /// matrix for callers that need the vectors directly.
    pub fn build(embedder: &dyn Embedder, chunks: &[String]) -> Result<(Self, Array2<f32>)> {
        let dimensions = embedder.dimensions();
        if chunks.is_empty() {
            return Ok((Self::empty(dimensions), Array2::zeros((0, dimensions))));
        }

        let embeddings = embedder.embed(chunks)?;
        if embeddings.nrows() != chunks.len() {
            return Err(RetrievalError::RowCountMismatch {
                expected: chunks.len(),
                got: embeddings.nrows(),
            });
        }
        if embeddings.ncols() != dimensions {
            return Err(RetrievalError::DimensionMismatch {
                expected: dimensions,
                got: embeddings.ncols(),
            });
        }

        let index = Self::from_embeddings(embeddings);
        let normalized = index.vectors.clone();
        Ok((index, normalized))
    }

    /// Top-`k` positions by descending inner product.
    ///
    /// Returns fewer than `k` hits when the index is smaller than `k`. Equal
    /// scores are ordered by ascending position.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Err(RetrievalError::InvalidTopK(k));
        }
        if query.len() != self.dimensions() {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimensions(),
                got: query.len(),
            });
        }
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.vectors.dot(&ArrayView1::from(query));

        let mut hits: Vec<SearchHit> = scores
            .iter()
            .enumerate()
            .map(|(position, &score)| SearchHit { position, score })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        hits.truncate(k);

        Ok(hits)
    }

    /// Number of vectors in the index
    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    /// Check if index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector length shared by every row
    pub fn dimensions(&self) -> usize {
        self.vectors.ncols()
    }

    /// Normalized vector stored for a position
    pub fn vector(&self, position: usize) -> Option<ArrayView1<'_, f32>> {
        (position < self.len()).then(|| self.vectors.row(position))
    }

    /// All stored vectors, one row per chunk
    pub fn vectors(&self) -> ArrayView2<'_, f32> {
        self.vectors.view()
    }
}

// ============================================================================
// Tests
// ============================================================================
