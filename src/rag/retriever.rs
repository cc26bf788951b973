//! Retriever - query embedding, exact search and per-query score scaling
//!
//! ```text
//! query → Embedder → L2 normalize → FlatIndex::search(top_k)
//!       → resolve chunk text → divide by the best score in this result set
//! ```

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::distance::l2_normalize;
use super::index::FlatIndex;
use crate::embeddings::Embedder;
use crate::error::{Result, RetrievalError};

/// Default number of passages per query
pub const DEFAULT_TOP_K: usize = 5;

/// A chunk returned for a query, in rank order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Chunk text, unchanged from build time
    pub text: String,
    /// 0-based position of the chunk in its batch
    pub position: usize,
    /// Cosine similarity to the query
    pub score: f32,
    /// `score` divided by the best score of this result set
    pub normalized_score: f32,
}

/// Resolves queries against a built index using the shared embedder.
///
/// Holds the same embedder handle that built the index; mixing embedders
/// surfaces as a dimension mismatch at search time.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Embed a query and scale it to unit length
    pub fn embed_query(&self, query: &str) -> Result<Array1<f32>> {
        let mut vector = self.embedder.embed_one(query)?;
        l2_normalize(vector.view_mut());
        Ok(vector)
    }

    /// Top-`top_k` passages for `query`, best first.
    ///
    /// `index` and `chunks` must come from the same build. An empty index
    /// yields an empty result without touching the embedder.
    pub fn retrieve(
        &self,
        query: &str,
        index: &FlatIndex,
        chunks: &[String],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>> {
        if top_k == 0 {
            return Err(RetrievalError::InvalidTopK(top_k));
        }
        if index.len() != chunks.len() {
            return Err(RetrievalError::IndexMismatch {
                index_len: index.len(),
                chunks_len: chunks.len(),
            });
        }
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embed_query(query)?;
        let hits = index.search(&query_vector.to_vec(), top_k)?;

        let mut passages: Vec<RetrievedPassage> = hits
            .into_iter()
            .filter_map(|hit| {
                let text = chunks.get(hit.position)?;
                Some(RetrievedPassage {
                    text: text.clone(),
                    position: hit.position,
                    score: hit.score,
                    normalized_score: hit.score,
                })
            })
            .collect();

        normalize_scores(&mut passages);

        tracing::debug!(
            top_k,
            returned = passages.len(),
            best = passages.first().map(|p| p.score),
            "retrieved passages"
        );

        Ok(passages)
    }
}

/// Scale scores by the maximum raw score of this result set.
///
/// With a non-positive maximum (or no passages) there is nothing to scale
/// against and the normalized score is the raw score. Scores below zero under
/// a positive maximum are floored at 0 so the result stays within [0, 1].
pub fn normalize_scores(passages: &mut [RetrievedPassage]) {
    let max = passages
        .iter()
        .map(|p| p.score)
        .fold(f32::NEG_INFINITY, f32::max);

    if passages.is_empty() || max <= 0.0 {
        if !passages.is_empty() {
            tracing::warn!(max, "degenerate scores, leaving them unnormalized");
        }
        for passage in passages.iter_mut() {
            passage.normalized_score = passage.score;
        }
        return;
    }

    for passage in passages.iter_mut() {
        passage.normalized_score = (passage.score / max).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashEmbedder;

    fn passage(position: usize, score: f32) -> RetrievedPassage {
        RetrievedPassage {
            text: format!("chunk {}", position),
            position,
            score,
            normalized_score: score,
        }
    }

    #[test]
    fn test_normalize_by_batch_max() {
        let mut passages = vec![passage(0, 0.8), passage(1, 0.4), passage(2, 0.2)];
        normalize_scores(&mut passages);

        assert_eq!(passages[0].normalized_score, 1.0);
        assert!((passages[1].normalized_score - 0.5).abs() < 1e-6);
        assert!((passages[2].normalized_score - 0.25).abs() < 1e-6);
        // raw scores untouched
        assert_eq!(passages[1].score, 0.4);
    }

    #[test]
    fn test_normalize_all_zero_keeps_raw() {
        let mut passages = vec![passage(0, 0.0), passage(1, 0.0)];
        normalize_scores(&mut passages);
        assert!(passages.iter().all(|p| p.normalized_score == 0.0));
    }

    #[test]
    fn test_normalize_negative_max_keeps_raw() {
        let mut passages = vec![passage(0, -0.1), passage(1, -0.3)];
        normalize_scores(&mut passages);
        assert_eq!(passages[0].normalized_score, -0.1);
        assert_eq!(passages[1].normalized_score, -0.3);
    }

    #[test]
    fn test_normalize_floors_negative_scores() {
        let mut passages = vec![passage(0, 0.5), passage(1, -0.5)];
        normalize_scores(&mut passages);
        assert_eq!(passages[0].normalized_score, 1.0);
        assert_eq!(passages[1].normalized_score, 0.0);
    }

    #[test]
    fn test_normalize_empty() {
        let mut passages: Vec<RetrievedPassage> = Vec::new();
        normalize_scores(&mut passages);
        assert!(passages.is_empty());
    }

    #[test]
    fn test_query_vector_is_unit_length() {
        let retriever = Retriever::new(Arc::new(HashEmbedder::new(128)));
        let v = retriever.embed_query("How do cells divide?").unwrap();
        assert!((v.dot(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let retriever = Retriever::new(Arc::new(HashEmbedder::new(16)));
        let result = retriever.retrieve("anything", &FlatIndex::empty(16), &[], 0);
        assert!(matches!(result, Err(RetrievalError::InvalidTopK(0))));
    }

    #[test]
    fn test_misaligned_chunks_rejected() {
        let embedder = HashEmbedder::new(64);
        let chunks = vec!["One.".to_string(), "Two.".to_string()];
        let (index, _) = FlatIndex::build(&embedder, &chunks).unwrap();

        let retriever = Retriever::new(Arc::new(embedder));
        let result = retriever.retrieve("One.", &index, &chunks[..1], 5);
        assert!(matches!(
            result,
            Err(RetrievalError::IndexMismatch { index_len: 2, chunks_len: 1 })
        ));
    }

    #[test]
    fn test_mixed_embedders_rejected() {
        let chunks = vec!["Cats are mammals.".to_string()];
        let (index, _) = FlatIndex::build(&HashEmbedder::new(64), &chunks).unwrap();

        let retriever = Retriever::new(Arc::new(HashEmbedder::new(32)));
        let result = retriever.retrieve("cats", &index, &chunks, 1);
        assert!(matches!(
            result,
            Err(RetrievalError::DimensionMismatch { expected: 64, got: 32 })
        ));
    }
}
