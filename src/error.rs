//! Crate-level error type for the retrieval core.
//!
//! Empty inputs never produce errors; they flow through as empty results.
//! What ends up here is either a configuration bug (mixed embedders, bad
//! `top_k`) or a failure of the embedding backend, which is propagated as-is.

use thiserror::Error;

use crate::embeddings::EmbedError;

/// Errors surfaced by chunk indexing and retrieval
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Query or stored vector has a different length than the index
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// `top_k` must be at least 1
    #[error("Invalid top_k: {0} (must be >= 1)")]
    InvalidTopK(usize),

    /// Index and chunk sequence were not built together
    #[error("Index holds {index_len} vectors but chunk sequence has {chunks_len} entries")]
    IndexMismatch { index_len: usize, chunks_len: usize },

    /// Embedder returned a matrix of the wrong shape
    #[error("Embedder returned {got} rows for {expected} texts")]
    RowCountMismatch { expected: usize, got: usize },

    /// Rejected configuration value
    #[error("Invalid config: {0}")]
    Config(String),

    /// Embedding backend failure
    #[error(transparent)]
    Embed(#[from] EmbedError),
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
