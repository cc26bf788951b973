// studycore/src/embeddings/mod.rs
//
// Embedding backends behind a single `Embedder` trait.
// `OnnxEmbedder` runs a sentence-transformer through `tract-onnx` (pure Rust,
// WASM-compatible); `HashEmbedder` is the deterministic offline stand-in.
//
// Supported models:
// - AllMiniLML6V2 (sentence-transformers/all-MiniLM-L6-v2) - 384 dimensions
// - BGESmallENV15 (BAAI/bge-small-en-v1.5) - 384 dimensions
// - ModernBERTBase (nomic-ai/modernbert-embed-base) - 768 dimensions

pub mod config;
pub mod hashing;
pub mod model;
pub mod tokenize;

pub use config::{EmbedConfig, OnnxModel, PoolingStrategy};
pub use hashing::HashEmbedder;
pub use model::{EmbedError, OnnxEmbedder};

use ndarray::{Array1, Array2};

/// Text to dense vector mapping shared by indexing and querying.
///
/// One instance is constructed per process and handed out as
/// `Arc<dyn Embedder>`. Vectors from different instances or models are not
/// comparable. Implementations return raw vectors: no normalization.
pub trait Embedder: Send + Sync {
    /// Identifier of the underlying model
    fn model_id(&self) -> &str;

    /// Length of every produced vector
    fn dimensions(&self) -> usize;

    /// Embed a batch, returning a `(texts.len(), dimensions)` matrix
    fn embed(&self, texts: &[String]) -> Result<Array2<f32>, EmbedError>;

    /// Embed a single text
    fn embed_one(&self, text: &str) -> Result<Array1<f32>, EmbedError> {
        let matrix = self.embed(&[text.to_string()])?;
        matrix
            .outer_iter()
            .next()
            .map(|row| row.to_owned())
            .ok_or_else(|| EmbedError::InferenceFailed("Empty result".to_string()))
    }
}
