// studycore/src/embeddings/config.rs
//
// Configuration types for the embedding backend

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported ONNX sentence-embedding models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OnnxModel {
    /// all-MiniLM-L6-v2 - 384 dimensions, lightweight
    #[default]
    #[serde(rename = "all-minilm-l6-v2")]
    AllMiniLML6V2,

    /// BAAI/bge-small-en-v1.5 - 384 dimensions, fast
    #[serde(rename = "bge-small-en-v1.5")]
    BGESmallENV15,

    /// nomic-ai/modernbert-embed-base - 768 dimensions, high quality
    #[serde(rename = "modernbert-embed-base")]
    ModernBERTBase,
}

impl fmt::Display for OnnxModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllMiniLML6V2 => write!(f, "all-minilm-l6-v2"),
            Self::BGESmallENV15 => write!(f, "bge-small-en-v1.5"),
            Self::ModernBERTBase => write!(f, "modernbert-embed-base"),
        }
    }
}

impl OnnxModel {
    /// Parse a model id as accepted by the WASM layer
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "all-minilm-l6-v2" | "all-MiniLM-L6-v2" => Some(Self::AllMiniLML6V2),
            "bge-small" | "bge-small-en-v1.5" => Some(Self::BGESmallENV15),
            "modernbert-base" | "modernbert-embed-base" => Some(Self::ModernBERTBase),
            _ => None,
        }
    }

    /// Get the expected embedding dimensions for this model
    pub fn dimensions(&self) -> usize {
        match self {
            Self::AllMiniLML6V2 => 384,
            Self::BGESmallENV15 => 384,
            Self::ModernBERTBase => 768,
        }
    }

    /// Get the maximum sequence length for this model
    pub fn max_length(&self) -> usize {
        match self {
            Self::AllMiniLML6V2 => 256,
            Self::BGESmallENV15 => 512,
            Self::ModernBERTBase => 8192,
        }
    }

    /// Get HuggingFace model ID
    pub fn hf_model_id(&self) -> &'static str {
        match self {
            Self::AllMiniLML6V2 => "sentence-transformers/all-MiniLM-L6-v2",
            Self::BGESmallENV15 => "BAAI/bge-small-en-v1.5",
            Self::ModernBERTBase => "nomic-ai/modernbert-embed-base",
        }
    }

    /// Pooling the model was trained with
    pub fn default_pooling(&self) -> PoolingStrategy {
        match self {
            Self::AllMiniLML6V2 | Self::ModernBERTBase => PoolingStrategy::Mean,
            Self::BGESmallENV15 => PoolingStrategy::Cls,
        }
    }
}

/// Pooling strategy for converting token embeddings to sentence embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PoolingStrategy {
    /// Mean pooling over all tokens (most common)
    #[default]
    Mean,

    /// Use [CLS] token embedding
    Cls,

    /// Max pooling over tokens
    Max,
}

/// Embedding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Which model to use
    pub model: OnnxModel,

    /// Pooling strategy
    pub pooling: PoolingStrategy,

    /// Number of texts per inference call
    pub batch_size: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        let model = OnnxModel::default();
        Self {
            model,
            pooling: model.default_pooling(),
            batch_size: 32,
        }
    }
}

impl EmbedConfig {
    /// Config for a specific model with its native pooling
    pub fn for_model(model: OnnxModel) -> Self {
        Self {
            model,
            pooling: model.default_pooling(),
            ..Default::default()
        }
    }

    /// Builder: set batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Builder: set pooling strategy
    pub fn with_pooling(mut self, pooling: PoolingStrategy) -> Self {
        self.pooling = pooling;
        self
    }

    /// Effective inference batch size (never zero)
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
