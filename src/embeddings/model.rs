// studycore/src/embeddings/model.rs
//
// ONNX model inference via tract

use ndarray::{Array2, Array3, ArrayView2, Axis};
use std::sync::Arc;
use thiserror::Error;
use tract_onnx::prelude::*;

use crate::embeddings::config::{EmbedConfig, PoolingStrategy};
use crate::embeddings::tokenize::{pad_batch, EmbedTokenizer, TokenizedInput, TokenizerError};
use crate::embeddings::Embedder;

/// Type alias for the tract typed model
type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Model loading and inference errors
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Model load failed: {0}")]
    LoadFailed(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Shape error: {0}")]
    ShapeError(String),
}

/// Sentence-embedding model loaded into tract, ready for inference.
///
/// Produces raw pooled vectors; callers own normalization.
pub struct OnnxEmbedder {
    model: Arc<TractModel>,
    tokenizer: EmbedTokenizer,
    config: EmbedConfig,
    model_id: String,
    dimensions: usize,
}

impl OnnxEmbedder {
    /// Load model from ONNX bytes and tokenizer JSON
    pub fn from_bytes(
        model_bytes: &[u8],
        tokenizer_json: &str,
        config: EmbedConfig,
    ) -> Result<Self, EmbedError> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(|e| EmbedError::LoadFailed(e.to_string()))?
            .into_optimized()
            .map_err(|e| EmbedError::LoadFailed(e.to_string()))?
            .into_runnable()
            .map_err(|e| EmbedError::LoadFailed(e.to_string()))?;

        let tokenizer = EmbedTokenizer::from_json(tokenizer_json, config.model.max_length())?;

        tracing::info!(
            model = %config.model,
            dimensions = config.model.dimensions(),
            "embedding model loaded"
        );

        Ok(Self {
            model: Arc::new(model),
            tokenizer,
            model_id: config.model.to_string(),
            dimensions: config.model.dimensions(),
            config,
        })
    }

    /// Load model and tokenizer from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_files(
        model_path: impl AsRef<std::path::Path>,
        tokenizer_path: impl AsRef<std::path::Path>,
        config: EmbedConfig,
    ) -> Result<Self, EmbedError> {
        let model_bytes = std::fs::read(model_path.as_ref()).map_err(|e| {
            EmbedError::LoadFailed(format!("{}: {}", model_path.as_ref().display(), e))
        })?;
        let tokenizer_json = std::fs::read_to_string(tokenizer_path.as_ref()).map_err(|e| {
            EmbedError::LoadFailed(format!("{}: {}", tokenizer_path.as_ref().display(), e))
        })?;

        Self::from_bytes(&model_bytes, &tokenizer_json, config)
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Run one inference call over a slice of texts
    fn embed_chunk(&self, texts: &[String]) -> Result<Array2<f32>, EmbedError> {
        let encoded = self.tokenizer.encode_batch(texts)?;
        let (padded, seq_len) = pad_batch(encoded);

        let input_ids = build_input_tensor(&padded, seq_len, |t| &t.input_ids)?;
        let attention_mask = build_input_tensor(&padded, seq_len, |t| &t.attention_mask)?;
        let mask_arr = build_attention_mask_array(&padded, seq_len)?;

        // ModernBERT-style exports take no token_type_ids
        let mut inputs: TVec<TValue> = tvec![input_ids.into(), attention_mask.into()];
        if self.model.model().inputs.len() > 2 {
            let token_type_ids = build_input_tensor(&padded, seq_len, |t| &t.token_type_ids)?;
            inputs.push(token_type_ids.into());
        }

        let outputs = self
            .model
            .run(inputs)
            .map_err(|e| EmbedError::InferenceFailed(e.to_string()))?;

        // BERT models output: (batch_size, seq_len, hidden_size)
        let output_3d = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| EmbedError::ShapeError(e.to_string()))?
            .to_owned()
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|e| EmbedError::ShapeError(format!("Failed to convert to 3D: {}", e)))?;

        let hidden_size = output_3d.shape()[2];
        if hidden_size != self.dimensions {
            return Err(EmbedError::ShapeError(format!(
                "{} produced {}-d vectors, expected {}",
                self.model_id, hidden_size, self.dimensions
            )));
        }

        Ok(pool_embeddings(&output_3d, &mask_arr.view(), self.config.pooling))
    }
}

impl Embedder for OnnxEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, texts: &[String]) -> Result<Array2<f32>, EmbedError> {
        if texts.is_empty() {
            return Ok(Array2::zeros((0, self.dimensions)));
        }

        let mut flat = Vec::with_capacity(texts.len() * self.dimensions);
        for batch in texts.chunks(self.config.effective_batch_size()) {
            let pooled = self.embed_chunk(batch)?;
            flat.extend(pooled.iter().copied());
        }

        Array2::from_shape_vec((texts.len(), self.dimensions), flat)
            .map_err(|e| EmbedError::ShapeError(e.to_string()))
    }
}

/// Build input tensor from tokenized inputs
fn build_input_tensor<F>(
    inputs: &[TokenizedInput],
    seq_len: usize,
    extractor: F,
) -> Result<Tensor, EmbedError>
where
    F: Fn(&TokenizedInput) -> &[i64],
{
    let mut data = Vec::with_capacity(inputs.len() * seq_len);
    for input in inputs {
        data.extend_from_slice(extractor(input));
    }

    Tensor::from_shape(&[inputs.len(), seq_len], &data)
        .map_err(|e| EmbedError::ShapeError(e.to_string()))
}

/// Build attention mask as ndarray for pooling calculations
fn build_attention_mask_array(
    inputs: &[TokenizedInput],
    seq_len: usize,
) -> Result<Array2<i64>, EmbedError> {
    let mut data = Vec::with_capacity(inputs.len() * seq_len);
    for input in inputs {
        data.extend_from_slice(&input.attention_mask);
    }

    Array2::from_shape_vec((inputs.len(), seq_len), data)
        .map_err(|e| EmbedError::ShapeError(e.to_string()))
}

/// Reduce token embeddings (batch, seq, hidden) to one vector per text
fn pool_embeddings(
    output: &Array3<f32>,
    attention_mask: &ArrayView2<i64>,
    pooling: PoolingStrategy,
) -> Array2<f32> {
    let (batch_size, _, hidden_size) = output.dim();
    let mut pooled = Array2::<f32>::zeros((batch_size, hidden_size));

    for (i, mut row) in pooled.axis_iter_mut(Axis(0)).enumerate() {
        let token_embeddings = output.index_axis(Axis(0), i);
        let mask = attention_mask.index_axis(Axis(0), i);

        match pooling {
            PoolingStrategy::Mean => {
                // sum(embeddings * mask) / sum(mask)
                let mut count = 0.0f32;
                for (j, &m) in mask.iter().enumerate() {
                    if m > 0 {
                        row += &token_embeddings.row(j);
                        count += 1.0;
                    }
                }
                if count > 0.0 {
                    row /= count;
                }
            }
            PoolingStrategy::Cls => {
                row.assign(&token_embeddings.row(0));
            }
            PoolingStrategy::Max => {
                row.fill(f32::NEG_INFINITY);
                for (j, &m) in mask.iter().enumerate() {
                    if m > 0 {
                        row.zip_mut_with(&token_embeddings.row(j), |acc, &v| *acc = acc.max(v));
                    }
                }
            }
        }
    }

    pooled
}
