// studycore/src/embeddings/hashing.rs
//
// Deterministic feature-hashing embedder. No model files, no inference:
// each lowercase alphanumeric token is hashed (FNV-1a) into a signed bucket.
// Texts sharing vocabulary land close together, identical texts land on the
// same vector. Used as the offline fallback and as the test double for the
// ONNX backend.

use ndarray::Array2;

use crate::embeddings::{EmbedError, Embedder};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

pub struct HashEmbedder {
    dimensions: usize,
    model_id: String,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            model_id: format!("hash-{}", dimensions.max(1)),
        }
    }

    fn accumulate(&self, text: &str, row: &mut [f32]) {
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            row[bucket] += sign;
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, texts: &[String]) -> Result<Array2<f32>, EmbedError> {
        let mut matrix = Array2::<f32>::zeros((texts.len(), self.dimensions));
        for (text, mut row) in texts.iter().zip(matrix.rows_mut()) {
            // rows of a fresh standard-layout array are contiguous
            if let Some(slice) = row.as_slice_mut() {
                self.accumulate(text, slice);
            }
        }
        Ok(matrix)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}
