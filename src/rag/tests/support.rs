//! Test embedders wrapping `HashEmbedder`

use ndarray::Array2;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::embeddings::{EmbedError, Embedder, HashEmbedder};

/// Counts `embed` calls
pub struct CountingEmbedder {
    inner: HashEmbedder,
    pub calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dimensions),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for CountingEmbedder {
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn embed(&self, texts: &[String]) -> Result<Array2<f32>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(texts)
    }
}

/// Fails every call while `failing` is set
pub struct FlakyEmbedder {
    inner: HashEmbedder,
    pub failing: AtomicBool,
}

impl FlakyEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dimensions),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Embedder for FlakyEmbedder {
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn embed(&self, texts: &[String]) -> Result<Array2<f32>, EmbedError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbedError::InferenceFailed("backend unavailable".to_string()));
        }
        self.inner.embed(texts)
    }
}
