//! Retrieval configuration
//!
//! Deserializes from partial JSON (missing fields take defaults), so the host
//! can override only what it cares about.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};
use crate::rag::{DEFAULT_MAX_WORDS, DEFAULT_TOP_K};

/// Knobs for chunking and retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Word budget per chunk
    pub max_chunk_words: usize,
    /// Passages returned per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_chunk_words: DEFAULT_MAX_WORDS,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RetrievalConfig {
    pub fn with_max_chunk_words(mut self, max_chunk_words: usize) -> Self {
        self.max_chunk_words = max_chunk_words;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Reject values that cannot produce a result
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RetrievalError::Config("top_k must be >= 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.max_chunk_words, 450);
        assert_eq!(config.top_k, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: RetrievalConfig = serde_json::from_str(r#"{"top_k": 8}"#).unwrap();
        assert_eq!(config.top_k, 8);
        assert_eq!(config.max_chunk_words, 450);
    }

    #[test]
    fn test_zero_top_k_invalid() {
        let config = RetrievalConfig::default().with_top_k(0);
        assert!(matches!(config.validate(), Err(RetrievalError::Config(_))));
    }

    #[test]
    fn test_builders() {
        let config = RetrievalConfig::default()
            .with_max_chunk_words(100)
            .with_top_k(3);
        assert_eq!(config, RetrievalConfig { max_chunk_words: 100, top_k: 3 });
    }
}
