//! Study Session - one user's document batch and the queries against it
//!
//! ```text
//! documents → combine + clean → SemanticChunker → FlatIndex::build
//!                                                     ↓
//!                                  DocumentBatch {chunks, index, topics}
//!                                                     ↓
//! question  → Retriever ───────────────────────→ ranked passages
//! ```
//!
//! Loading a new batch replaces the previous one only once the build has
//! fully succeeded. Sessions share the embedder and nothing else.

use instant::Instant;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::chunker::SemanticChunker;
use super::index::FlatIndex;
use super::retriever::{RetrievedPassage, Retriever};
use crate::config::RetrievalConfig;
use crate::embeddings::Embedder;
use crate::error::Result;
use crate::text::{combine_documents, detect_topics};

/// Topics listed for a loaded batch
pub const TOPIC_COUNT: usize = 12;

/// Facts about the last successful build
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    pub chunk_count: usize,
    pub dimensions: usize,
    pub elapsed_ms: f64,
}

/// Chunks of one upload together with their index
#[derive(Debug, Clone)]
pub struct DocumentBatch {
    pub chunks: Vec<String>,
    pub index: FlatIndex,
    /// Normalized chunk embeddings, row `i` for chunk `i`
    pub embeddings: Array2<f32>,
    pub topics: Vec<String>,
    pub stats: BuildStats,
}

pub struct StudySession {
    retriever: Retriever,
    config: RetrievalConfig,
    batch: Option<DocumentBatch>,
}

impl StudySession {
    pub fn new(embedder: Arc<dyn Embedder>, config: RetrievalConfig) -> Self {
        Self {
            retriever: Retriever::new(embedder),
            config,
            batch: None,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        self.retriever.embedder()
    }

    /// Replace the current batch with `documents` chunked at the configured budget
    pub fn load_documents<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<&DocumentBatch> {
        self.load_documents_with(documents, self.config.max_chunk_words)
    }

    /// Replace the current batch, chunking at `max_words`.
    ///
    /// On error the previous batch stays in place.
    pub fn load_documents_with<S: AsRef<str>>(
        &mut self,
        documents: &[S],
        max_words: usize,
    ) -> Result<&DocumentBatch> {
        let started = Instant::now();

        let text = combine_documents(documents);
        let chunks = SemanticChunker::new(max_words).chunk(&text);
        let (index, embeddings) = FlatIndex::build(self.retriever.embedder().as_ref(), &chunks)?;
        let topics = detect_topics(&text, TOPIC_COUNT);

        let stats = BuildStats {
            chunk_count: chunks.len(),
            dimensions: index.dimensions(),
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        };

        tracing::info!(
            documents = documents.len(),
            chunks = stats.chunk_count,
            dimensions = stats.dimensions,
            elapsed_ms = stats.elapsed_ms,
            "document batch indexed"
        );

        Ok(&*self.batch.insert(DocumentBatch {
            chunks,
            index,
            embeddings,
            topics,
            stats,
        }))
    }

    /// Load a single already-extracted text
    pub fn load_text(&mut self, text: &str) -> Result<&DocumentBatch> {
        self.load_documents(&[text])
    }

    /// Passages for `query` using the configured `top_k`
    pub fn ask(&self, query: &str) -> Result<Vec<RetrievedPassage>> {
        self.ask_with(query, self.config.top_k)
    }

    /// Passages for `query`; empty when nothing is loaded
    pub fn ask_with(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        match &self.batch {
            Some(batch) => self
                .retriever
                .retrieve(query, &batch.index, &batch.chunks, top_k),
            None => {
                tracing::debug!("no document batch loaded");
                Ok(Vec::new())
            }
        }
    }

    /// Drop the current batch
    pub fn clear(&mut self) {
        self.batch = None;
    }

    pub fn batch(&self) -> Option<&DocumentBatch> {
        self.batch.as_ref()
    }

    pub fn chunks(&self) -> &[String] {
        self.batch
            .as_ref()
            .map(|b| b.chunks.as_slice())
            .unwrap_or_default()
    }

    pub fn topics(&self) -> &[String] {
        self.batch
            .as_ref()
            .map(|b| b.topics.as_slice())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> Option<BuildStats> {
        self.batch.as_ref().map(|b| b.stats)
    }
}
