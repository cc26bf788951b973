//! StudyCore: Retrieval Core for Study Material Q&A
//!
//! A Rust/WASM implementation of the document retrieval behind a study
//! assistant: uploaded material goes in, ranked passages for a question
//! come out.
//!
//! # Architecture
//!
//! ## Preparation
//! - `text.rs` - Text normalization, sentence splitting, topic detection
//! - `rag/chunker.rs` - SemanticChunker: sentence-respecting word-budget chunks
//!
//! ## Embedding
//! - `embeddings/model.rs` - OnnxEmbedder: sentence-transformer inference via tract
//! - `embeddings/hashing.rs` - HashEmbedder: deterministic feature hashing
//!
//! ## Retrieval
//! - `rag/index.rs` - FlatIndex: exact cosine search over normalized vectors
//! - `rag/retriever.rs` - Retriever: query embedding + per-query score scaling
//! - `rag/session.rs` - StudySession: one document batch, replaced atomically
//! - `rag/context.rs` - Context formatting and the answer generator seam
//!
//! # Usage (Rust)
//! ```rust,ignore
//! use std::sync::Arc;
//! use studycore::{HashEmbedder, RetrievalConfig, StudySession};
//!
//! let mut session = StudySession::new(Arc::new(HashEmbedder::default()), RetrievalConfig::default());
//! session.load_documents(&["Mitochondria produce ATP. Ribosomes build proteins."])?;
//! for passage in session.ask("What makes ATP?")? {
//!     println!("{:.2} {}", passage.normalized_score, passage.text);
//! }
//! ```
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { StudyCortex } from 'studycore';
//!
//! await init();
//!
//! const cortex = new StudyCortex();
//! cortex.loadModel(onnxBytes, tokenizerJson);
//! cortex.loadDocuments([pdfText]);
//! const passages = cortex.ask("What makes ATP?");
//! ```

pub mod config;
pub mod embeddings;
pub mod error;
pub mod rag;
pub mod text;
pub mod wasm;

pub use config::RetrievalConfig;
pub use embeddings::{
    EmbedConfig, EmbedError, Embedder, HashEmbedder, OnnxEmbedder, OnnxModel, PoolingStrategy,
};
pub use error::{Result, RetrievalError};
pub use rag::*;
pub use text::{clean_text, combine_documents, detect_topics, split_sentences, word_count};
pub use wasm::StudyCortex;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("studycore v{}", env!("CARGO_PKG_VERSION"))
}
