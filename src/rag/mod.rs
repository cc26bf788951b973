//! Retrieval core for study material
//!
//! # Architecture
//! ```text
//! Documents → clean → SemanticChunker (450 words) → Embedder → FlatIndex
//!                                                                  ↓
//! Question  → Embedder → L2 normalize → exact search → Top-K passages
//!                                                                  ↓
//!                                          format_context → AnswerGenerator
//! ```

mod chunker;
mod context;
mod distance;
mod index;
mod retriever;
mod session;

#[cfg(test)]
mod tests;

pub use chunker::{semantic_chunks, SemanticChunker, DEFAULT_MAX_WORDS};
pub use context::{
    answer_with_context, format_context, source_previews, AnswerGenerator, GroundedAnswer,
    SourcePreview, DEFAULT_EXCERPT_CHARS, DEFAULT_SOURCE_LIMIT, INSUFFICIENT_INFORMATION,
};
pub use distance::{l2_normalize, l2_normalize_rows};
pub use index::{FlatIndex, SearchHit};
pub use retriever::{normalize_scores, RetrievedPassage, Retriever, DEFAULT_TOP_K};
pub use session::{BuildStats, DocumentBatch, StudySession, TOPIC_COUNT};
