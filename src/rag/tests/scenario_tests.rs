//! End-to-end behavior of chunking, indexing and retrieval on small corpora

use std::sync::Arc;

use super::support::CountingEmbedder;
use crate::config::RetrievalConfig;
use crate::embeddings::{Embedder, HashEmbedder};
use crate::rag::{semantic_chunks, FlatIndex, Retriever, StudySession};

const ANIMALS: &str = "Cats are mammals. Dogs are mammals too. Fish live in water.";

fn hash_embedder() -> Arc<dyn Embedder> {
    Arc::new(HashEmbedder::new(512))
}

// ============================================================================
// Chunking
// ============================================================================

#[test]
fn test_each_sentence_fills_a_chunk() {
    let chunks = semantic_chunks(ANIMALS, 6);
    assert_eq!(
        chunks,
        vec!["Cats are mammals.", "Dogs are mammals too.", "Fish live in water."]
    );
}

#[test]
fn test_generous_budget_keeps_one_chunk() {
    let chunks = semantic_chunks(ANIMALS, 450);
    assert_eq!(chunks, vec![ANIMALS]);
}

// ============================================================================
// Empty batch
// ============================================================================

#[test]
fn test_empty_batch_yields_empty_everything() {
    let embedder = Arc::new(CountingEmbedder::new(64));
    let mut session = StudySession::new(embedder.clone(), RetrievalConfig::default());

    let docs: Vec<String> = Vec::new();
    let batch = session.load_documents(&docs).unwrap();
    assert!(batch.chunks.is_empty());
    assert_eq!(batch.index.len(), 0);

    let passages = session.ask("What is photosynthesis?").unwrap();
    assert!(passages.is_empty());
    // nothing to embed at build time, nothing to search at query time
    assert_eq!(embedder.calls(), 0);
}

#[test]
fn test_whitespace_only_documents() {
    let mut session = StudySession::new(hash_embedder(), RetrievalConfig::default());
    let batch = session.load_documents(&["  \u{a0}\n\n ", ""]).unwrap();
    assert!(batch.chunks.is_empty());
    assert!(batch.topics.is_empty());
}

// ============================================================================
// Result size
// ============================================================================

#[test]
fn test_top_k_larger_than_index() {
    let embedder = hash_embedder();
    let chunks = vec!["Cats are mammals.".to_string(), "Fish live in water.".to_string()];
    let (index, _) = FlatIndex::build(embedder.as_ref(), &chunks).unwrap();

    let passages = Retriever::new(embedder)
        .retrieve("Where do fish live?", &index, &chunks, 5)
        .unwrap();
    assert_eq!(passages.len(), 2);
}

// ============================================================================
// Exact match ranking
// ============================================================================

#[test]
fn test_query_matching_chunk_ranks_first() {
    let mut session = StudySession::new(
        hash_embedder(),
        RetrievalConfig::default().with_max_chunk_words(6),
    );
    session.load_text(ANIMALS).unwrap();
    assert_eq!(session.chunks().len(), 3);

    let passages = session.ask("Dogs are mammals too.").unwrap();
    assert_eq!(passages[0].position, 1);
    assert_eq!(passages[0].text, "Dogs are mammals too.");
    assert_eq!(passages[0].normalized_score, 1.0);
    assert!((passages[0].score - 1.0).abs() < 1e-5);
}

#[test]
fn test_multiple_documents_are_separated() {
    let mut session = StudySession::new(
        hash_embedder(),
        RetrievalConfig::default().with_max_chunk_words(4),
    );
    let batch = session
        .load_documents(&["Plants need light.", "Roots absorb water."])
        .unwrap();

    assert_eq!(batch.chunks, vec!["Plants need light.", "Roots absorb water."]);
}

#[test]
fn test_sessions_share_embedder_not_state() {
    let embedder = hash_embedder();
    let mut biology = StudySession::new(embedder.clone(), RetrievalConfig::default());
    let mut history = StudySession::new(embedder.clone(), RetrievalConfig::default());

    biology.load_text("Cells divide by mitosis.").unwrap();
    history.load_text("Rome was founded in antiquity.").unwrap();

    assert_eq!(biology.chunks(), ["Cells divide by mitosis."]);
    assert_eq!(history.chunks(), ["Rome was founded in antiquity."]);
    assert!(Arc::ptr_eq(biology.embedder(), history.embedder()));
}
