//! Hand-off to the answer generator.
//!
//! The generator owns prompting and provider calls. This module shapes the
//! retrieved passages for it and enforces the one rule the core cares about:
//! without passages there is nothing to answer from.

use serde::{Deserialize, Serialize};

use super::retriever::RetrievedPassage;

/// Answer given when retrieval produced no passages
pub const INSUFFICIENT_INFORMATION: &str = "I don't have enough information to answer that.";

/// Number of passages shown as sources under an answer
pub const DEFAULT_SOURCE_LIMIT: usize = 3;

/// Excerpt length (in characters) for a source preview
pub const DEFAULT_EXCERPT_CHARS: usize = 750;

/// Produces an answer string from a question and formatted context
pub trait AnswerGenerator {
    type Error: std::error::Error;

    fn answer(&self, question: &str, context: &str) -> Result<String, Self::Error>;
}

/// A passage as shown beneath an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePreview {
    pub position: usize,
    pub normalized_score: f32,
    pub excerpt: String,
}

/// Generator output plus the passages it was grounded on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedAnswer {
    pub answer: String,
    pub sources: Vec<SourcePreview>,
}

/// Numbered passage blocks, 1-based, separated by blank lines
pub fn format_context(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("Passage {}: {}", i + 1, p.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `limit` passages with excerpts cut to `max_chars` characters
pub fn source_previews(
    passages: &[RetrievedPassage],
    limit: usize,
    max_chars: usize,
) -> Vec<SourcePreview> {
    passages
        .iter()
        .take(limit)
        .map(|p| SourcePreview {
            position: p.position,
            normalized_score: p.normalized_score,
            excerpt: excerpt(&p.text, max_chars),
        })
        .collect()
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Ask the generator to answer from the retrieved passages.
///
/// With no passages the generator is never called and the answer is
/// [`INSUFFICIENT_INFORMATION`].
pub fn answer_with_context<G: AnswerGenerator>(
    generator: &G,
    question: &str,
    passages: &[RetrievedPassage],
) -> Result<GroundedAnswer, G::Error> {
    if passages.is_empty() {
        return Ok(GroundedAnswer {
            answer: INSUFFICIENT_INFORMATION.to_string(),
            sources: Vec::new(),
        });
    }

    let context = format_context(passages);
    let answer = generator.answer(question, &context)?;

    Ok(GroundedAnswer {
        answer: answer.trim().to_string(),
        sources: source_previews(passages, DEFAULT_SOURCE_LIMIT, DEFAULT_EXCERPT_CHARS),
    })
}
