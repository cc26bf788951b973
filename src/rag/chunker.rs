//! Semantic Chunker
//!
//! Greedy sentence packing under a word budget. Sentences are never split;
//! a sentence longer than the budget becomes a chunk on its own.

use crate::text::{sentence_pieces, word_count};

/// Default word budget per chunk
pub const DEFAULT_MAX_WORDS: usize = 450;

/// Sentence-respecting chunker bounded by whitespace word count
#[derive(Debug, Clone, Copy)]
pub struct SemanticChunker {
    max_words: usize,
}

impl Default for SemanticChunker {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

impl SemanticChunker {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Chunk normalized text into an ordered sequence of chunk strings
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut buffer_words = 0;

        for sentence in sentence_pieces(text) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            let words = word_count(sentence);

            if buffer_words + words <= self.max_words {
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(sentence);
                buffer_words += words;
            } else {
                if !buffer.is_empty() {
                    chunks.push(std::mem::take(&mut buffer));
                }
                // An oversized sentence still starts (and fills) its own buffer
                buffer.push_str(sentence);
                buffer_words = words;
            }
        }

        if !buffer.is_empty() {
            chunks.push(buffer);
        }

        chunks
    }
}

/// Convenience wrapper: `SemanticChunker::new(max_words).chunk(text)`
pub fn semantic_chunks(text: &str, max_words: usize) -> Vec<String> {
    SemanticChunker::new(max_words).chunk(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(SemanticChunker::default().chunk("").is_empty());
        assert!(SemanticChunker::default().chunk("   \n ").is_empty());
    }

    #[test]
    fn test_small_text() {
        let chunks = SemanticChunker::default().chunk("Short text.");
        assert_eq!(chunks, vec!["Short text."]);
    }

    #[test]
    fn test_sentences_packed_until_budget() {
        let text = "One two three. Four five. Six seven eight nine.";
        let chunks = semantic_chunks(text, 5);
        assert_eq!(chunks, vec!["One two three. Four five.", "Six seven eight nine."]);
    }

    #[test]
    fn test_budget_is_inclusive() {
        let chunks = semantic_chunks("A b c. D e f.", 6);
        assert_eq!(chunks, vec!["A b c. D e f."]);
    }

    #[test]
    fn test_oversized_sentence_stands_alone() {
        let text = "Tiny. This single sentence has far more than four words in it. End.";
        let chunks = semantic_chunks(text, 4);
        assert_eq!(
            chunks,
            vec![
                "Tiny.",
                "This single sentence has far more than four words in it.",
                "End.",
            ]
        );
    }

    #[test]
    fn test_oversized_first_sentence() {
        let chunks = semantic_chunks("Five words are right here. Ok.", 2);
        assert_eq!(chunks, vec!["Five words are right here.", "Ok."]);
    }

    #[test]
    fn test_zero_budget_gives_one_sentence_per_chunk() {
        let chunks = semantic_chunks("A. B. C.", 0);
        assert_eq!(chunks, vec!["A.", "B.", "C."]);
    }

    #[test]
    fn test_inner_newlines_preserved() {
        let chunks = semantic_chunks("Line one\nstill same sentence. Next.", 100);
        assert_eq!(chunks, vec!["Line one\nstill same sentence. Next."]);
    }

    #[test]
    fn test_text_without_terminal_punctuation() {
        let chunks = semantic_chunks("no punctuation at all here", 3);
        assert_eq!(chunks, vec!["no punctuation at all here"]);
    }
}
