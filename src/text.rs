//! Text preparation ahead of chunking.
//!
//! Extracted document text arrives with layout noise: non-breaking spaces,
//! stacked blank lines, runs of spaces. `clean_text` flattens that so the
//! chunker only ever sees sentence punctuation and single separators.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
static SPACE_RUNS: OnceLock<Regex> = OnceLock::new();
static TOPIC_WORDS: OnceLock<Regex> = OnceLock::new();

fn blank_lines() -> &'static Regex {
    BLANK_LINES.get_or_init(|| Regex::new(r"\n{2,}").expect("static regex"))
}

fn space_runs() -> &'static Regex {
    SPACE_RUNS.get_or_init(|| Regex::new(r" {2,}").expect("static regex"))
}

fn topic_words() -> &'static Regex {
    TOPIC_WORDS.get_or_init(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("static regex"))
}

/// Normalize raw extracted text.
///
/// NBSP becomes a plain space, the ends are trimmed, 2+ newlines collapse to
/// one and 2+ spaces collapse to one.
pub fn clean_text(raw: &str) -> String {
    let text = raw.replace('\u{a0}', " ");
    let text = blank_lines().replace_all(text.trim(), "\n");
    space_runs().replace_all(&text, " ").into_owned()
}

/// Concatenate a batch of extracted documents and clean the result.
///
/// Every document is followed by a blank line so the last sentence of one
/// file never runs into the first sentence of the next.
pub fn combine_documents<S: AsRef<str>>(documents: &[S]) -> String {
    let mut combined = String::with_capacity(
        documents.iter().map(|d| d.as_ref().len() + 2).sum(),
    );
    for doc in documents {
        combined.push_str(doc.as_ref());
        combined.push_str("\n\n");
    }
    clean_text(&combined)
}

/// Raw sentence pieces: split after `.`, `!` or `?` when followed by
/// whitespace. The terminal punctuation stays with its sentence and the
/// whole whitespace run is the separator. Pieces may be empty.
pub(crate) fn sentence_pieces(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let follows_space = chars.peek().is_some_and(|&(_, next)| next.is_whitespace());
        if !follows_space {
            continue;
        }

        pieces.push(&text[start..i + c.len_utf8()]);

        // Skip the whole separator run
        start = text.len();
        while let Some(&(j, w)) = chars.peek() {
            if !w.is_whitespace() {
                start = j;
                break;
            }
            chars.next();
        }
    }

    pieces.push(&text[start.min(text.len())..]);
    pieces
}

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_pieces(text)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Naive keyword-frequency topics for a table of contents.
///
/// Counts lowercase whole words of 4+ ASCII letters and returns the `top_n`
/// most frequent; equal counts keep first-occurrence order.
pub fn detect_topics(text: &str, top_n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (order, m) in topic_words().find_iter(&lowered).enumerate() {
        counts.entry(m.as_str()).or_insert((0, order)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}
