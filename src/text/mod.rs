//! Sentence splitting and tokenization shared by the extractor and the detector.


use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence boundary regex"));

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));

/// Splits on `.`, `!` or `?` followed by whitespace.
///
/// Fragments are trimmed; those shorter than `min_chars` characters are dropped.
/// Terminal punctuation not followed by whitespace (e.g. at end of text) stays attached.
pub fn split_sentences(text: &str, min_chars: usize) -> Vec<String> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() >= min_chars)
        .map(str::to_string)
        .collect()
}

/// Truncates to at most `max_chars` characters (never splits a code point).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Lower-cased alphanumeric word tokens.
pub fn word_tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Distinct numeric literals (`12`, `3.5`).
pub fn numeric_tokens(text: &str) -> BTreeSet<&str> {
    NUMBER.find_iter(text).map(|m| m.as_str()).collect()
}
