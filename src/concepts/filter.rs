//! Noise filtering for extracted concepts.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ConceptSet;

/// Stop-word ratio above which a short concept is dropped.
const MAX_STOPWORD_RATIO: f32 = 0.65;

/// Concepts with at least this many words are never dropped for stop words.
const STOPWORD_CHECK_MAX_WORDS: usize = 5;

/// Concepts shorter than this (chars) need a digit or a capitalized word.
const MIN_PLAIN_CHARS: usize = 6;

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "a", "an", "is",
    "are", "was", "were",
];

// Repeated so that "1. 2) - text" loses every marker in one pass.
static LEADING_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[\d.)\-]+\s*)+").expect("valid leading marker regex"));

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid digit regex"));

static CAPITALIZED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("valid capitalized word regex"));

// Matched against the lower-cased concept.
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[•▪◦]|--|___|\b(?:slide|page|figure|table|university|department)\b")
        .expect("valid noise regex")
});

static ALPHA_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]{3,}").expect("valid alpha run regex"));

/// Removes noisy or meaningless concepts and normalizes the rest.
///
/// Idempotent: filtering an already-filtered set returns it unchanged.
pub fn filter_concepts<I, S>(concepts: I) -> ConceptSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    concepts
        .into_iter()
        .filter_map(|c| clean_concept(c.as_ref()))
        .collect()
}

/// Normalizes one concept, or returns `None` if it should be dropped.
pub fn clean_concept(concept: &str) -> Option<String> {
    let trimmed = concept.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = LEADING_MARKERS.replace(trimmed, "");
    let cleaned = cleaned.as_ref();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.chars().count() < MIN_PLAIN_CHARS
        && !DIGIT.is_match(cleaned)
        && !CAPITALIZED_WORD.is_match(cleaned)
    {
        return None;
    }

    let lower = cleaned.to_lowercase();
    if NOISE.is_match(&lower) {
        return None;
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    let stop_count = words.iter().filter(|w| STOP_WORDS.contains(*w)).count();
    let stop_ratio = stop_count as f32 / words.len() as f32;
    if stop_ratio > MAX_STOPWORD_RATIO && words.len() < STOPWORD_CHECK_MAX_WORDS {
        return None;
    }

    if !ALPHA_RUN.is_match(cleaned) {
        return None;
    }

    Some(cleaned.to_string())
}
