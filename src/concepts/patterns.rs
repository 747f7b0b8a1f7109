//! Deterministic, regex-based concept extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::ConceptSet;
use crate::constants::MIN_EXTRACTION_SENTENCE_CHARS;
use crate::text::split_sentences;

/// Max capability/feature facts taken from one sentence.
const MAX_CAPABILITY_FACTS: usize = 3;

static NUMERIC_FACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b[\w\s]{0,40}(?:ranges?|from|between|within)\s+\d+(?:\s*[-–]\s*\d+)?(?:\s+\w+)*",
    )
    .expect("valid numeric fact regex")
});

static DATA_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)data\s+from\s+(\d+\s+\w+(?:\s+\w+){0,6})").expect("valid data source regex")
});

static PREDICTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)predicts?\s+([^,.]+(?:\([^)]+\))?)").expect("valid prediction regex")
});

// Case-sensitive: the acronym must be upper case.
static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][A-Z]+)\s+stands?\s+for\s+([^,.]+)").expect("valid definition regex")
});

static CAPABILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:uses?|includes?|provides?|offers?|relies\s+on)\s+([^,.]+)")
        .expect("valid capability regex")
});

/// Extracts concepts from `text` without any external capability.
///
/// The text is split into sentences and every rule runs independently on each
/// sentence; all matches are trimmed and unioned. The result is unfiltered.
pub fn extract_deterministic(text: &str) -> ConceptSet {
    let mut concepts = ConceptSet::new();

    for sentence in split_sentences(text, MIN_EXTRACTION_SENTENCE_CHARS) {
        concepts.extend(sentence_concepts(&sentence));
    }

    debug!(
        text_len = text.len(),
        num_concepts = concepts.len(),
        "Deterministic concept extraction"
    );

    concepts
}

fn sentence_concepts(sentence: &str) -> Vec<String> {
    let mut found = Vec::new();

    found.extend(
        NUMERIC_FACT
            .find_iter(sentence)
            .map(|m| m.as_str().trim().to_string()),
    );

    found.extend(
        DATA_SOURCE
            .captures_iter(sentence)
            .map(|c| format!("data from {}", c[1].trim())),
    );

    found.extend(
        PREDICTION
            .captures_iter(sentence)
            .map(|c| c[1].trim().to_string()),
    );

    found.extend(
        DEFINITION
            .captures_iter(sentence)
            .map(|c| format!("{} stands for {}", &c[1], c[2].trim())),
    );

    found.extend(
        CAPABILITY
            .captures_iter(sentence)
            .take(MAX_CAPABILITY_FACTS)
            .map(|c| c[1].trim().to_string())
            .filter(|cap| cap.chars().count() > 5 && !starts_with_article(cap)),
    );

    found.retain(|c| !c.is_empty());
    found
}

fn starts_with_article(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["a ", "an ", "the "].iter().any(|a| lower.starts_with(a))
}
