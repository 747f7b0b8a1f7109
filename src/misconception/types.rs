use serde::{Deserialize, Serialize};

/// Which classifier produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Capability,
    Heuristic,
}

/// A note sentence that appears to conflict with its closest reference sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionCandidate {
    pub sentence: String,
    pub matched_reference_sentence: String,
    /// 0-based index among the split note sentences.
    pub position: usize,
    /// In `[0, 1]`.
    pub confidence_score: f32,
    /// Always drawn from the reference side.
    pub correction: String,
    pub source: ClassificationSource,
}

/// Outcome of classifying one note/reference pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verdict {
    Clear,
    Flagged {
        confidence: f32,
        correction: String,
        source: ClassificationSource,
    },
}

/// A note sentence paired with its most similar reference sentence.
#[derive(Debug, Clone)]
pub(crate) struct SentencePair<'a> {
    pub position: usize,
    pub note: &'a str,
    pub reference: &'a str,
    pub similarity: f32,
}
