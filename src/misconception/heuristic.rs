//! Lexical and numeric contradiction scoring.

use crate::constants::{NEGATION_WEIGHT, NUMERIC_CONFLICT_SIMILARITY, NUMERIC_CONFLICT_WEIGHT};
use crate::embedding::{Embedder, EmbeddingError, cosine_similarity, embed_aligned};
use crate::text::{numeric_tokens, word_tokens};

/// `(negative, positive)` word pairs whose split across a pair signals a conflict.
pub const ANTONYM_PAIRS: &[(&str, &str)] = &[
    ("not", "is"),
    ("no", "yes"),
    ("never", "always"),
    ("cannot", "can"),
    ("wrong", "correct"),
    ("incorrect", "correct"),
];

/// `NEGATION_WEIGHT` for every antonym pair the two sentences disagree on.
///
/// A pair counts once, whichever sentence holds the negative side. The negative
/// word must appear in exactly one sentence and the positive word in the other,
/// so a sentence never conflicts with a copy of itself.
pub fn negation_score(note: &str, reference: &str) -> f32 {
    let note_words = word_tokens(note);
    let reference_words = word_tokens(reference);

    let matches = ANTONYM_PAIRS
        .iter()
        .filter(|(negative, positive)| {
            let note_negative = note_words.contains(*negative);
            let reference_negative = reference_words.contains(*negative);
            if note_negative == reference_negative {
                return false;
            }
            if note_negative {
                reference_words.contains(*positive)
            } else {
                note_words.contains(*positive)
            }
        })
        .count();

    matches as f32 * NEGATION_WEIGHT
}

/// Both sentences state numbers and each states one the other does not.
///
/// A note that repeats the reference's numbers and adds another is not a conflict.
pub fn has_numeric_conflict(note: &str, reference: &str) -> bool {
    let note_numbers = numeric_tokens(note);
    let reference_numbers = numeric_tokens(reference);

    if note_numbers.is_empty() || reference_numbers.is_empty() {
        return false;
    }
    !note_numbers.is_subset(&reference_numbers) && !reference_numbers.is_subset(&note_numbers)
}

/// Heuristic contradiction confidence in `[0, 1]`.
///
/// A numeric conflict only counts when the two sentences, embedded on their own,
/// are still similar enough to be about the same thing.
pub fn heuristic_confidence<E: Embedder + ?Sized>(
    embedder: &E,
    note: &str,
    reference: &str,
) -> Result<f32, EmbeddingError> {
    let mut score = negation_score(note, reference);

    if has_numeric_conflict(note, reference) {
        let pair = embed_aligned(embedder, &[note, reference])?;
        if cosine_similarity(&pair[0], &pair[1]) > NUMERIC_CONFLICT_SIMILARITY {
            score += NUMERIC_CONFLICT_WEIGHT;
        }
    }

    Ok(score.clamp(0.0, 1.0))
}
