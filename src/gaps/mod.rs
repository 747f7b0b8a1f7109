//! Paraphrase-aware gap analysis between reference concepts and note concepts.


use std::sync::Arc;

use tracing::debug;

use crate::concepts::{ConceptSet, filter_concepts};
use crate::constants::{MAX_MISSING_CONCEPTS, PARAPHRASE_SIMILARITY_THRESHOLD};
use crate::embedding::{Embedder, EmbeddingError, cosine_similarity, embed_aligned};

/// Finds reference concepts the notes do not cover, even in other words.
///
/// Exact-string difference over-reports gaps that are merely reworded, so every
/// candidate is also compared against the note concepts by embedding similarity.
#[derive(Debug)]
pub struct GapAnalyzer<E> {
    embedder: Arc<E>,
    paraphrase_threshold: f32,
    max_missing: usize,
}

impl<E> Clone for GapAnalyzer<E> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            paraphrase_threshold: self.paraphrase_threshold,
            max_missing: self.max_missing,
        }
    }
}

impl<E: Embedder> GapAnalyzer<E> {
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            embedder,
            paraphrase_threshold: PARAPHRASE_SIMILARITY_THRESHOLD,
            max_missing: MAX_MISSING_CONCEPTS,
        }
    }

    /// Candidates at or above this similarity to any note concept count as covered.
    pub fn with_paraphrase_threshold(mut self, threshold: f32) -> Self {
        self.paraphrase_threshold = threshold;
        self
    }

    pub fn with_max_missing(mut self, max_missing: usize) -> Self {
        self.max_missing = max_missing;
        self
    }

    pub fn paraphrase_threshold(&self) -> f32 {
        self.paraphrase_threshold
    }

    pub fn max_missing(&self) -> usize {
        self.max_missing
    }

    /// Reference concepts absent from the notes, in candidate (lexical) order.
    ///
    /// Both sets are filtered first. With no note concepts nothing can be a
    /// paraphrase, so the plain difference is returned (capped). Otherwise all
    /// candidates and note concepts are embedded in one batch.
    pub fn find_missing_concepts(
        &self,
        reference: &ConceptSet,
        notes: &ConceptSet,
    ) -> Result<Vec<String>, EmbeddingError> {
        let reference = filter_concepts(reference);
        let notes = filter_concepts(notes);

        let candidates: Vec<&str> = reference
            .difference(&notes)
            .map(String::as_str)
            .collect();

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        if notes.is_empty() {
            return Ok(candidates
                .into_iter()
                .take(self.max_missing)
                .map(str::to_string)
                .collect());
        }

        let texts: Vec<&str> = candidates
            .iter()
            .copied()
            .chain(notes.iter().map(String::as_str))
            .collect();
        let embeddings = embed_aligned(self.embedder.as_ref(), &texts)?;
        let (candidate_embeddings, note_embeddings) = embeddings.split_at(candidates.len());

        let missing: Vec<String> = candidates
            .iter()
            .zip(candidate_embeddings)
            .filter(|(_, embedding)| {
                let best = note_embeddings
                    .iter()
                    .map(|n| cosine_similarity(embedding, n))
                    .fold(0.0f32, f32::max);
                best < self.paraphrase_threshold
            })
            .take(self.max_missing)
            .map(|(concept, _)| concept.to_string())
            .collect();

        debug!(
            num_candidates = candidates.len(),
            num_note_concepts = notes.len(),
            num_missing = missing.len(),
            "Gap analysis complete"
        );

        Ok(missing)
    }
}
