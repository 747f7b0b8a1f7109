//! Contradiction detection between notes and reference sentences.
//!
//! Every note sentence is paired with its most similar reference sentence. Only
//! topically related pairs (similarity above [`TOPICAL_SIMILARITY_THRESHOLD`]) are
//! classified, by the capability when one is configured and by the lexical/numeric
//! heuristic otherwise. The reference is authoritative: corrections always come
//! from the reference side.

pub mod capability;
pub mod heuristic;
mod types;


pub use heuristic::{ANTONYM_PAIRS, has_numeric_conflict, heuristic_confidence, negation_score};
pub use types::{ClassificationSource, ContradictionCandidate};

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::debug;

use crate::constants::{
    CONTRADICTION_THRESHOLD, CORRECTION_MAX_CHARS, MAX_CONCURRENT_CLASSIFICATIONS,
    MIN_SENTENCE_CHARS, TOPICAL_SIMILARITY_THRESHOLD,
};
use crate::embedding::{Embedder, EmbeddingError, embed_aligned, max_similarity};
use crate::llm::LlmCapability;
use crate::segment::ReferenceSegment;
use crate::text::{split_sentences, truncate_chars};
use types::{SentencePair, Verdict};

/// Pair classification strategy, chosen once at construction.
#[derive(Debug, Clone)]
pub enum ClassifierBackend {
    /// Ask the capability; fall back to the heuristic on any failure.
    Capability(LlmCapability),
    Heuristic,
}

#[derive(Debug)]
pub struct MisconceptionDetector<E> {
    embedder: Arc<E>,
    backend: ClassifierBackend,
    topical_threshold: f32,
    contradiction_threshold: f32,
    max_concurrent: usize,
}

impl<E> Clone for MisconceptionDetector<E> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            backend: self.backend.clone(),
            topical_threshold: self.topical_threshold,
            contradiction_threshold: self.contradiction_threshold,
            max_concurrent: self.max_concurrent,
        }
    }
}

impl<E: Embedder> MisconceptionDetector<E> {
    pub fn new(embedder: Arc<E>, backend: ClassifierBackend) -> Self {
        Self {
            embedder,
            backend,
            topical_threshold: TOPICAL_SIMILARITY_THRESHOLD,
            contradiction_threshold: CONTRADICTION_THRESHOLD,
            max_concurrent: MAX_CONCURRENT_CLASSIFICATIONS,
        }
    }

    pub fn heuristic(embedder: Arc<E>) -> Self {
        Self::new(embedder, ClassifierBackend::Heuristic)
    }

    pub fn with_capability(embedder: Arc<E>, llm: LlmCapability) -> Self {
        Self::new(embedder, ClassifierBackend::Capability(llm))
    }

    pub fn with_topical_threshold(mut self, threshold: f32) -> Self {
        self.topical_threshold = threshold;
        self
    }

    /// Heuristic scores at or above this are reported.
    pub fn with_contradiction_threshold(mut self, threshold: f32) -> Self {
        self.contradiction_threshold = threshold;
        self
    }

    /// Caps capability calls in flight for one scan. Zero is treated as one.
    pub fn with_max_concurrent_classifications(mut self, limit: usize) -> Self {
        self.max_concurrent = limit.max(1);
        self
    }

    pub fn backend(&self) -> &ClassifierBackend {
        &self.backend
    }

    /// Scans `notes` for sentences that conflict with the reference segments.
    ///
    /// All note and reference sentences are embedded in one batch. Candidates come
    /// back in note order.
    pub async fn detect_misconceptions(
        &self,
        notes: &str,
        segments: &[ReferenceSegment],
    ) -> Result<Vec<ContradictionCandidate>, EmbeddingError> {
        let note_sentences = split_sentences(notes, MIN_SENTENCE_CHARS);
        let reference_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let reference_sentences = split_sentences(&reference_text, MIN_SENTENCE_CHARS);

        if note_sentences.is_empty() || reference_sentences.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = note_sentences
            .iter()
            .chain(&reference_sentences)
            .map(String::as_str)
            .collect();
        let embeddings = embed_aligned(self.embedder.as_ref(), &texts)?;
        let (note_embeddings, reference_embeddings) = embeddings.split_at(note_sentences.len());

        let pairs: Vec<SentencePair<'_>> = note_sentences
            .iter()
            .zip(note_embeddings)
            .enumerate()
            .filter_map(|(position, (note, embedding))| {
                let (best, similarity) = max_similarity(embedding, reference_embeddings)?;
                (similarity > self.topical_threshold).then(|| SentencePair {
                    position,
                    note: note.as_str(),
                    reference: reference_sentences[best].as_str(),
                    similarity,
                })
            })
            .collect();

        let verdicts = match &self.backend {
            ClassifierBackend::Heuristic => pairs
                .iter()
                .map(|pair| self.classify_heuristic(pair))
                .collect::<Vec<_>>(),
            ClassifierBackend::Capability(llm) => {
                let requests: Vec<_> = pairs
                    .iter()
                    .map(|pair| self.classify_with_capability(llm, pair, &reference_text))
                    .collect();
                stream::iter(requests)
                    .buffered(self.max_concurrent)
                    .collect::<Vec<_>>()
                    .await
            }
        };

        let mut candidates = Vec::new();
        for (pair, verdict) in pairs.iter().zip(verdicts) {
            if let Verdict::Flagged {
                confidence,
                correction,
                source,
            } = verdict?
            {
                candidates.push(ContradictionCandidate {
                    sentence: pair.note.to_string(),
                    matched_reference_sentence: pair.reference.to_string(),
                    position: pair.position,
                    confidence_score: confidence,
                    correction,
                    source,
                });
            }
        }

        debug!(
            num_note_sentences = note_sentences.len(),
            num_reference_sentences = reference_sentences.len(),
            num_pairs = pairs.len(),
            num_flagged = candidates.len(),
            "Misconception scan complete"
        );

        Ok(candidates)
    }

    fn classify_heuristic(&self, pair: &SentencePair<'_>) -> Result<Verdict, EmbeddingError> {
        let confidence = heuristic_confidence(self.embedder.as_ref(), pair.note, pair.reference)?;
        debug!(
            position = pair.position,
            similarity = pair.similarity,
            confidence,
            "Heuristic pair score"
        );

        if confidence >= self.contradiction_threshold {
            Ok(Verdict::Flagged {
                confidence,
                correction: truncate_chars(pair.reference, CORRECTION_MAX_CHARS).to_string(),
                source: ClassificationSource::Heuristic,
            })
        } else {
            Ok(Verdict::Clear)
        }
    }

    async fn classify_with_capability(
        &self,
        llm: &LlmCapability,
        pair: &SentencePair<'_>,
        context: &str,
    ) -> Result<Verdict, EmbeddingError> {
        let request = capability::classification_request(pair.note, pair.reference, context);

        llm.ask(request, capability::parse_classification_reply)
            .await
            .map(|reply| {
                Ok(match reply {
                    None => Verdict::Clear,
                    Some(correction) => Verdict::Flagged {
                        confidence: 1.0,
                        correction: truncate_chars(&correction, CORRECTION_MAX_CHARS).to_string(),
                        source: ClassificationSource::Capability,
                    },
                })
            })
            .or_fallback("misconception_classification", || {
                self.classify_heuristic(pair)
            })
    }
}
