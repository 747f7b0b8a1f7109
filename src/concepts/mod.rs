//! Concept extraction, filtering and prioritization.
//!
//! A concept is a short factual statement. [`ConceptExtractor`] produces them either
//! through the text-understanding capability or through the deterministic rules in
//! [`patterns`]; the strategy is fixed when the extractor is built. Every extracted
//! set goes through [`filter_concepts`] before it is returned.

pub mod capability;
pub mod filter;
pub mod patterns;
pub mod priority;


pub use filter::{clean_concept, filter_concepts};
pub use patterns::extract_deterministic;
pub use priority::{priority_score, select_priority_concepts};

use std::collections::BTreeSet;

use tracing::debug;

use crate::constants::EXTRACTION_GROUP_SIZE;
use crate::llm::LlmCapability;
use crate::segment::ReferenceSegment;

/// A short, self-contained factual statement.
pub type Concept = String;

/// Concepts compared by exact string; iteration order is lexical.
pub type ConceptSet = BTreeSet<Concept>;

/// Extraction strategy, chosen once at construction.
#[derive(Debug, Clone)]
pub enum ExtractionBackend {
    /// Ask the capability; fall back to the deterministic rules on any failure.
    Capability(LlmCapability),
    /// Deterministic rules only.
    Deterministic,
}

#[derive(Debug, Clone)]
pub struct ConceptExtractor {
    backend: ExtractionBackend,
}

impl Default for ConceptExtractor {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl ConceptExtractor {
    pub fn new(backend: ExtractionBackend) -> Self {
        Self { backend }
    }

    pub fn deterministic() -> Self {
        Self::new(ExtractionBackend::Deterministic)
    }

    pub fn with_capability(llm: LlmCapability) -> Self {
        Self::new(ExtractionBackend::Capability(llm))
    }

    pub fn backend(&self) -> &ExtractionBackend {
        &self.backend
    }

    /// Extracts concepts from reference segments, [`EXTRACTION_GROUP_SIZE`] at a time.
    pub async fn extract_concepts(&self, segments: &[ReferenceSegment]) -> ConceptSet {
        let mut concepts = ConceptSet::new();

        for group in segments.chunks(EXTRACTION_GROUP_SIZE) {
            let group_text = group
                .iter()
                .map(|s| s.text.as_str())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n");
            if group_text.trim().is_empty() {
                continue;
            }

            concepts.extend(self.extract_raw(&group_text).await);
        }

        let filtered = filter_concepts(&concepts);
        debug!(
            num_segments = segments.len(),
            raw = concepts.len(),
            kept = filtered.len(),
            "Extracted reference concepts"
        );
        filtered
    }

    /// Extracts concepts from free text (e.g. notes).
    pub async fn extract_concepts_from_text(&self, text: &str) -> ConceptSet {
        if text.trim().is_empty() {
            return ConceptSet::new();
        }

        let raw = self.extract_raw(text).await;
        filter_concepts(&raw)
    }

    async fn extract_raw(&self, text: &str) -> ConceptSet {
        match &self.backend {
            ExtractionBackend::Deterministic => extract_deterministic(text),
            ExtractionBackend::Capability(llm) => llm
                .ask(
                    capability::extraction_request(text),
                    capability::parse_concept_reply,
                )
                .await
                .or_fallback("concept_extraction", || extract_deterministic(text)),
        }
    }
}
