//! End-to-end notes analysis against one stored reference document.
//!
//! [`NoteAnalyzer::analyze`] runs the full flow:
//!
//! 1. embed the notes and estimate how far into the reference they reach;
//! 2. extract concepts from the covered segments and from the notes;
//! 3. report reference concepts missing from the notes, with priority hints;
//! 4. scan the notes for sentences that contradict the covered segments.

mod error;

#[cfg(test)]
mod tests;

pub use error::{AnalysisError, AnalysisResult};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::concepts::{ConceptExtractor, ExtractionBackend, select_priority_concepts};
use crate::config::Config;
use crate::constants::{DEFAULT_PRIORITY_LIMIT, validate_embedding_dim};
use crate::coverage::{covered_segments, estimate_coverage, query_similarities};
use crate::embedding::{Embedder, EmbeddingError};
use crate::gaps::GapAnalyzer;
use crate::llm::{GenaiCompletion, LlmCapability};
use crate::misconception::{ClassifierBackend, ContradictionCandidate, MisconceptionDetector};
use crate::segment::SegmentStore;

/// Result of analyzing one notes text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteAnalysis {
    pub reference_id: String,
    /// Furthest segment reached.
    pub coverage_index: usize,
    /// Segments `0..=coverage_index`, or 0 for blank notes.
    pub covered_segments: usize,
    pub total_segments: usize,
    pub missing_concepts: Vec<String>,
    /// Most informative missing concepts, best first.
    pub priority_concepts: Vec<String>,
    pub misconceptions: Vec<ContradictionCandidate>,
}

impl NoteAnalysis {
    fn empty(reference_id: &str, total_segments: usize) -> Self {
        Self {
            reference_id: reference_id.to_string(),
            coverage_index: 0,
            covered_segments: 0,
            total_segments,
            missing_concepts: Vec::new(),
            priority_concepts: Vec::new(),
            misconceptions: Vec::new(),
        }
    }
}

/// Strategy choice for both capability-backed components, made once.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub extraction: ExtractionBackend,
    pub classification: ClassifierBackend,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl Capabilities {
    pub fn deterministic() -> Self {
        Self {
            extraction: ExtractionBackend::Deterministic,
            classification: ClassifierBackend::Heuristic,
        }
    }

    /// Uses `llm` for both extraction and classification.
    pub fn with_llm(llm: LlmCapability) -> Self {
        Self {
            extraction: ExtractionBackend::Capability(llm.clone()),
            classification: ClassifierBackend::Capability(llm),
        }
    }

    /// Capability-backed when `NOTEWISE_LLM_MODEL` is set, deterministic otherwise.
    pub fn from_config(config: &Config) -> Self {
        match &config.llm_model {
            Some(model) => {
                info!(model = %model, timeout_secs = config.llm_timeout.as_secs(), "Capability backend enabled");
                let completion = Arc::new(GenaiCompletion::new(model.clone()));
                Self::with_llm(LlmCapability::new(completion, config.llm_timeout))
            }
            None => {
                info!("No capability model configured, using deterministic strategies");
                Self::deterministic()
            }
        }
    }
}

pub struct NoteAnalyzer<E: Embedder, S: SegmentStore> {
    embedder: Arc<E>,
    store: S,
    extractor: ConceptExtractor,
    gaps: GapAnalyzer<E>,
    detector: MisconceptionDetector<E>,
    priority_limit: usize,
}

impl<E: Embedder, S: SegmentStore> std::fmt::Debug for NoteAnalyzer<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteAnalyzer")
            .field("extractor", &self.extractor)
            .field("priority_limit", &self.priority_limit)
            .finish_non_exhaustive()
    }
}

impl<E: Embedder, S: SegmentStore> NoteAnalyzer<E, S> {
    pub fn new(embedder: Arc<E>, store: S, capabilities: Capabilities) -> Self {
        Self {
            extractor: ConceptExtractor::new(capabilities.extraction),
            gaps: GapAnalyzer::new(Arc::clone(&embedder)),
            detector: MisconceptionDetector::new(
                Arc::clone(&embedder),
                capabilities.classification,
            ),
            embedder,
            store,
            priority_limit: DEFAULT_PRIORITY_LIMIT,
        }
    }

    /// Builds the analyzer described by `config` (strategies and priority limit).
    pub fn from_config(embedder: Arc<E>, store: S, config: &Config) -> Self {
        Self::new(embedder, store, Capabilities::from_config(config))
            .with_priority_limit(config.priority_limit)
    }

    pub fn with_priority_limit(mut self, limit: usize) -> Self {
        self.priority_limit = limit;
        self
    }

    pub fn with_gap_analyzer(mut self, gaps: GapAnalyzer<E>) -> Self {
        self.gaps = gaps;
        self
    }

    pub fn with_detector(mut self, detector: MisconceptionDetector<E>) -> Self {
        self.detector = detector;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn priority_limit(&self) -> usize {
        self.priority_limit
    }

    /// Analyzes `notes` against the stored reference `reference_id`.
    ///
    /// Unknown references are the only hard failure besides embedding errors.
    #[instrument(skip(self, notes), fields(notes_len = notes.len()))]
    pub async fn analyze(&self, reference_id: &str, notes: &str) -> AnalysisResult<NoteAnalysis> {
        let segments = self.store.get_segments(reference_id).await.ok_or_else(|| {
            AnalysisError::ReferenceNotFound {
                reference_id: reference_id.to_string(),
            }
        })?;

        if notes.trim().is_empty() || segments.is_empty() {
            debug!(
                num_segments = segments.len(),
                "Nothing to analyze, returning empty result"
            );
            return Ok(NoteAnalysis::empty(reference_id, segments.len()));
        }

        let notes_embedding = self.embedder.embed(notes)?;
        validate_embedding_dim(notes_embedding.len(), segments[0].embedding.len())
            .map_err(EmbeddingError::from)?;

        let similarities = query_similarities(&segments, &notes_embedding);
        let coverage_index = estimate_coverage(&segments, &similarities);
        let covered = covered_segments(&segments, coverage_index);

        let (reference_concepts, note_concepts) = tokio::join!(
            self.extractor.extract_concepts(covered),
            self.extractor.extract_concepts_from_text(notes),
        );

        let missing_concepts = self
            .gaps
            .find_missing_concepts(&reference_concepts, &note_concepts)?;
        let priority_concepts = select_priority_concepts(&missing_concepts, self.priority_limit);

        let misconceptions = self.detector.detect_misconceptions(notes, covered).await?;

        info!(
            coverage_index,
            covered = covered.len(),
            total = segments.len(),
            reference_concepts = reference_concepts.len(),
            note_concepts = note_concepts.len(),
            missing = missing_concepts.len(),
            misconceptions = misconceptions.len(),
            "Notes analyzed"
        );

        Ok(NoteAnalysis {
            reference_id: reference_id.to_string(),
            coverage_index,
            covered_segments: covered.len(),
            total_segments: segments.len(),
            missing_concepts,
            priority_concepts,
            misconceptions,
        })
    }
}
