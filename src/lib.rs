//! Notewise library crate (used by the CLI and integration tests).
//!
//! Measures a notes text against a reference document made of ordered segments
//! (e.g. lecture slides): how far the notes reach, which reference concepts they
//! miss, and which note sentences contradict the reference.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`NoteAnalyzer`], [`NoteAnalysis`], [`Capabilities`] - End-to-end analysis
//! - [`Config`], [`ConfigError`] - Environment configuration
//!
//! ## Components
//! - [`estimate_coverage`] - Furthest segment reached
//! - [`ConceptExtractor`], [`filter_concepts`], [`select_priority_concepts`] - Concepts
//! - [`GapAnalyzer`] - Paraphrase-aware missing concepts
//! - [`MisconceptionDetector`], [`ContradictionCandidate`] - Contradictions
//!
//! ## Capabilities
//! - [`Embedder`], [`MiniLmEmbedder`] - Text embeddings
//! - [`SegmentStore`], [`InMemorySegmentStore`] - Reference segments
//! - [`TextCompletion`], [`GenaiCompletion`], [`LlmCapability`] - Optional LLM backend
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod concepts;
pub mod config;
pub mod constants;
pub mod coverage;
pub mod embedding;
pub mod gaps;
pub mod llm;
pub mod misconception;
pub mod segment;
pub mod text;

pub use analysis::{AnalysisError, AnalysisResult, Capabilities, NoteAnalysis, NoteAnalyzer};
pub use concepts::{
    Concept, ConceptExtractor, ConceptSet, ExtractionBackend, filter_concepts,
    select_priority_concepts,
};
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use coverage::{covered_segments, estimate_coverage, query_similarities, similarity_matrix};
pub use embedding::{
    Embedder, EmbeddingError, MINILM_EMBEDDING_DIM, MiniLmConfig, MiniLmEmbedder,
    cosine_similarity,
};
pub use gaps::GapAnalyzer;
pub use llm::{
    CapabilityOutcome, CompletionRequest, FallbackReason, GenaiCompletion, LlmCapability,
    LlmError, TextCompletion,
};
pub use misconception::{
    ClassificationSource, ClassifierBackend, ContradictionCandidate, MisconceptionDetector,
};
pub use segment::{InMemorySegmentStore, ReferenceSegment, SegmentStore, StoreError};

#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use llm::MockCompletion;
