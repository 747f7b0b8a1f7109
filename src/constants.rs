//! Cross-cutting, shared constants.
//!
//! Thresholds are grouped by the component that owns them. Components copy them into
//! their own configuration at construction, so callers can override per instance.
//!
//! # Dimension Invariants
//!
//! Two embeddings are only comparable when they come from the same embedder. Use
//! [`validate_embedding_dim`] at module boundaries (e.g. when segments built by one
//! embedder are analyzed with another) to catch mismatches early.

/// Output dimension of the MiniLM sentence embedder.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the embedder per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

// Coverage estimation.

/// A single segment above this similarity counts as reached.
pub const COVERAGE_SIMILARITY_THRESHOLD: f32 = 0.3;

// Concept extraction.

/// Segments are sent to the extraction capability this many at a time.
pub const EXTRACTION_GROUP_SIZE: usize = 2;

/// Max characters of reference text included in one extraction prompt.
pub const EXTRACTION_INPUT_CHARS: usize = 2500;

/// Upper bound on concepts accepted from one capability reply.
pub const MAX_CAPABILITY_CONCEPTS: usize = 40;

/// Upper bound on the length (chars) of a single capability-provided concept.
pub const MAX_CAPABILITY_CONCEPT_CHARS: usize = 300;

/// Sentences shorter than this are ignored by the deterministic extractor.
pub const MIN_EXTRACTION_SENTENCE_CHARS: usize = 12;

/// Default number of concepts returned by priority selection.
pub const DEFAULT_PRIORITY_LIMIT: usize = 5;

// Gap analysis.

/// A missing concept at or above this similarity to any note concept is a paraphrase.
pub const PARAPHRASE_SIMILARITY_THRESHOLD: f32 = 0.75;

/// Max number of missing concepts reported.
pub const MAX_MISSING_CONCEPTS: usize = 10;

// Contradiction detection.

/// Minimum length (chars) of a sentence considered by the detector.
pub const MIN_SENTENCE_CHARS: usize = 10;

/// Only note/reference pairs above this similarity are classified.
pub const TOPICAL_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Pairs with conflicting numbers must be at least this similar in isolation.
pub const NUMERIC_CONFLICT_SIMILARITY: f32 = 0.6;

/// Heuristic score at which a pair is reported as a misconception.
pub const CONTRADICTION_THRESHOLD: f32 = 0.3;

/// Score contribution of one antonym/negation pair.
pub const NEGATION_WEIGHT: f32 = 0.3;

/// Score contribution of a numeric conflict.
pub const NUMERIC_CONFLICT_WEIGHT: f32 = 0.4;

/// Max characters of a correction shown to the caller.
pub const CORRECTION_MAX_CHARS: usize = 200;

/// Max characters of reference context included in one classification prompt.
pub const CLASSIFICATION_CONTEXT_CHARS: usize = 1000;

/// Max capability classifications in flight for one notes text.
pub const MAX_CONCURRENT_CLASSIFICATIONS: usize = 8;

// Capability calls.

/// Default timeout for one text-understanding capability call.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 20;

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use notewise::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_embedding_dim_match() {
        assert!(validate_embedding_dim(384, 384).is_ok());
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(768, 384),
            Err(DimValidationError::DimensionMismatch {
                expected: 384,
                actual: 768
            })
        );
    }

    #[test]
    fn test_validate_embedding_dim_zero() {
        assert_eq!(
            validate_embedding_dim(0, 0),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::ZeroDimension;
        assert_eq!(err.to_string(), "embedding dimension cannot be zero");

        let err = DimValidationError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }
}
