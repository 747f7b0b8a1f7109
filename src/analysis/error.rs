use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Errors returned by [`NoteAnalyzer`](super::NoteAnalyzer).
///
/// Capability failures never show up here; they fall back to the deterministic paths.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The reference document is not in the store.
    #[error("reference not found: {reference_id}")]
    ReferenceNotFound { reference_id: String },

    /// Embedding the notes or their sentences failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Convenience result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
