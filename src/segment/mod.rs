//! Reference segments and the read-only store that serves them.

mod error;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use store::{InMemorySegmentStore, SegmentStore};

use serde::{Deserialize, Serialize};

use crate::embedding::{EmbeddingError, Embedder, embed_aligned};

/// One unit of the reference document (e.g. one slide).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSegment {
    /// 0-based position in document order.
    pub index: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl ReferenceSegment {
    pub fn new(index: usize, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            index,
            text: text.into(),
            embedding,
        }
    }

    /// Builds the segments of one document, embedding every text in a single batch.
    pub fn embed_all<E, S>(texts: &[S], embedder: &E) -> Result<Vec<Self>, EmbeddingError>
    where
        E: Embedder + ?Sized,
        S: AsRef<str>,
    {
        let refs: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();
        let embeddings = embed_aligned(embedder, &refs)?;

        Ok(refs
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (text, embedding))| Self::new(index, text, embedding))
            .collect())
    }
}
