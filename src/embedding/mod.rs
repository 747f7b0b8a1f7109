//! Embedding capability.
//!
//! - [`Embedder`] is the seam every analysis component depends on.
//! - [`minilm`] provides the BERT sentence embedder (with a lexical stub mode).
//! - [`similarity`] provides cosine similarity and the lexical fallback vectors.

/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// MiniLM sentence embedder.
pub mod minilm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Vector math shared by all components.
pub mod similarity;
/// Tokenizer loading helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use minilm::{MINILM_EMBEDDING_DIM, MiniLmConfig, MiniLmEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use similarity::{cosine_similarity, lexical_embedding, max_similarity};

/// Text → fixed-length vector capability.
///
/// Implementations must return vectors of [`embedding_dim`](Embedder::embedding_dim)
/// floats, and `embed_batch` must return exactly one vector per input, in order.
pub trait Embedder: Send + Sync {
    /// Output vector dimension.
    fn embedding_dim(&self) -> usize;

    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds many texts in one call. Preferred over repeated [`embed`](Embedder::embed).
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts)
    }
}

/// Batch-embeds `texts` and checks the embedder kept the 1:1 alignment.
pub(crate) fn embed_aligned<E: Embedder + ?Sized>(
    embedder: &E,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let vectors = embedder.embed_batch(texts)?;
    if vectors.len() != texts.len() {
        return Err(EmbeddingError::BatchSizeMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }
    Ok(vectors)
}
