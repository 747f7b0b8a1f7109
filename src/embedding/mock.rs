use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::EmbeddingError;
use super::similarity::lexical_embedding;
use super::Embedder;

/// Embedder double with pinned vectors and call accounting.
///
/// Texts registered with [`with_vector`](MockEmbedder::with_vector) get exactly that
/// vector; everything else gets a [`lexical_embedding`].
#[derive(Debug, Default)]
pub struct MockEmbedder {
    dim: usize,
    pinned: HashMap<String, Vec<f32>>,
    fail_with: Option<String>,
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    embedded_texts: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Default::default()
        }
    }

    /// Pins the vector returned for `text`. The vector is padded/truncated to `dim`.
    pub fn with_vector(mut self, text: &str, mut vector: Vec<f32>) -> Self {
        vector.resize(self.dim, 0.0);
        self.pinned.insert(text.to_string(), vector);
        self
    }

    /// Makes every call fail with an inference error.
    pub fn failing(mut self, reason: &str) -> Self {
        self.fail_with = Some(reason.to_string());
        self
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Total number of texts embedded across all calls.
    pub fn embedded_texts(&self) -> usize {
        self.embedded_texts.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if let Some(reason) = &self.fail_with {
            return Err(EmbeddingError::InferenceFailed {
                reason: reason.clone(),
            });
        }
        self.embedded_texts.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pinned
            .get(text)
            .cloned()
            .unwrap_or_else(|| lexical_embedding(text, self.dim)))
    }
}

impl Embedder for MockEmbedder {
    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.vector_for(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        texts.iter().map(|text| self.vector_for(text)).collect()
    }
}
