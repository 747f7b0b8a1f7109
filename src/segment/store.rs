use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::ReferenceSegment;
use super::error::StoreError;

/// Source of previously embedded reference documents.
pub trait SegmentStore: Send + Sync {
    /// Returns the segments of `reference_id` in document order, or `None` if unknown.
    fn get_segments(
        &self,
        reference_id: &str,
    ) -> impl std::future::Future<Output = Option<Arc<[ReferenceSegment]>>> + Send;
}

/// Process-local [`SegmentStore`]. Segments are shared read-only between requests.
#[derive(Debug, Default, Clone)]
pub struct InMemorySegmentStore {
    documents: Arc<RwLock<HashMap<String, Arc<[ReferenceSegment]>>>>,
}

impl InMemorySegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the segments of `reference_id`.
    pub fn insert(
        &self,
        reference_id: &str,
        segments: Vec<ReferenceSegment>,
    ) -> Result<(), StoreError> {
        debug!(
            reference_id,
            num_segments = segments.len(),
            "Storing reference segments"
        );
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned {
                reference_id: reference_id.to_string(),
            })?;
        documents.insert(reference_id.to_string(), Arc::from(segments));
        Ok(())
    }

    // Reads recover a poisoned map: every write is a single insert, so it is
    // never left half-updated.
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, reference_id: &str) -> Option<Arc<[ReferenceSegment]>> {
        self.documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(reference_id)
            .cloned()
    }

    /// Poisons the internal lock to exercise the error path.
    #[cfg(test)]
    pub(crate) fn poison_lock(&self) {
        let documents = Arc::clone(&self.documents);
        let handle = std::thread::spawn(move || {
            let _guard = documents.write().unwrap();
            panic!("Intentional panic to poison lock for testing");
        });
        let _ = handle.join();
    }
}

impl SegmentStore for InMemorySegmentStore {
    async fn get_segments(&self, reference_id: &str) -> Option<Arc<[ReferenceSegment]>> {
        self.lookup(reference_id)
    }
}
