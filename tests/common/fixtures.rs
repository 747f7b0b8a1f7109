//! Test fixtures for integration tests.

use std::sync::Arc;

use notewise::embedding::Embedder;
use notewise::segment::{InMemorySegmentStore, ReferenceSegment};

pub const LECTURE_ID: &str = "afst-lecture";

pub const EMBEDDING_DIM: usize = 384;

pub const LECTURE: [&str; 4] = [
    "AFST stands for Allegheny Family Screening Tool.",
    "The risk score ranges from 1 to 20.",
    "The model uses data from 21 administrative sources.",
    "AFST predicts re-referral within two years.",
];

/// Notes that restate the lecture word for word.
pub fn verbatim_notes() -> String {
    LECTURE.join(" ")
}

/// Notes with the right definition and the wrong score range.
pub const WRONG_RANGE_NOTES: &str =
    "AFST stands for Allegheny Family Screening Tool. The risk score ranges from 1 to 5.";

pub fn lecture_store<E: Embedder>(embedder: &Arc<E>) -> InMemorySegmentStore {
    let segments =
        ReferenceSegment::embed_all(&LECTURE, embedder.as_ref()).expect("embed lecture");
    let store = InMemorySegmentStore::new();
    store.insert(LECTURE_ID, segments).expect("store lecture");
    store
}
