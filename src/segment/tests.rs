use super::*;
use crate::embedding::MockEmbedder;

#[test]
fn test_embed_all_assigns_document_order() {
    let embedder = MockEmbedder::new(32);
    let texts = ["Intro to X", "X has property A", "X causes Y in 6 months"];

    let segments = ReferenceSegment::embed_all(&texts, &embedder).expect("embed");

    assert_eq!(segments.len(), 3);
    for (i, segment) in segments.iter().enumerate() {
        assert_eq!(segment.index, i);
        assert_eq!(segment.text, texts[i]);
        assert_eq!(segment.embedding.len(), 32);
    }
}

#[test]
fn test_embed_all_uses_one_batch() {
    let embedder = MockEmbedder::new(16);
    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    ReferenceSegment::embed_all(&texts, &embedder).expect("embed");

    assert_eq!(embedder.batch_calls(), 1);
    assert_eq!(embedder.single_calls(), 0);
}

#[test]
fn test_embed_all_empty_skips_embedder() {
    let embedder = MockEmbedder::new(16);
    let segments = ReferenceSegment::embed_all::<_, &str>(&[], &embedder).expect("embed");
    assert!(segments.is_empty());
    assert_eq!(embedder.batch_calls(), 0);
}

#[test]
fn test_embed_all_propagates_embedder_failure() {
    let embedder = MockEmbedder::new(16).failing("model offline");
    let result = ReferenceSegment::embed_all(&["slide"], &embedder);
    assert!(matches!(result, Err(EmbeddingError::InferenceFailed { .. })));
}

#[tokio::test]
async fn test_store_roundtrip() {
    let store = InMemorySegmentStore::new();
    assert!(store.is_empty());

    let segments = vec![
        ReferenceSegment::new(0, "first", vec![1.0, 0.0]),
        ReferenceSegment::new(1, "second", vec![0.0, 1.0]),
    ];
    store.insert("lecture-1", segments.clone()).expect("insert");

    let loaded = store.get_segments("lecture-1").await.expect("present");
    assert_eq!(&loaded[..], &segments[..]);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_store_unknown_reference_is_none() {
    let store = InMemorySegmentStore::new();
    assert!(store.get_segments("missing").await.is_none());
}

#[tokio::test]
async fn test_store_clones_share_documents() {
    let store = InMemorySegmentStore::new();
    let handle = store.clone();
    store
        .insert("doc", vec![ReferenceSegment::new(0, "only", vec![1.0])])
        .expect("insert");

    assert!(handle.get_segments("doc").await.is_some());
}

#[tokio::test]
async fn test_insert_into_poisoned_store_is_an_error() {
    let store = InMemorySegmentStore::new();
    store
        .insert("kept", vec![ReferenceSegment::new(0, "first", vec![1.0])])
        .expect("insert");
    store.poison_lock();

    let err = store
        .insert("dropped", vec![ReferenceSegment::new(0, "other", vec![1.0])])
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::LockPoisoned { ref reference_id } if reference_id == "dropped"
    ));
    assert!(err.to_string().contains("dropped"));
    // Earlier documents stay readable.
    assert_eq!(store.len(), 1);
    assert!(store.get_segments("kept").await.is_some());
    assert!(store.get_segments("dropped").await.is_none());
}
