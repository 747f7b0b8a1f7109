use super::*;
use crate::embedding::MockEmbedder;
use crate::llm::MockCompletion;
use crate::misconception::ClassificationSource;
use crate::segment::{InMemorySegmentStore, ReferenceSegment};
use std::time::Duration;

const DIM: usize = 8;
const SEG_AFST: &str = "AFST stands for Allegheny Family Screening Tool.";
const SEG_RANGE: &str = "The risk score ranges from 1 to 20.";
const SEG_SOURCES: &str = "The model uses data from 21 administrative sources.";
const NOTES: &str = "AFST is a screening tool. The risk score ranges from 1 to 5.";

fn unit(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[i] = 1.0;
    v
}

fn lecture_embedder() -> Arc<MockEmbedder> {
    Arc::new(
        MockEmbedder::new(DIM)
            // Whole notes text: reaches the first two segments.
            .with_vector(NOTES, vec![0.6, 0.5, -0.62])
            .with_vector(SEG_AFST, unit(0))
            .with_vector(SEG_AFST.trim_end_matches('.'), unit(0))
            .with_vector(SEG_RANGE, unit(1))
            .with_vector(SEG_RANGE.trim_end_matches('.'), unit(1))
            .with_vector(SEG_SOURCES, unit(2))
            .with_vector("AFST is a screening tool", unit(5))
            .with_vector("The risk score ranges from 1 to 5.", vec![0.0, 1.0, 0.0, 0.1])
            .with_vector("The risk score ranges from 1 to 5", unit(1)),
    )
}

fn lecture_store(embedder: &MockEmbedder) -> InMemorySegmentStore {
    let segments =
        ReferenceSegment::embed_all(&[SEG_AFST, SEG_RANGE, SEG_SOURCES], embedder).expect("embed");
    let store = InMemorySegmentStore::new();
    store.insert("lecture-1", segments).expect("insert");
    store
}

fn analyzer(
    embedder: Arc<MockEmbedder>,
    capabilities: Capabilities,
) -> NoteAnalyzer<MockEmbedder, InMemorySegmentStore> {
    let store = lecture_store(&embedder);
    NoteAnalyzer::new(embedder, store, capabilities)
}

#[tokio::test]
async fn test_full_analysis() {
    let embedder = lecture_embedder();
    let analyzer = analyzer(embedder.clone(), Capabilities::deterministic());

    let analysis = analyzer.analyze("lecture-1", NOTES).await.expect("analyze");

    assert_eq!(analysis.reference_id, "lecture-1");
    assert_eq!(analysis.coverage_index, 1);
    assert_eq!(analysis.covered_segments, 2);
    assert_eq!(analysis.total_segments, 3);
    assert_eq!(
        analysis.missing_concepts,
        vec!["AFST stands for Allegheny Family Screening Tool"]
    );
    assert_eq!(analysis.priority_concepts, analysis.missing_concepts);

    assert_eq!(analysis.misconceptions.len(), 1);
    let misconception = &analysis.misconceptions[0];
    assert_eq!(misconception.position, 1);
    assert_eq!(misconception.correction, SEG_RANGE);
    assert_eq!(misconception.source, ClassificationSource::Heuristic);

    // Only the notes text as a whole is embedded on its own.
    assert_eq!(embedder.single_calls(), 1);
}

#[tokio::test]
async fn test_unknown_reference() {
    let analyzer = analyzer(lecture_embedder(), Capabilities::deterministic());

    let err = analyzer.analyze("missing", NOTES).await.unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::ReferenceNotFound { ref reference_id } if reference_id == "missing"
    ));
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn test_blank_notes() {
    let embedder = lecture_embedder();
    let analyzer = analyzer(embedder.clone(), Capabilities::deterministic());
    let calls_before = embedder.batch_calls();

    let analysis = analyzer.analyze("lecture-1", "  \n ").await.expect("analyze");

    assert_eq!(analysis, NoteAnalysis::empty("lecture-1", 3));
    assert_eq!(embedder.single_calls(), 0);
    assert_eq!(embedder.batch_calls(), calls_before);
}

#[tokio::test]
async fn test_empty_document() {
    let embedder = lecture_embedder();
    let store = InMemorySegmentStore::new();
    store.insert("empty", Vec::new()).expect("insert");
    let analyzer = NoteAnalyzer::new(embedder, store, Capabilities::deterministic());

    let analysis = analyzer.analyze("empty", NOTES).await.expect("analyze");

    assert_eq!(analysis.total_segments, 0);
    assert_eq!(analysis.coverage_index, 0);
    assert!(analysis.misconceptions.is_empty());
}

#[tokio::test]
async fn test_capability_outage_degrades_to_deterministic() {
    let deterministic = analyzer(lecture_embedder(), Capabilities::deterministic())
        .analyze("lecture-1", NOTES)
        .await
        .expect("analyze");

    let mock = Arc::new(MockCompletion::failing("service unavailable"));
    let llm = LlmCapability::new(mock.clone(), Duration::from_secs(1));
    let with_outage = analyzer(lecture_embedder(), Capabilities::with_llm(llm))
        .analyze("lecture-1", NOTES)
        .await
        .expect("analyze");

    assert_eq!(with_outage, deterministic);
    assert!(mock.calls() > 0);
}

#[tokio::test]
async fn test_dimension_mismatch() {
    let segments = ReferenceSegment::embed_all(&[SEG_AFST], &MockEmbedder::new(4)).expect("embed");
    let store = InMemorySegmentStore::new();
    store.insert("lecture-1", segments).expect("insert");
    let analyzer = NoteAnalyzer::new(lecture_embedder(), store, Capabilities::deterministic());

    let err = analyzer.analyze("lecture-1", NOTES).await.unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::Embedding(EmbeddingError::Dimension(_))
    ));
}

#[tokio::test]
async fn test_priority_limit() {
    let analyzer =
        analyzer(lecture_embedder(), Capabilities::deterministic()).with_priority_limit(0);

    let analysis = analyzer.analyze("lecture-1", NOTES).await.expect("analyze");

    assert!(analysis.priority_concepts.is_empty());
    assert!(!analysis.missing_concepts.is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_share_store() {
    let analyzer = Arc::new(analyzer(lecture_embedder(), Capabilities::deterministic()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            tokio::spawn(async move { analyzer.analyze("lecture-1", NOTES).await })
        })
        .collect();

    for handle in handles {
        let analysis = handle.await.expect("join").expect("analyze");
        assert_eq!(analysis.coverage_index, 1);
    }
}

#[test]
fn test_capabilities_from_config() {
    let deterministic = Capabilities::from_config(&Config::default());
    assert!(matches!(
        deterministic.extraction,
        ExtractionBackend::Deterministic
    ));
    assert!(matches!(
        deterministic.classification,
        ClassifierBackend::Heuristic
    ));

    let config = Config {
        llm_model: Some("gpt-4o-mini".to_string()),
        llm_timeout: Duration::from_secs(7),
        ..Default::default()
    };
    let capabilities = Capabilities::from_config(&config);
    match capabilities.extraction {
        ExtractionBackend::Capability(llm) => assert_eq!(llm.timeout(), Duration::from_secs(7)),
        other => panic!("expected capability extraction, got {other:?}"),
    }
    assert!(matches!(
        capabilities.classification,
        ClassifierBackend::Capability(_)
    ));
}

#[test]
fn test_from_config_priority_limit() {
    let embedder = lecture_embedder();
    let config = Config {
        priority_limit: 2,
        ..Default::default()
    };

    let analyzer = NoteAnalyzer::from_config(embedder, InMemorySegmentStore::new(), &config);

    assert_eq!(analyzer.priority_limit(), 2);
    assert!(analyzer.store().is_empty());
}

#[test]
fn test_analysis_serializes() {
    let analysis = NoteAnalysis::empty("lecture-1", 3);
    let json = serde_json::to_value(&analysis).expect("serialize");
    assert_eq!(json["reference_id"], "lecture-1");
    assert_eq!(json["total_segments"], 3);
    assert!(json["misconceptions"].as_array().expect("array").is_empty());
}
