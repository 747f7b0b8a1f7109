//! End-to-end analysis through the public API.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{
    EMBEDDING_DIM, LECTURE, LECTURE_ID, WRONG_RANGE_NOTES, lecture_store, verbatim_notes,
};
use notewise::{
    AnalysisError, Capabilities, ClassificationSource, Config, LlmCapability, MiniLmEmbedder,
    MockCompletion, MockEmbedder, NoteAnalyzer,
};

fn mock_embedder() -> Arc<MockEmbedder> {
    Arc::new(MockEmbedder::new(EMBEDDING_DIM))
}

#[tokio::test]
async fn test_verbatim_notes_cover_everything() {
    let embedder = mock_embedder();
    let analyzer = NoteAnalyzer::new(
        embedder.clone(),
        lecture_store(&embedder),
        Capabilities::deterministic(),
    );

    let analysis = analyzer
        .analyze(LECTURE_ID, &verbatim_notes())
        .await
        .expect("analyze");

    assert_eq!(analysis.coverage_index, LECTURE.len() - 1);
    assert_eq!(analysis.covered_segments, LECTURE.len());
    assert!(analysis.missing_concepts.is_empty());
    assert!(analysis.priority_concepts.is_empty());
    assert!(analysis.misconceptions.is_empty());
}

#[tokio::test]
async fn test_wrong_range_is_flagged_and_gaps_reported() {
    let embedder = mock_embedder();
    let analyzer = NoteAnalyzer::new(
        embedder.clone(),
        lecture_store(&embedder),
        Capabilities::deterministic(),
    );

    let analysis = analyzer
        .analyze(LECTURE_ID, WRONG_RANGE_NOTES)
        .await
        .expect("analyze");

    assert_eq!(analysis.misconceptions.len(), 1);
    let misconception = &analysis.misconceptions[0];
    assert_eq!(misconception.position, 1);
    assert!(misconception.confidence_score >= 0.4);
    assert_eq!(
        misconception.matched_reference_sentence,
        "The risk score ranges from 1 to 20"
    );
    assert_eq!(misconception.source, ClassificationSource::Heuristic);

    let missing = &analysis.missing_concepts;
    assert!(missing.contains(&"re-referral within two years".to_string()));
    assert!(missing.contains(&"data from 21 administrative sources".to_string()));
    // Reworded, not missing.
    assert!(!missing.contains(&"The risk score ranges from 1 to 20".to_string()));
    assert!(!missing.contains(&"AFST stands for Allegheny Family Screening Tool".to_string()));
    assert!(analysis.priority_concepts.len() <= 5);
}

#[tokio::test]
async fn test_unknown_reference_is_not_found() {
    let embedder = mock_embedder();
    let analyzer = NoteAnalyzer::new(
        embedder.clone(),
        lecture_store(&embedder),
        Capabilities::deterministic(),
    );

    let result = analyzer.analyze("other-lecture", WRONG_RANGE_NOTES).await;

    assert!(matches!(
        result,
        Err(AnalysisError::ReferenceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_unusable_capability_replies_fall_back() {
    let embedder = mock_embedder();
    // Valid for extraction, malformed for classification.
    let mock = Arc::new(MockCompletion::replying(
        r#"["The screening tool assigns a risk score to each referral"]"#,
    ));
    let llm = LlmCapability::new(mock.clone(), Duration::from_secs(5));
    let analyzer = NoteAnalyzer::new(
        embedder.clone(),
        lecture_store(&embedder),
        Capabilities::with_llm(llm),
    );

    let analysis = analyzer
        .analyze(LECTURE_ID, WRONG_RANGE_NOTES)
        .await
        .expect("analyze");

    // Both sides extract the same capability concept.
    assert!(analysis.missing_concepts.is_empty());
    assert_eq!(analysis.misconceptions.len(), 1);
    assert_eq!(
        analysis.misconceptions[0].source,
        ClassificationSource::Heuristic
    );
    assert!(mock.calls() >= 3);
}

#[tokio::test]
async fn test_stub_embedder_from_default_config() {
    let embedder = Arc::new(MiniLmEmbedder::stub());
    let config = Config::default();
    let analyzer = NoteAnalyzer::from_config(embedder.clone(), lecture_store(&embedder), &config);

    let analysis = analyzer
        .analyze(LECTURE_ID, WRONG_RANGE_NOTES)
        .await
        .expect("analyze");

    assert_eq!(analysis.total_segments, LECTURE.len());
    assert!(analysis.coverage_index < LECTURE.len());
    assert_eq!(analysis.misconceptions.len(), 1);
}

#[tokio::test]
async fn test_analysis_json_shape() {
    let embedder = mock_embedder();
    let analyzer = NoteAnalyzer::new(
        embedder.clone(),
        lecture_store(&embedder),
        Capabilities::deterministic(),
    );

    let analysis = analyzer
        .analyze(LECTURE_ID, WRONG_RANGE_NOTES)
        .await
        .expect("analyze");
    let json = serde_json::to_value(&analysis).expect("serialize");

    assert_eq!(json["reference_id"], LECTURE_ID);
    assert_eq!(json["total_segments"], LECTURE.len());
    assert_eq!(json["misconceptions"][0]["source"], "heuristic");
    assert!(json["missing_concepts"].is_array());
}
