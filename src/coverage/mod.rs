//! Coverage estimation: how far into the reference document the notes have reached.
//!
//! Two heuristics each propose a segment index and the larger one wins:
//!
//! - **Cumulative best**: the prefix `0..=i` whose summed similarity is highest.
//!   Sustained moderate relevance across many segments still counts.
//! - **Threshold**: the last segment whose own similarity exceeds
//!   [`COVERAGE_SIMILARITY_THRESHOLD`]. One strong late match is never under-reported.


use tracing::debug;

use crate::constants::COVERAGE_SIMILARITY_THRESHOLD;
use crate::embedding::cosine_similarity;
use crate::segment::ReferenceSegment;

/// Returns the furthest segment index reached, given per-segment similarities.
///
/// `similarities` is aligned 1:1 with `segments`; surplus entries on either side are
/// ignored. Always in `0..segments.len()`, and `0` for an empty document.
pub fn estimate_coverage(segments: &[ReferenceSegment], similarities: &[f32]) -> usize {
    estimate_coverage_with_threshold(segments, similarities, COVERAGE_SIMILARITY_THRESHOLD)
}

/// [`estimate_coverage`] with an explicit per-segment threshold.
pub fn estimate_coverage_with_threshold(
    segments: &[ReferenceSegment],
    similarities: &[f32],
    threshold: f32,
) -> usize {
    let mut running_sum = 0.0f32;
    let mut best_sum = 0.0f32;
    let mut best_prefix = 0usize;
    let mut last_above = 0usize;

    for (i, (_, &similarity)) in segments.iter().zip(similarities).enumerate() {
        running_sum += similarity;
        // Strict: an equal later sum keeps the earlier index.
        if running_sum > best_sum {
            best_sum = running_sum;
            best_prefix = i;
        }
        if similarity > threshold {
            last_above = i;
        }
    }

    let index = best_prefix.max(last_above);
    debug!(
        num_segments = segments.len(),
        best_prefix, last_above, index, "Estimated coverage"
    );
    index
}

/// Cosine similarity of `query` to every segment embedding, in document order.
pub fn query_similarities(segments: &[ReferenceSegment], query: &[f32]) -> Vec<f32> {
    segments
        .iter()
        .map(|s| cosine_similarity(&s.embedding, query))
        .collect()
}

/// The covered prefix `0..=index`, clamped to the document.
pub fn covered_segments(segments: &[ReferenceSegment], index: usize) -> &[ReferenceSegment] {
    let end = index.saturating_add(1).min(segments.len());
    &segments[..end]
}

/// Segment × note-chunk similarity matrix (`matrix[segment][chunk]`).
pub fn similarity_matrix<V: AsRef<[f32]>>(
    segments: &[ReferenceSegment],
    note_embeddings: &[V],
) -> Vec<Vec<f32>> {
    segments
        .iter()
        .map(|s| {
            note_embeddings
                .iter()
                .map(|n| cosine_similarity(&s.embedding, n.as_ref()))
                .collect()
        })
        .collect()
}
