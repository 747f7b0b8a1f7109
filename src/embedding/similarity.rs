use std::hash::{DefaultHasher, Hash, Hasher};

/// Cosine similarity between two vectors.
///
/// Returns `0.0` when either vector has zero norm or the lengths differ.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Finds the candidate most similar to `query`.
///
/// Only strictly positive similarities count, and a later candidate must be strictly
/// more similar to replace an earlier one. Returns `None` when no candidate is
/// positively similar.
pub fn max_similarity<V: AsRef<[f32]>>(query: &[f32], candidates: &[V]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let similarity = cosine_similarity(query, candidate.as_ref());
        let current = best.map_or(0.0, |(_, s)| s);
        if similarity > current {
            best = Some((idx, similarity));
        }
    }
    best
}

/// Deterministic bag-of-words embedding.
///
/// Each lower-cased alphanumeric token is hashed into one of `dim` buckets and the
/// resulting count vector is L2-normalized. Texts sharing most of their words get a
/// high cosine similarity, which is enough to run the pipeline without model files.
pub fn lexical_embedding(text: &str, dim: usize) -> Vec<f32> {
    let mut embedding = vec![0.0f32; dim];
    if dim == 0 {
        return embedding;
    }

    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        token.to_lowercase().hash(&mut hasher);
        let bucket = (hasher.finish() % dim as u64) as usize;
        embedding[bucket] += 1.0;
    }

    normalize(&mut embedding);
    embedding
}

/// L2-normalizes `embedding` in place (zero vectors are left untouched).
pub(crate) fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
