use std::cmp::Reverse;

const PRIORITY_KEYWORDS: &[&str] = &["predict", "risk", "score", "uses", "based", "model"];

/// Informativeness score: digits weigh most, then length in words, then keywords.
pub fn priority_score(concept: &str) -> u32 {
    let mut score = 0;
    if concept.chars().any(|c| c.is_ascii_digit()) {
        score += 3;
    }
    if concept.split_whitespace().count() >= 4 {
        score += 2;
    }
    let lower = concept.to_lowercase();
    if PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        score += 1;
    }
    score
}

/// Returns the `limit` most informative concepts, best first.
///
/// Ties on [`priority_score`] go to the longer concept, then to lexical order.
pub fn select_priority_concepts<I, S>(concepts: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ranked: Vec<String> = concepts
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .collect();

    ranked.sort_by_cached_key(|c| (Reverse(priority_score(c)), Reverse(c.chars().count()), c.clone()));
    ranked.dedup();
    ranked.truncate(limit);
    ranked
}
