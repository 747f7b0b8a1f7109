//! Capability-backed concept extraction: prompt construction and reply validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::ConceptSet;
use crate::constants::{
    EXTRACTION_INPUT_CHARS, MAX_CAPABILITY_CONCEPT_CHARS, MAX_CAPABILITY_CONCEPTS,
};
use crate::llm::CompletionRequest;
use crate::text::truncate_chars;

const SYSTEM_PROMPT: &str =
    "You turn lecture material into clean, literal study facts. Reply with JSON only.";

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*").expect("valid code fence regex"));

/// Builds the extraction request for one chunk of reference text.
pub fn extraction_request(text: &str) -> CompletionRequest {
    let source = truncate_chars(text, EXTRACTION_INPUT_CHARS);
    let prompt = format!(
        r#"Extract the key facts stated in the lecture text below.

Each fact must:
- be a standalone statement of 6 to 18 words;
- state a definition, relationship, numeric range, timeframe, limitation or condition;
- keep any numbers, units and time horizons exactly as written;
- appear literally in the text (do not add outside knowledge).

Never mention people, researchers, institutions, dates, slide or page numbers.
Never output vague fragments without a claim.

Lecture text:
{source}

Answer with a JSON array of strings and nothing else, e.g.
["The screening score ranges from 1 to 20", "The model draws on data from 21 administrative sources"]"#
    );

    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt,
        max_tokens: 350,
        temperature: 0.2,
    }
}

/// Validates an extraction reply.
///
/// Accepts only a JSON array (optionally inside a Markdown code fence) of
/// 1..=[`MAX_CAPABILITY_CONCEPTS`] non-blank strings, each at most
/// [`MAX_CAPABILITY_CONCEPT_CHARS`] characters.
pub fn parse_concept_reply(reply: &str) -> Result<ConceptSet, String> {
    let unfenced = CODE_FENCE.replace_all(reply.trim(), "");
    let value: Value =
        serde_json::from_str(unfenced.trim()).map_err(|e| format!("invalid JSON: {e}"))?;

    let items = value
        .as_array()
        .ok_or_else(|| "expected a JSON array".to_string())?;

    if items.is_empty() {
        return Err("empty concept array".to_string());
    }
    if items.len() > MAX_CAPABILITY_CONCEPTS {
        return Err(format!(
            "{} concepts exceeds limit of {}",
            items.len(),
            MAX_CAPABILITY_CONCEPTS
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let text = item
                .as_str()
                .ok_or_else(|| format!("item {i} is not a string"))?
                .trim();
            if text.is_empty() {
                return Err(format!("item {i} is blank"));
            }
            if text.chars().count() > MAX_CAPABILITY_CONCEPT_CHARS {
                return Err(format!("item {i} is too long"));
            }
            Ok(text.to_string())
        })
        .collect()
}
