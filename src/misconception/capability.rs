//! Capability-backed pair classification: prompt construction and reply validation.

use crate::constants::CLASSIFICATION_CONTEXT_CHARS;
use crate::llm::CompletionRequest;
use crate::text::truncate_chars;

const SYSTEM_PROMPT: &str =
    "You check student notes against lecture material. Answer in the exact format requested.";

/// Builds the classification request for one note/reference pair.
pub fn classification_request(note: &str, reference: &str, context: &str) -> CompletionRequest {
    let context = truncate_chars(context, CLASSIFICATION_CONTEXT_CHARS);
    let prompt = format!(
        r#"Lecture context:
{context}

Lecture statement: "{reference}"
Student note: "{note}"

Does the student note contradict the lecture?
Answer exactly NO if it does not.
Otherwise answer YES|<a one or two sentence correction based on the lecture>."#
    );

    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt,
        max_tokens: 120,
        temperature: 0.0,
    }
}

/// Parses `NO` or `YES|<correction>`.
///
/// Returns `Ok(None)` for no contradiction and `Ok(Some(correction))` otherwise.
/// The marker is the leading word, so `NO.` and `No, they agree` both read as
/// `NO`. Any other shape, including a blank correction, is rejected.
pub fn parse_classification_reply(reply: &str) -> Result<Option<String>, String> {
    let reply = reply.trim();
    let (head, correction) = match reply.split_once('|') {
        Some((head, correction)) => (head, Some(correction)),
        None => (reply, None),
    };
    let marker = head
        .split(|c: char| !c.is_alphabetic())
        .next()
        .unwrap_or_default();

    if marker.eq_ignore_ascii_case("no") {
        return Ok(None);
    }
    if !marker.eq_ignore_ascii_case("yes") {
        return Err(format!("unknown marker {:?}", head.trim()));
    }

    let correction = correction
        .ok_or_else(|| "expected NO or YES|<correction>".to_string())?
        .trim();
    if correction.is_empty() {
        return Err("blank correction".to_string());
    }
    Ok(Some(correction.to_string()))
}
