use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("upstream completion failed: {reason}")]
    Upstream { reason: String },

    #[error("completion returned no text")]
    EmptyResponse,
}

impl From<genai::Error> for LlmError {
    fn from(err: genai::Error) -> Self {
        LlmError::Upstream {
            reason: err.to_string(),
        }
    }
}
