use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use super::error::LlmError;
use super::{CompletionRequest, TextCompletion};

/// [`TextCompletion`] backed by any provider `genai` can route a model name to.
///
/// Provider credentials come from the usual environment variables
/// (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, ...).
#[derive(Clone)]
pub struct GenaiCompletion {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiCompletion")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiCompletion {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextCompletion for GenaiCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            max_tokens = request.max_tokens,
            "Sending completion request"
        );

        let chat_req = ChatRequest::new(vec![
            ChatMessage::system(request.system),
            ChatMessage::user(request.prompt),
        ]);
        let options = ChatOptions::default()
            .with_max_tokens(request.max_tokens)
            .with_temperature(request.temperature);

        let response = self
            .client
            .exec_chat(&self.model, chat_req, Some(&options))
            .await?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyResponse),
        }
    }
}
