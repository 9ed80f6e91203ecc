//! A language model client bound to one model identifier.

use crate::client::{LlmClient, LlmRequest};
use docquery_core::AppResult;
use std::fmt;
use std::sync::Arc;

/// Sampling temperature used for answering; low to stay close to the context.
const ANSWER_TEMPERATURE: f32 = 0.3;

/// The active language model: a provider client plus the model it targets.
///
/// Cheap to clone; the HTTP client is shared.
#[derive(Clone)]
pub struct LanguageModel {
    name: String,
    client: Arc<dyn LlmClient>,
    max_tokens: Option<u32>,
}

impl LanguageModel {
    pub fn new(client: Arc<dyn LlmClient>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client,
            max_tokens: None,
        }
    }

    /// Cap generated tokens per answer; `None` leaves the backend default.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Model identifier this client targets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generate an answer for a fully rendered prompt.
    pub async fn invoke(&self, prompt: &str) -> AppResult<String> {
        let mut request =
            LlmRequest::new(prompt, self.name.as_str()).with_temperature(ANSWER_TEMPERATURE);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.client.complete(&request).await?;

        tracing::debug!(
            model = %self.name,
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        Ok(response.content)
    }
}

impl fmt::Debug for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageModel")
            .field("name", &self.name)
            .field("provider", &self.client.provider_name())
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
