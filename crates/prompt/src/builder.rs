//! Prompt builder for rendering the answering template.

use crate::types::PromptDefinition;
use docquery_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

const TEMPLATE_NAME: &str = "answer";

/// A compiled answering prompt.
///
/// The template is registered once and rendered for every question/context
/// pair, so one instance serves all per-source prompts of a query.
pub struct AnswerPrompt {
    id: String,
    handlebars: Handlebars<'static>,
}

impl AnswerPrompt {
    /// Compile a prompt definition.
    pub fn new(definition: &PromptDefinition) -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Plain text prompt; no HTML escaping
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string(TEMPLATE_NAME, &definition.template)
            .map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to register template '{}': {}",
                    definition.id, e
                ))
            })?;

        tracing::debug!("Compiled prompt: {}", definition.id);

        Ok(Self {
            id: definition.id.clone(),
            handlebars,
        })
    }

    /// Identifier of the definition this prompt was compiled from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render the prompt for a question and its retrieved context.
    pub fn render(&self, question: &str, context: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("question", question);
        variables.insert("context", context);

        self.handlebars
            .render(TEMPLATE_NAME, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}

impl std::fmt::Debug for AnswerPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerPrompt").field("id", &self.id).finish()
    }
}
