//! Prompt types for DocQuery.

use serde::{Deserialize, Serialize};

/// Identifier of the prompt used to answer questions from retrieved context.
pub const ANSWER_PROMPT_ID: &str = "doc_query.answer";

/// Built-in answering template.
///
/// The model must answer from the supplied context only and say it does not
/// know when the context is insufficient.
const DEFAULT_ANSWER_TEMPLATE: &str = r#"Answer the following question based only on the provided context. Do not use any knowledge that is not contained in the context. If the context does not contain the answer, reply with "I don't know."

{{context}}

Question: {{question}}

Answer:
"#;

/// A prompt definition, either built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Template string with Handlebars syntax; receives `context` and `question`
    pub template: String,
}

impl PromptDefinition {
    /// The built-in answering prompt.
    pub fn default_answer() -> Self {
        Self {
            id: ANSWER_PROMPT_ID.to_string(),
            title: "Answer from retrieved context".to_string(),
            api_version: "1.0".to_string(),
            created_by: "docquery".to_string(),
            template: DEFAULT_ANSWER_TEMPLATE.to_string(),
        }
    }
}
