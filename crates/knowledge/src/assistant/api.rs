//! Boundary operations and their wire shapes.
//!
//! These are the calls a transport layer maps onto routes. Each response
//! serializes to the camelCase JSON object the transport returns.

use super::Assistant;
use crate::types::QueryAnswer;
use docquery_core::AppResult;
use serde::{Deserialize, Serialize};

/// Result of `reconfigure_retriever`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSourcesResponse {
    pub active_sources: Vec<String>,
}

/// Result of `reconfigure_model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentModelResponse {
    pub current_model: String,
}

/// Result of `get_available_models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// Result of `get_active_retrievers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieversResponse {
    pub retrievers: Vec<String>,
}

impl Assistant {
    /// `{answer}` in single mode, `{answer, sourceFiles}` in split mode.
    pub async fn answer_question(&self, question: &str) -> AppResult<QueryAnswer> {
        self.answer(question).await
    }

    pub async fn reconfigure_retriever(
        &self,
        collection_names: &[String],
    ) -> AppResult<ActiveSourcesResponse> {
        Ok(ActiveSourcesResponse {
            active_sources: self.update_retriever(collection_names).await?,
        })
    }

    pub async fn reconfigure_model(&self, model_id: &str) -> AppResult<CurrentModelResponse> {
        Ok(CurrentModelResponse {
            current_model: self.update_model(model_id).await?,
        })
    }

    pub async fn get_available_models(&self) -> ModelsResponse {
        ModelsResponse {
            models: self.list_available_models().await,
        }
    }

    pub async fn get_active_retrievers(&self) -> RetrieversResponse {
        RetrieversResponse {
            retrievers: self.list_active_retrievers().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shapes() {
        let active = ActiveSourcesResponse {
            active_sources: vec!["alpha".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&active).unwrap(),
            json!({"activeSources": ["alpha"]})
        );

        let model = CurrentModelResponse {
            current_model: "llama3.2".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({"currentModel": "llama3.2"})
        );

        let retrievers = RetrieversResponse {
            retrievers: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&retrievers).unwrap(),
            json!({"retrievers": []})
        );
    }
}
