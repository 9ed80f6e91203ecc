//! Assistant state records.

use crate::rag::EnsembleRetriever;
use docquery_llm::LanguageModel;
use std::sync::Arc;

/// The active `(model, retriever)` pair.
///
/// Immutable once built. Reconfiguration builds a new snapshot and swaps it
/// in whole, so a reader holding one never sees a half-applied change.
#[derive(Debug, Clone, Default)]
pub struct AssistantSnapshot {
    model: Option<LanguageModel>,
    retriever: Option<Arc<EnsembleRetriever>>,
}

impl AssistantSnapshot {
    pub fn new(model: Option<LanguageModel>, retriever: Option<Arc<EnsembleRetriever>>) -> Self {
        Self { model, retriever }
    }

    pub fn model(&self) -> Option<&LanguageModel> {
        self.model.as_ref()
    }

    pub fn retriever(&self) -> Option<&EnsembleRetriever> {
        self.retriever.as_deref()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(LanguageModel::name)
    }

    /// Names composing the retriever; empty when there is none.
    pub fn source_names(&self) -> Vec<String> {
        self.retriever
            .as_ref()
            .map(|r| r.source_names())
            .unwrap_or_default()
    }

    /// Ready means a retriever is configured.
    pub fn is_ready(&self) -> bool {
        self.retriever.is_some()
    }

    pub(crate) fn with_model(&self, model: LanguageModel) -> Self {
        Self {
            model: Some(model),
            retriever: self.retriever.clone(),
        }
    }

    pub(crate) fn with_retriever(&self, retriever: Option<Arc<EnsembleRetriever>>) -> Self {
        Self {
            model: self.model.clone(),
            retriever,
        }
    }
}

/// Everything guarded by the assistant's lock.
#[derive(Debug, Default)]
pub(crate) struct AssistantState {
    pub(crate) snapshot: Arc<AssistantSnapshot>,

    /// Result of the last model probe
    pub(crate) available_models: Vec<String>,
}
