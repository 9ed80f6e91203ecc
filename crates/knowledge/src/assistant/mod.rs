//! Assistant state manager.
//!
//! Owns the process-wide answering configuration: the active language model,
//! the active ensemble of retrieval sources, and the set of models the backend
//! last reported. All of it lives behind one lock; the model and retriever are
//! kept together in an immutable [`AssistantSnapshot`] that is replaced whole
//! on every reconfiguration. Readers clone the snapshot handle and release the
//! lock before doing any I/O.

pub mod api;
pub mod state;

pub use api::{ActiveSourcesResponse, CurrentModelResponse, ModelsResponse, RetrieversResponse};
pub use state::AssistantSnapshot;

use crate::embeddings::OllamaEmbedder;
use crate::rag::{EnsembleRetriever, SynthesisEngine};
use crate::source::RetrievalSource;
use crate::store::{CollectionStore, FsCollectionStore};
use crate::types::QueryAnswer;
use docquery_core::{AppConfig, AppError, AppResult};
use docquery_llm::{create_backend, LanguageModel, LlmBackend, LlmClient, ModelProbe};
use docquery_prompt::{resolve_prompt, AnswerPrompt, PromptDefinition, ANSWER_PROMPT_ID};
use state::AssistantState;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Fixed parameters of an assistant.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    /// Passages each source returns per question
    pub top_k: usize,

    /// Model selected by `initialize` when the backend serves it
    pub preferred_model: Option<String>,

    /// Cap on generated tokens per model call
    pub max_tokens: Option<u32>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            top_k: crate::source::DEFAULT_TOP_K,
            preferred_model: None,
            max_tokens: None,
        }
    }
}

/// The single coordination point for answering and reconfiguration.
pub struct Assistant {
    client: Arc<dyn LlmClient>,
    probe: ModelProbe,
    store: Arc<dyn CollectionStore>,
    engine: SynthesisEngine,
    settings: AssistantSettings,
    state: RwLock<AssistantState>,
}

impl Assistant {
    /// Create an assistant with no model and no retriever.
    ///
    /// Call [`Assistant::initialize`] before answering.
    pub fn new(
        backend: LlmBackend,
        store: Arc<dyn CollectionStore>,
        engine: SynthesisEngine,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            client: backend.client,
            probe: ModelProbe::new(backend.catalog),
            store,
            engine,
            settings,
            state: RwLock::new(AssistantState::default()),
        }
    }

    /// Build an assistant wired to the configured backend and data directory.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let backend = create_backend(config)?;

        let embedder = Arc::new(OllamaEmbedder::new(
            config.endpoint.as_str(),
            config.embedding_model.as_str(),
            Duration::from_secs(config.timeout_secs),
        )?);
        let store = Arc::new(FsCollectionStore::new(config.vectorstores_dir(), embedder));

        let definition = resolve_prompt(
            &config.prompts_dir(),
            ANSWER_PROMPT_ID,
            PromptDefinition::default_answer(),
        )?;
        let engine = SynthesisEngine::new(
            AnswerPrompt::new(&definition)?,
            config.mode,
            config.label_prefix_len,
        );

        tracing::debug!(
            "Assistant uses {:?} with {} mode",
            config.vectorstores_dir(),
            config.mode
        );

        Ok(Self::new(
            backend,
            store,
            engine,
            AssistantSettings {
                top_k: config.top_k,
                preferred_model: Some(config.model.clone()),
                max_tokens: config.max_tokens,
            },
        ))
    }

    /// Probe models and collections and install the startup configuration.
    ///
    /// Selects the default model and builds a retriever over every persisted
    /// collection. Safe to call again; with unchanged storage and backend the
    /// resulting state is the same.
    pub async fn initialize(&self) -> AppResult<()> {
        let models = self.probe.list_models().await;
        let model = select_default_model(&models, self.settings.preferred_model.as_deref())
            .map(|name| self.bind_model(name));

        let collections = self.store.list_collections().await?;
        let mut sources = Vec::with_capacity(collections.len());
        for name in &collections {
            match self.store.load_collection(name, self.settings.top_k).await {
                Ok(source) => sources.push(source),
                Err(e) => tracing::warn!("Skipping collection '{}': {}", name, e),
            }
        }
        let retriever = EnsembleRetriever::combine(sources).map(Arc::new);

        let snapshot = AssistantSnapshot::new(model, retriever);
        tracing::info!(
            "Assistant initialized: model {:?}, {} models available, sources {:?}",
            snapshot.model_name(),
            models.len(),
            snapshot.source_names()
        );

        let mut state = self.state.write().await;
        state.available_models = models;
        state.snapshot = Arc::new(snapshot);

        Ok(())
    }

    /// The current `(model, retriever)` pair.
    pub async fn snapshot(&self) -> Arc<AssistantSnapshot> {
        self.state.read().await.snapshot.clone()
    }

    /// Answer a question with the pair active when the call starts.
    ///
    /// # Errors
    /// * `AppError::NotInitialized` - No retriever or no model is configured
    /// * `AppError::Backend` - A source or model call failed
    pub async fn answer(&self, question: &str) -> AppResult<QueryAnswer> {
        let snapshot = self.snapshot().await;

        tracing::debug!(
            "Answering with model {:?} over {:?}",
            snapshot.model_name(),
            snapshot.source_names()
        );

        self.engine
            .run(snapshot.retriever(), snapshot.model(), question)
            .await
    }

    /// Replace the retriever with one built from `names`.
    ///
    /// Names not present in persisted storage are dropped with a warning.
    /// An empty list clears the retriever. Returns the active source names.
    ///
    /// # Errors
    /// * `AppError::SourceUnavailable` - Names were given but none exist; the
    ///   current retriever is kept
    pub async fn update_retriever(&self, names: &[String]) -> AppResult<Vec<String>> {
        let mut seen = HashSet::new();
        let requested: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect();

        let retriever = if requested.is_empty() {
            None
        } else {
            let persisted: HashSet<String> =
                self.store.list_collections().await?.into_iter().collect();

            let mut sources: Vec<Arc<dyn RetrievalSource>> = Vec::with_capacity(requested.len());
            for name in requested {
                if !persisted.contains(name) {
                    tracing::warn!("Dropping stale collection '{}': not in persisted storage", name);
                    continue;
                }
                sources.push(self.store.load_collection(name, self.settings.top_k).await?);
            }

            match EnsembleRetriever::combine(sources) {
                Some(retriever) => Some(Arc::new(retriever)),
                None => {
                    return Err(AppError::SourceUnavailable(format!(
                        "None of the requested collections exist: {}",
                        names.join(", ")
                    )))
                }
            }
        };

        let mut state = self.state.write().await;
        state.snapshot = Arc::new(state.snapshot.with_retriever(retriever));
        let active = state.snapshot.source_names();

        tracing::info!("Active sources: {:?}", active);
        Ok(active)
    }

    /// Switch to `model_id`, which must be in the last probed model set.
    ///
    /// # Errors
    /// * `AppError::ModelNotAvailable` - The model was not reported by the
    ///   backend; the current model is kept
    pub async fn update_model(&self, model_id: &str) -> AppResult<String> {
        let mut state = self.state.write().await;

        if !state.available_models.iter().any(|m| m == model_id) {
            tracing::warn!(
                "Rejected model '{}'; available: {:?}",
                model_id,
                state.available_models
            );
            return Err(AppError::ModelNotAvailable(model_id.to_string()));
        }

        let model = self.bind_model(model_id);
        state.snapshot = Arc::new(state.snapshot.with_model(model));

        tracing::info!("Active model: {}", model_id);
        Ok(model_id.to_string())
    }

    /// Re-probe the backend and remember the result.
    ///
    /// The active model is not changed, even if it is no longer listed.
    pub async fn list_available_models(&self) -> Vec<String> {
        let models = self.probe.list_models().await;
        self.state.write().await.available_models = models.clone();
        models
    }

    /// Names composing the active retriever, in configuration order.
    pub async fn list_active_retrievers(&self) -> Vec<String> {
        self.snapshot().await.source_names()
    }

    pub async fn current_model(&self) -> Option<String> {
        self.snapshot().await.model_name().map(str::to_string)
    }

    fn bind_model(&self, name: impl Into<String>) -> LanguageModel {
        LanguageModel::new(self.client.clone(), name).with_max_tokens(self.settings.max_tokens)
    }

    /// Collections currently in persisted storage.
    pub async fn list_collections(&self) -> AppResult<Vec<String>> {
        self.store.list_collections().await
    }
}

/// Pick the startup model from a probe result.
///
/// The preferred model wins when listed, either exactly or with the
/// backend's implicit `:latest` tag; otherwise the first listed model.
fn select_default_model(available: &[String], preferred: Option<&str>) -> Option<String> {
    if let Some(preferred) = preferred {
        let tagged = format!("{}:latest", preferred);
        if let Some(found) = available
            .iter()
            .find(|m| m.as_str() == preferred || **m == tagged)
        {
            return Some(found.clone());
        }
    }

    available.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_preferred_model() {
        let available = names(&["mistral", "llama3.2:latest", "phi3"]);
        assert_eq!(
            select_default_model(&available, Some("llama3.2")),
            Some("llama3.2:latest".to_string())
        );
        assert_eq!(
            select_default_model(&available, Some("phi3")),
            Some("phi3".to_string())
        );
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let available = names(&["mistral", "phi3"]);
        assert_eq!(
            select_default_model(&available, Some("llama3.2")),
            Some("mistral".to_string())
        );
        assert_eq!(select_default_model(&available, None), Some("mistral".to_string()));
    }

    #[test]
    fn test_select_nothing_available() {
        assert_eq!(select_default_model(&[], Some("llama3.2")), None);
    }
}
