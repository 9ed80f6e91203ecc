//! In-memory stand-ins for the backend, the collection store, and sources.

use crate::assistant::{Assistant, AssistantSettings};
use crate::embeddings::Embedder;
use crate::rag::SynthesisEngine;
use crate::source::RetrievalSource;
use crate::store::CollectionStore;
use crate::types::Passage;
use docquery_core::{AnswerMode, AppError, AppResult};
use docquery_llm::{LlmBackend, LlmClient, LlmRequest, LlmResponse, LlmUsage, ModelCatalog};
use docquery_prompt::{AnswerPrompt, PromptDefinition};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Separates question from context in [`test_prompt`].
pub const CONTEXT_MARKER: &str = "\n---\n";

/// A prompt that renders `question`, the marker, then the raw context.
pub fn test_prompt() -> AnswerPrompt {
    AnswerPrompt::new(&PromptDefinition {
        id: "test.answer".to_string(),
        title: "Test answer".to_string(),
        api_version: "1.0".to_string(),
        created_by: "tests".to_string(),
        template: "{{question}}\n---\n{{context}}".to_string(),
    })
    .unwrap()
}

/// Embedder returning the same vector for every text.
#[derive(Debug)]
pub struct FixedEmbedder {
    vector: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait::async_trait]
impl Embedder for FixedEmbedder {
    fn model_name(&self) -> &str {
        "fixed"
    }

    async fn embed(&self, _text: &str) -> AppResult<Vec<f32>> {
        Ok(self.vector.clone())
    }
}

/// Source answering every question with the same passages.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    passages: Vec<String>,
    delay: Option<Duration>,
    passage_label: Option<String>,
    fail: bool,
}

impl StaticSource {
    pub fn new(name: &str, passages: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            passages: passages.iter().map(|p| p.to_string()).collect(),
            delay: None,
            passage_label: None,
            fail: false,
        }
    }

    /// A source whose retrieval always fails with a backend error.
    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, &[])
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Tag returned passages with `label` instead of the source name.
    pub fn with_passage_label(mut self, label: &str) -> Self {
        self.passage_label = Some(label.to_string());
        self
    }
}

#[async_trait::async_trait]
impl RetrievalSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn retrieve(&self, _question: &str) -> AppResult<Vec<Passage>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(AppError::Backend(format!("source '{}' is down", self.name)));
        }

        let label = self.passage_label.as_deref().unwrap_or(&self.name);
        Ok(self
            .passages
            .iter()
            .map(|p| Passage::new(label, p.as_str()))
            .collect())
    }
}

/// Collection store holding [`StaticSource`]s in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Vec<StaticSource>>,
    loads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, name: &str, passages: &[&str]) -> Self {
        self.insert(StaticSource::new(name, passages));
        self
    }

    pub fn with_source(self, source: StaticSource) -> Self {
        self.insert(source);
        self
    }

    /// Add or replace a collection.
    pub fn insert(&self, source: StaticSource) {
        let mut collections = self.collections.lock().unwrap();
        collections.retain(|c| c.name != source.name);
        collections.push(source);
    }

    pub fn remove(&self, name: &str) {
        self.collections.lock().unwrap().retain(|c| c.name != name);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CollectionStore for MemoryStore {
    async fn list_collections(&self) -> AppResult<Vec<String>> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect())
    }

    async fn load_collection(
        &self,
        name: &str,
        _top_k: usize,
    ) -> AppResult<Arc<dyn RetrievalSource>> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let source = self
            .collections
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned();

        match source {
            Some(source) => Ok(Arc::new(source)),
            None => Err(AppError::SourceUnavailable(name.to_string())),
        }
    }
}

/// Model answering `"{model}: {context}"`, newlines in the context shown as `" / "`.
///
/// Expects prompts rendered by [`test_prompt`].
#[derive(Debug, Default)]
pub struct EchoModel {
    delays: Vec<(String, Duration)>,
    latency: Option<Duration>,
    failing_on: Option<String>,
    calls: AtomicUsize,
    completed: Mutex<Vec<String>>,
    token_caps: Mutex<Vec<Option<u32>>>,
}

impl EchoModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay answers whose context contains `marker`.
    pub fn with_delay(mut self, marker: &str, delay: Duration) -> Self {
        self.delays.push((marker.to_string(), delay));
        self
    }

    /// Delay every answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail answers whose context contains `marker`.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.failing_on = Some(marker.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Contexts in the order their answers completed.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    /// `max_tokens` of every request received.
    pub fn token_caps(&self) -> Vec<Option<u32>> {
        self.token_caps.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for EchoModel {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token_caps.lock().unwrap().push(request.max_tokens);

        let context = request
            .prompt
            .split_once(CONTEXT_MARKER)
            .map(|(_, context)| context)
            .unwrap_or(request.prompt.as_str());

        let delay = self
            .delays
            .iter()
            .find(|(marker, _)| context.contains(marker.as_str()))
            .map(|(_, delay)| *delay)
            .or(self.latency);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(marker) = &self.failing_on {
            if context.contains(marker.as_str()) {
                return Err(AppError::Backend(format!("model refused '{}'", marker)));
            }
        }

        self.completed.lock().unwrap().push(context.to_string());

        Ok(LlmResponse {
            content: format!("{}: {}", request.model, context.replace('\n', " / ")),
            model: request.model.clone(),
            usage: LlmUsage::new(0, 0),
        })
    }
}

/// Model catalog with a settable listing.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    models: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl ScriptedCatalog {
    pub fn new(models: &[&str]) -> Self {
        let catalog = Self::default();
        catalog.set_models(models);
        catalog
    }

    pub fn set_models(&self, models: &[&str]) {
        *self.models.lock().unwrap() = models.iter().map(|m| m.to_string()).collect();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl ModelCatalog for ScriptedCatalog {
    async fn list_models(&self) -> AppResult<Vec<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Backend("connection refused".to_string()));
        }
        Ok(self.models.lock().unwrap().clone())
    }
}

/// An assistant over fakes, plus handles to steer them.
pub struct Harness {
    pub assistant: Assistant,
    pub store: Arc<MemoryStore>,
    pub model: Arc<EchoModel>,
    pub catalog: Arc<ScriptedCatalog>,
}

impl Harness {
    pub fn new(store: MemoryStore, model: EchoModel, catalog: ScriptedCatalog) -> Self {
        Self::with_mode(store, model, catalog, AnswerMode::Split)
    }

    pub fn with_mode(
        store: MemoryStore,
        model: EchoModel,
        catalog: ScriptedCatalog,
        mode: AnswerMode,
    ) -> Self {
        Self::with_settings(store, model, catalog, mode, AssistantSettings::default())
    }

    pub fn with_settings(
        store: MemoryStore,
        model: EchoModel,
        catalog: ScriptedCatalog,
        mode: AnswerMode,
        settings: AssistantSettings,
    ) -> Self {
        let store = Arc::new(store);
        let model = Arc::new(model);
        let catalog = Arc::new(catalog);

        let assistant = Assistant::new(
            LlmBackend {
                client: model.clone(),
                catalog: catalog.clone(),
            },
            store.clone(),
            SynthesisEngine::new(test_prompt(), mode, 0),
            settings,
        );

        Self {
            assistant,
            store,
            model,
            catalog,
        }
    }
}
