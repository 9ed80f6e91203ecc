//! Question embeddings used to search persisted collections.

pub mod ollama;

pub use ollama::OllamaEmbedder;

use docquery_core::AppResult;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Model identifier used for embeddings
    fn model_name(&self) -> &str;

    /// Embed one text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}
