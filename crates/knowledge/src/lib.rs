//! Retrieval-augmented question answering over persisted document collections.
//!
//! A question goes to the [`Assistant`], which captures the active language
//! model and ensemble of retrieval sources, fans the question out to every
//! source, prompts the model once per source, and merges the per-source
//! answers in configuration order.
//!
//! # Example
//! ```no_run
//! use docquery_core::AppConfig;
//! use docquery_knowledge::Assistant;
//!
//! # async fn example() -> docquery_core::AppResult<()> {
//! let assistant = Assistant::from_config(&AppConfig::load()?)?;
//! assistant.initialize().await?;
//!
//! let answer = assistant.answer_question("What is X?").await?;
//! println!("{}", answer.answer);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod collection;
pub mod embeddings;
pub mod rag;
pub mod source;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use assistant::{
    ActiveSourcesResponse, Assistant, AssistantSettings, AssistantSnapshot, CurrentModelResponse,
    ModelsResponse, RetrieversResponse,
};
pub use collection::{ChunkRecord, VectorCollection};
pub use embeddings::{Embedder, OllamaEmbedder};
pub use rag::{EnsembleRetriever, SynthesisEngine};
pub use source::{RetrievalSource, DEFAULT_TOP_K};
pub use store::{CollectionStore, FsCollectionStore};
pub use types::{AnswerBundle, Passage, QueryAnswer, SourceAnswer};
