//! LLM integration crate for DocQuery.
//!
//! This crate provides a provider-agnostic abstraction over the language
//! model backend: completion (`LlmClient`), model listing (`ModelCatalog`),
//! a client bound to one model (`LanguageModel`), and the capability probe
//! that degrades listing failures to "no models available".
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//!
//! # Example
//! ```no_run
//! use docquery_core::AppConfig;
//! use docquery_llm::{create_backend, LanguageModel};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = create_backend(&AppConfig::default())?;
//! let model = LanguageModel::new(backend.client, "llama3.2");
//! let answer = model.invoke("Hello, world!").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod model;
pub mod probe;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage, ModelCatalog};
pub use factory::{create_backend, LlmBackend};
pub use model::LanguageModel;
pub use probe::ModelProbe;
pub use providers::OllamaClient;
