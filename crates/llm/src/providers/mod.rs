//! Concrete model-serving backends.

pub mod ollama;

pub use ollama::OllamaClient;
