//! LLM provider factory.
//!
//! Resolves the configured provider into the completion client and model
//! catalog the assistant needs. Both handles usually point at the same
//! backend object.

use crate::client::{LlmClient, ModelCatalog};
use crate::providers::OllamaClient;
use docquery_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Handles onto one model-serving backend.
#[derive(Clone)]
pub struct LlmBackend {
    /// Completion capability
    pub client: Arc<dyn LlmClient>,

    /// Model listing capability
    pub catalog: Arc<dyn ModelCatalog>,
}

/// Create the backend for the configured provider.
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or the HTTP client
/// cannot be built.
pub fn create_backend(config: &AppConfig) -> AppResult<LlmBackend> {
    match config.provider.to_lowercase().as_str() {
        "ollama" => {
            let client = Arc::new(OllamaClient::with_timeout(
                config.endpoint.as_str(),
                Duration::from_secs(config.timeout_secs),
            )?);
            tracing::debug!("Created Ollama backend at {}", client.base_url());

            Ok(LlmBackend {
                client: client.clone(),
                catalog: client,
            })
        }
        _ => Err(AppError::Config(format!(
            "Unknown provider: {}",
            config.provider
        ))),
    }
}
