//! Model capability probe.
//!
//! Asks the backend which models it can serve. A failing backend is reported
//! as "no models available" instead of an error.

use crate::client::ModelCatalog;
use std::sync::Arc;

/// Probes a model catalog for servable model identifiers.
#[derive(Clone)]
pub struct ModelProbe {
    catalog: Arc<dyn ModelCatalog>,
}

impl ModelProbe {
    pub fn new(catalog: Arc<dyn ModelCatalog>) -> Self {
        Self { catalog }
    }

    /// List available models, degrading to an empty list on backend failure.
    pub async fn list_models(&self) -> Vec<String> {
        match self.catalog.list_models().await {
            Ok(models) => {
                tracing::debug!("Model probe found {} models", models.len());
                models
            }
            Err(e) => {
                tracing::warn!(
                    "Model listing failed, treating backend as having no models: {}",
                    e
                );
                Vec::new()
            }
        }
    }
}
