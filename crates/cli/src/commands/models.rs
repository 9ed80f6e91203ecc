//! Models command handler.

use super::{print_json, start_assistant};
use clap::Args;
use docquery_core::{AppConfig, AppResult};

/// List the models the backend can serve
#[derive(Args, Debug)]
pub struct ModelsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModelsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing models command");

        let assistant = start_assistant(config).await?;
        let available = assistant.get_available_models().await;

        if self.json {
            return print_json(&available);
        }

        if available.models.is_empty() {
            println!("No models available at {}", config.endpoint);
            return Ok(());
        }

        let current = assistant.current_model().await;
        for model in &available.models {
            let marker = if current.as_deref() == Some(model.as_str()) {
                "*"
            } else {
                " "
            };
            println!("{} {}", marker, model);
        }

        Ok(())
    }
}
