//! Sources command handler.

use super::{print_json, start_assistant};
use clap::Args;
use docquery_core::{AppConfig, AppResult};

/// List the persisted collections
#[derive(Args, Debug)]
pub struct SourcesCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SourcesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing sources command");

        let assistant = start_assistant(config).await?;
        let collections = assistant.list_collections().await?;

        if self.json {
            return print_json(&serde_json::json!({
                "collections": collections,
                "root": config.vectorstores_dir().display().to_string(),
            }));
        }

        if collections.is_empty() {
            println!("No collections found in {:?}", config.vectorstores_dir());
            return Ok(());
        }

        for name in &collections {
            println!("{}", name);
        }

        Ok(())
    }
}
