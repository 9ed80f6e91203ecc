//! Command handlers for the DocQuery CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod models;
pub mod sources;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use models::ModelsCommand;
pub use sources::SourcesCommand;

use docquery_core::{AppConfig, AppResult};
use docquery_knowledge::Assistant;

/// Build the assistant for `config` and run its startup probe.
pub async fn start_assistant(config: &AppConfig) -> AppResult<Assistant> {
    let assistant = Assistant::from_config(config)?;
    assistant.initialize().await?;
    Ok(assistant)
}

/// Pretty-print a serializable value to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
