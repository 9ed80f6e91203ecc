//! Ask command handler.
//!
//! Answers one question over the persisted collections.

use super::{print_json, start_assistant};
use clap::Args;
use docquery_core::{AppConfig, AppError, AppResult};

/// Ask a question over the indexed collections
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Collections to answer from (default: all persisted collections)
    #[arg(short, long, value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        if self.question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let assistant = start_assistant(config).await?;

        if !self.sources.is_empty() {
            let active = assistant.reconfigure_retriever(&self.sources).await?;
            tracing::debug!("Restricted to sources: {:?}", active.active_sources);
        }

        let answer = assistant.answer_question(&self.question).await?;

        if self.json {
            print_json(&answer)?;
        } else {
            println!("{}", answer.answer);

            if let Some(files) = &answer.source_files {
                tracing::debug!("Answered from {} sources: {:?}", files.len(), files);
            }
        }

        Ok(())
    }
}
