//! Chat command handler.
//!
//! Interactive loop on stdin. Lines starting with `:` reconfigure the
//! assistant; any other line is a question.

use super::start_assistant;
use clap::Args;
use docquery_core::{AppConfig, AppResult};
use docquery_knowledge::Assistant;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive question loop
#[derive(Args, Debug)]
pub struct ChatCommand {}

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatInput {
    Question(String),
    Sources(Vec<String>),
    Model(String),
    Models,
    Active,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

const HELP: &str = "\
:sources <a> <b> ...  answer from these collections (none clears)
:model <id>           switch the active model
:models               list models the backend serves
:active               show the active model and sources
:quit                 leave";

fn parse_line(line: &str) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }

    let Some(command) = line.strip_prefix(':') else {
        return ChatInput::Question(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("sources") => ChatInput::Sources(parts.map(str::to_string).collect()),
        Some("model") => match parts.next() {
            Some(id) => ChatInput::Model(id.to_string()),
            None => ChatInput::Unknown(line.to_string()),
        },
        Some("models") => ChatInput::Models,
        Some("active") => ChatInput::Active,
        Some("help") => ChatInput::Help,
        Some("quit") | Some("q") | Some("exit") => ChatInput::Quit,
        _ => ChatInput::Unknown(line.to_string()),
    }
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let assistant = start_assistant(config).await?;
        print_active(&assistant).await;
        println!("Type a question, or :help for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush().ok();

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_line(&line) {
                ChatInput::Quit => break,
                ChatInput::Empty => {}
                ChatInput::Help => println!("{}", HELP),
                ChatInput::Unknown(input) => {
                    eprintln!("Unknown command: {} (try :help)", input)
                }
                input => {
                    // A failed turn is reported and the loop continues
                    if let Err(e) = handle(&assistant, input).await {
                        tracing::error!("Chat command failed: {}", e);
                        eprintln!("Error: {}", e);
                    }
                }
            }
        }

        Ok(())
    }
}

async fn handle(assistant: &Assistant, input: ChatInput) -> AppResult<()> {
    match input {
        ChatInput::Question(question) => {
            let answer = assistant.answer_question(&question).await?;
            println!("{}\n", answer.answer);
        }
        ChatInput::Sources(names) => {
            let active = assistant.reconfigure_retriever(&names).await?;
            println!("Active sources: {}", active.active_sources.join(", "));
        }
        ChatInput::Model(id) => {
            let current = assistant.reconfigure_model(&id).await?;
            println!("Active model: {}", current.current_model);
        }
        ChatInput::Models => {
            for model in assistant.get_available_models().await.models {
                println!("{}", model);
            }
        }
        ChatInput::Active => print_active(assistant).await,
        ChatInput::Help | ChatInput::Quit | ChatInput::Empty | ChatInput::Unknown(_) => {}
    }

    Ok(())
}

async fn print_active(assistant: &Assistant) {
    let snapshot = assistant.snapshot().await;
    println!(
        "Model: {}",
        snapshot.model_name().unwrap_or("(none available)")
    );

    let sources = snapshot.source_names();
    if sources.is_empty() {
        println!("Sources: (none)");
    } else {
        println!("Sources: {}", sources.join(", "));
    }
}
