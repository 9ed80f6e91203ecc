//! DocQuery CLI
//!
//! Main entry point for the docquery command-line tool.
//! Answers questions over locally indexed document collections.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, ModelsCommand, SourcesCommand};
use docquery_core::{logging, AnswerMode, AppConfig, AppResult};
use std::path::PathBuf;

/// DocQuery - question answering over your indexed documents
#[derive(Parser, Debug)]
#[command(name = "docquery")]
#[command(about = "Question answering over locally indexed document collections", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory holding vectorstores/ and prompts/ (default: ./data)
    #[arg(short, long, global = true, env = "DOCQUERY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "DOCQUERY_CONFIG")]
    config: Option<PathBuf>,

    /// Model-serving provider (ollama)
    #[arg(short, long, global = true, env = "DOCQUERY_PROVIDER")]
    provider: Option<String>,

    /// Backend base URL
    #[arg(short, long, global = true, env = "DOCQUERY_ENDPOINT")]
    endpoint: Option<String>,

    /// Preferred model identifier
    #[arg(short, long, global = true, env = "DOCQUERY_MODEL")]
    model: Option<String>,

    /// Answer mode: split (one answer per source) or single
    #[arg(long, global = true)]
    mode: Option<AnswerMode>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question over the indexed collections
    Ask(AskCommand),

    /// Interactive question loop
    Chat(ChatCommand),

    /// List the models the backend can serve
    Models(ModelsCommand),

    /// List the persisted collections
    Sources(SourcesCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from the config file and environment
    let config = AppConfig::load_with(cli.data_dir.clone(), cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.data_dir,
        cli.provider,
        cli.endpoint,
        cli.model,
        cli.mode,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("DocQuery CLI starting");
    tracing::debug!("Data dir: {:?}", config.data_dir);
    tracing::debug!("Provider: {} at {}", config.provider, config.endpoint);
    tracing::debug!("Preferred model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Models(_) => "models",
        Commands::Sources(_) => "sources",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Models(cmd) => cmd.execute(&config).await,
        Commands::Sources(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
