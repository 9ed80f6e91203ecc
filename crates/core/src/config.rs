//! Configuration management for DocQuery.
//!
//! Configuration is resolved from several layers, later layers winning:
//! - Built-in defaults
//! - The YAML config file (`<data_dir>/config.yaml` or `DOCQUERY_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! All persisted state (collections, prompt overrides) lives under `data_dir`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

const KNOWN_PROVIDERS: [&str; 1] = ["ollama"];

/// How retrieved passages are turned into an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// One prompt and one model call per source, merged afterwards
    #[default]
    Split,
    /// Every passage stuffed into a single prompt
    Single,
}

impl FromStr for AnswerMode {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "split" => Ok(Self::Split),
            "single" => Ok(Self::Single),
            other => Err(AppError::Config(format!(
                "Unknown answer mode: {}. Supported: split, single",
                other
            ))),
        }
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Split => write!(f, "split"),
            Self::Single => write!(f, "single"),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory holding `vectorstores/`, `prompts/` and `config.yaml`
    pub data_dir: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Model-serving provider (currently only "ollama")
    pub provider: String,

    /// Base URL of the model-serving backend
    pub endpoint: String,

    /// Preferred default model identifier
    pub model: String,

    /// Model used to embed questions for collection search
    pub embedding_model: String,

    /// Request timeout for backend calls, in seconds
    pub timeout_secs: u64,

    /// Cap on generated tokens per answer; backend default when unset
    pub max_tokens: Option<u32>,

    /// Passages retrieved per collection
    pub top_k: usize,

    /// Answer synthesis mode
    pub mode: AnswerMode,

    /// Characters stripped from a source name to form its answer label
    pub label_prefix_len: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    #[serde(rename = "embeddingModel")]
    embedding_model: Option<String>,
    timeout: Option<u64>,
    #[serde(rename = "maxTokens")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RetrievalSection {
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    mode: Option<AnswerMode>,
    #[serde(rename = "labelPrefixLen")]
    label_prefix_len: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            config_file: None,
            provider: "ollama".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout_secs: 120,
            max_tokens: None,
            top_k: 3,
            mode: AnswerMode::Split,
            label_prefix_len: 0,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `DOCQUERY_DATA_DIR`: Override the data directory
    /// - `DOCQUERY_CONFIG`: Path to config file
    /// - `DOCQUERY_PROVIDER`: Model-serving provider
    /// - `DOCQUERY_ENDPOINT`: Backend base URL
    /// - `DOCQUERY_MODEL`: Preferred model identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use docquery_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Data dir: {:?}", config.data_dir);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], with a data directory and config file chosen
    /// on the command line taking precedence over the environment.
    pub fn load_with(data_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(data_dir) =
            data_dir.or_else(|| std::env::var_os("DOCQUERY_DATA_DIR").map(PathBuf::from))
        {
            config.data_dir = data_dir;
        }

        if let Some(config_file) =
            config_file.or_else(|| std::env::var_os("DOCQUERY_CONFIG").map(PathBuf::from))
        {
            config.config_file = Some(config_file);
        }

        let config_path = config.config_path();
        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DOCQUERY_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(endpoint) = std::env::var("DOCQUERY_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("DOCQUERY_MODEL") {
            config.model = model;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Path of the YAML config file this configuration reads.
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("config.yaml"))
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(endpoint) = llm.endpoint {
                result.endpoint = endpoint;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(embedding_model) = llm.embedding_model {
                result.embedding_model = embedding_model;
            }
            if let Some(timeout) = llm.timeout {
                result.timeout_secs = timeout;
            }
            if let Some(max_tokens) = llm.max_tokens {
                result.max_tokens = Some(max_tokens);
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(top_k) = retrieval.top_k {
                result.top_k = top_k;
            }
            if let Some(mode) = retrieval.mode {
                result.mode = mode;
            }
            if let Some(len) = retrieval.label_prefix_len {
                result.label_prefix_len = len;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        provider: Option<String>,
        endpoint: Option<String>,
        model: Option<String>,
        mode: Option<AnswerMode>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(mode) = mode {
            self.mode = mode;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Directory holding one sub-directory per persisted collection.
    pub fn vectorstores_dir(&self) -> PathBuf {
        self.data_dir.join("vectorstores")
    }

    /// Directory holding prompt definition overrides.
    pub fn prompts_dir(&self) -> PathBuf {
        self.data_dir.join("prompts")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.endpoint.trim().is_empty() {
            return Err(AppError::Config("Backend endpoint cannot be empty".to_string()));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        Ok(())
    }
}
