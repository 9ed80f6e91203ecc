//! Prompt system for DocQuery.
//!
//! This crate provides:
//! - YAML-based prompt definitions with a built-in answering default
//! - Handlebars template rendering of question and retrieved context

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::AnswerPrompt;
pub use loader::{load_prompt, resolve_prompt};
pub use types::{PromptDefinition, ANSWER_PROMPT_ID};
