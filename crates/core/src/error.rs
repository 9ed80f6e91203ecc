//! Error types for DocQuery.
//!
//! This module defines a unified error enum. The query-facing variants
//! (`NotInitialized`, `ModelNotAvailable`, `SourceUnavailable`, `Backend`)
//! are kept distinct so a boundary layer can map each one to its own status.

use thiserror::Error;

/// Unified error type for DocQuery.
///
/// All functions in the workspace return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network or model-serving failure from an external collaborator
    #[error("Backend error: {0}")]
    Backend(String),

    /// No retriever or no model configured when an answer was requested
    #[error("Assistant not initialized: {0}")]
    NotInitialized(String),

    /// Requested model identifier is absent from the last probe
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// A configured collection no longer exists in persisted storage
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_kind() {
        let err = AppError::ModelNotAvailable("mistral".to_string());
        assert_eq!(err.to_string(), "Model not available: mistral");

        let err = AppError::NotInitialized("no sources configured".to_string());
        assert!(err.to_string().starts_with("Assistant not initialized"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
