//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline error (fatal stage of a triage run)
    #[error(transparent)]
    Pipeline(#[from] triage_pipeline::PipelineError),

    /// Document could not be read as text
    #[error(transparent)]
    Extraction(#[from] triage_pipeline::ExtractionError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] triage_store::StoreError),

    /// Model provider error
    #[error("Model error: {0}")]
    Model(#[from] triage_llm::LlmError),

    /// Notifier error
    #[error("Notifier error: {0}")]
    Notify(#[from] triage_notify::NotifyError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No record for the requested claim id
    #[error("Claim '{0}' not found")]
    NotFound(String),
}
