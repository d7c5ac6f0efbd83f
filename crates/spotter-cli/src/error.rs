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

    /// Extraction, fetching or serialization failed
    #[error("{0}")]
    Extractor(#[from] spotter_extractor::ExtractorError),

    /// LLM provider could not be set up
    #[error("{0}")]
    Llm(#[from] spotter_llm::LlmError),

    /// Unsupported format, template or service
    #[error("{0}")]
    Domain(#[from] spotter_domain::DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
