//! Error types for the Extractor

use spotter_domain::DomainError;
use thiserror::Error;

/// Errors that can occur while fetching, querying, or serializing
///
/// Parsing never appears here: malformed markup is absorbed by the lenient
/// parser and shows up as empty or degenerate entity results instead.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Requested output format is not one of markup, tabular, structured
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Requested prompt template does not exist
    #[error("Template {0} is not supported.")]
    UnsupportedPromptTemplate(String),

    /// Tabular or markup serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// Remote content could not be fetched
    #[error("{0}")]
    Fetch(String),

    /// Path is neither a URL nor an existing file
    #[error("Invalid path provided: {0}")]
    InvalidPath(String),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model query exceeded the configured timeout
    #[error("Model query timed out after {0}s")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Json(e.to_string())
    }
}

impl From<csv::Error> for ExtractorError {
    fn from(e: csv::Error) -> Self {
        ExtractorError::Serialization(e.to_string())
    }
}

impl From<DomainError> for ExtractorError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnsupportedFormat(token) => ExtractorError::UnsupportedFormat(token),
            DomainError::UnsupportedPromptTemplate(token) => {
                ExtractorError::UnsupportedPromptTemplate(token)
            }
            other => ExtractorError::Config(other.to_string()),
        }
    }
}
