//! Error types for token parsing in the domain layer

use thiserror::Error;

/// Errors raised when a user-supplied token does not name a known variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Output format token outside {markup, tabular, structured}
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Prompt template token outside {template1, template2}
    #[error("Template {0} is not supported.")]
    UnsupportedPromptTemplate(String),

    /// LLM service token that has no provider
    #[error("Unsupported LLM service: {0}")]
    UnsupportedLlmService(String),
}
