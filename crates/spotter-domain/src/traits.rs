//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates.

use std::future::Future;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (spotter-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send a single user prompt and return the assembled completion text
    fn completions(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model identifier used for log lines
    fn model_name(&self) -> &str {
        "llm"
    }
}
