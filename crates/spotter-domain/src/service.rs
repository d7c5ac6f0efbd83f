//! LLM service selection

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model backend that answers annotation prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmService {
    /// OpenAI-compatible chat completions API
    #[default]
    OpenAi,
}

impl LlmService {
    /// Get the service name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmService::OpenAi => "openai",
        }
    }
}

impl std::str::FromStr for LlmService {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LlmService::OpenAi),
            _ => Err(DomainError::UnsupportedLlmService(s.to_string())),
        }
    }
}

impl fmt::Display for LlmService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
