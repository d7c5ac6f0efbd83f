//! Prompt template selection

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in prompt variant used to ask the model for annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    /// Full instructions with a worked example
    #[default]
    Template1,

    /// Compact instructions for models with short context windows
    Template2,
}

impl PromptTemplate {
    /// Get the template name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptTemplate::Template1 => "template1",
            PromptTemplate::Template2 => "template2",
        }
    }

    /// Parse a template from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "template1" => Some(PromptTemplate::Template1),
            "template2" => Some(PromptTemplate::Template2),
            _ => None,
        }
    }
}

impl std::str::FromStr for PromptTemplate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::UnsupportedPromptTemplate(s.to_string()))
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
