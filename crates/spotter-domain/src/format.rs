//! Output format selection

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering produced from a parsed document
///
/// - Markup: the document re-serialized and pretty-printed
/// - Tabular: one force-quoted CSV row per entity
/// - Structured: a pretty-printed JSON array of entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Re-serialized markup
    #[default]
    Markup,

    /// Comma-separated rows
    Tabular,

    /// JSON listing
    Structured,
}

impl OutputFormat {
    /// All formats, in cache-slot order
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Markup,
        OutputFormat::Tabular,
        OutputFormat::Structured,
    ];

    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markup => "markup",
            OutputFormat::Tabular => "tabular",
            OutputFormat::Structured => "structured",
        }
    }

    /// File extension used when the rendering is written to disk
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markup => "html",
            OutputFormat::Tabular => "csv",
            OutputFormat::Structured => "json",
        }
    }

    /// Position of this format in [`OutputFormat::ALL`]
    pub fn index(&self) -> usize {
        match self {
            OutputFormat::Markup => 0,
            OutputFormat::Tabular => 1,
            OutputFormat::Structured => 2,
        }
    }

    /// Parse a format token, accepting both the abstract name and the file extension
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "markup" | "html" => Some(OutputFormat::Markup),
            "tabular" | "csv" => Some(OutputFormat::Tabular),
            "structured" | "json" => Some(OutputFormat::Structured),
            _ => None,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
