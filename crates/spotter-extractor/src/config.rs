//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use spotter_domain::OutputFormat;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the context width
pub const CONTEXT_WIDTH_ENV: &str = "N_CHARACTERS";

/// Default number of characters captured on each side of an annotation
pub const DEFAULT_CONTEXT_WIDTH: usize = 30;

/// Configuration for extraction and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Characters of serialized markup kept before and after each annotation
    pub context_width: usize,

    /// Format used when the caller does not name one
    pub default_format: OutputFormat,

    /// Maximum time for a single model query (seconds)
    pub query_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the query timeout as a Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.context_width == 0 {
            return Err("context_width must be greater than 0".to_string());
        }
        if self.query_timeout_secs == 0 {
            return Err("query_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Default configuration overlaid with `N_CHARACTERS` from the environment
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup`; unparsable values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = lookup(CONTEXT_WIDTH_ENV).and_then(|v| v.trim().parse().ok()) {
            self.context_width = width;
        }
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            context_width: DEFAULT_CONTEXT_WIDTH,
            default_format: OutputFormat::Markup,
            query_timeout_secs: 600,
        }
    }
}
