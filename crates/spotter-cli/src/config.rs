//! Settings resolution for the CLI.
//!
//! Precedence, highest first: command-line flag, environment variable,
//! configuration file, built-in default.

use crate::cli::ProcessArgs;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use spotter_extractor::ExtractorConfig;
use spotter_llm::OpenAiConfig;
use std::fs;
use std::path::Path;

/// Contents of the optional TOML settings file.
///
/// ```toml
/// [extractor]
/// context_width = 40
///
/// [openai]
/// model = "gpt-4o"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Extraction and rendering settings
    pub extractor: ExtractorConfig,

    /// OpenAI connection settings; the access token is only read from the environment
    pub openai: OpenAiSettings,
}

/// File-level OpenAI settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Model identifier
    pub model: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Log error response bodies
    pub log_errors: Option<bool>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Extractor configuration with the command-line overrides applied.
    ///
    /// `context_width` already carries the `N_CHARACTERS` fallback from clap.
    pub fn extractor_config(&self, args: &ProcessArgs) -> Result<ExtractorConfig> {
        let mut config = self.extractor.clone();
        if let Some(width) = args.context_width {
            config.context_width = width;
        }
        config.default_format = args.output_format.into();
        config.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// OpenAI configuration from `lookup` (normally the environment), then the file.
    pub fn openai_config<F>(&self, lookup: F) -> Result<OpenAiConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = &self.openai;
        let mut config = OpenAiConfig::from_lookup(|key| {
            lookup(key).or_else(|| match key {
                "OPENAI_MODEL" => file.model.clone(),
                "OPENAI_BASE_URL" => file.base_url.clone(),
                "OPENAI_LOG_ERRORS" => file.log_errors.map(|v| v.to_string()),
                _ => None,
            })
        })?;

        if let Some(timeout_secs) = file.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        Ok(config)
    }
}
