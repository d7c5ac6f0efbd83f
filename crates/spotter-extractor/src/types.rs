//! Inputs to a processing run

use serde::{Deserialize, Serialize};
use spotter_domain::{OutputFormat, PromptTemplate};

/// Where the transcription and subject listing come from, and how to prompt
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineOptions {
    /// URL or local path of the transcription
    pub text_path: String,

    /// URL or local path of the subject listing
    pub subject_listing_path: String,

    /// Free-form description of the document, inserted into the prompt
    pub user_context: Option<String>,

    /// Prompt template
    #[serde(default)]
    pub prompt_template: PromptTemplate,

    /// Output format; falls back to the configured default when unset
    pub output_format: Option<OutputFormat>,

    /// Echo the model response while it streams in
    #[serde(default)]
    pub stream: bool,
}

impl EngineOptions {
    /// Options for the given transcription and subject listing
    pub fn new(text_path: impl Into<String>, subject_listing_path: impl Into<String>) -> Self {
        Self {
            text_path: text_path.into(),
            subject_listing_path: subject_listing_path.into(),
            ..Default::default()
        }
    }

    /// Set the user context
    pub fn with_user_context(mut self, user_context: impl Into<String>) -> Self {
        self.user_context = Some(user_context.into());
        self
    }

    /// Set the prompt template
    pub fn with_prompt_template(mut self, template: PromptTemplate) -> Self {
        self.prompt_template = template;
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Set streaming
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}
