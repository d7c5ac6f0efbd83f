//! The end-to-end workflow: load inputs, prompt the model, serialize the answer

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::prompt::PromptFormatter;
use crate::serializer::Serializer;
use crate::source::get_content;
use crate::types::EngineOptions;
use spotter_domain::traits::LlmProvider;
use spotter_domain::{EntityRecord, OutputFormat, PromptTemplate};
use tokio::time::timeout;
use tracing::{debug, info};

/// Drives one transcription through the model and the serializer
///
/// Inputs and the prompt are loaded lazily and cached until a setter
/// invalidates them. The model response replaces the serializer's raw output.
pub struct Engine<L>
where
    L: LlmProvider,
{
    provider: L,
    options: EngineOptions,
    formatter: PromptFormatter,
    text: Option<String>,
    subject_listing: Option<String>,
    prompt: Option<String>,
    serializer: Serializer,
}

impl<L> Engine<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new Engine
    pub fn new(provider: L, options: EngineOptions, config: ExtractorConfig) -> Self {
        Self {
            provider,
            formatter: PromptFormatter::new(options.prompt_template),
            options,
            text: None,
            subject_listing: None,
            prompt: None,
            serializer: Serializer::new(String::new(), config),
        }
    }

    /// Current options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The model provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Serializer holding the latest raw output
    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    /// Current configuration
    pub fn config(&self) -> &ExtractorConfig {
        self.serializer.config()
    }

    /// Point at another transcription
    pub fn set_text_path(&mut self, text_path: impl Into<String>) {
        self.options.text_path = text_path.into();
        self.text = None;
        self.prompt = None;
    }

    /// Point at another subject listing
    pub fn set_subject_listing_path(&mut self, subject_listing_path: impl Into<String>) {
        self.options.subject_listing_path = subject_listing_path.into();
        self.subject_listing = None;
        self.prompt = None;
    }

    /// Replace the user context
    pub fn set_user_context(&mut self, user_context: Option<String>) {
        self.options.user_context = user_context;
        self.prompt = None;
    }

    /// Switch prompt template
    pub fn set_prompt_template(&mut self, template: PromptTemplate) {
        self.options.prompt_template = template;
        self.formatter.set_template(template);
        self.prompt = None;
    }

    /// Change the format used by [`Engine::serialize`] when none is given
    pub fn set_output_format(&mut self, format: Option<OutputFormat>) {
        self.options.output_format = format;
    }

    /// Replace the configuration; derived output is recomputed on demand
    pub fn set_config(&mut self, config: ExtractorConfig) {
        self.serializer.set_config(config);
    }

    /// Replace the raw output without querying the model
    pub fn set_raw_output(&mut self, raw: impl Into<String>) {
        self.serializer.set_raw_output(raw);
    }

    /// Latest raw output
    pub fn raw_output(&self) -> &str {
        self.serializer.raw_output()
    }

    /// Transcription, loaded on first call
    pub async fn text(&mut self) -> Result<&str, ExtractorError> {
        let text = match self.text.take() {
            Some(text) => text,
            None => get_content(&self.options.text_path).await?,
        };
        Ok(self.text.insert(text).as_str())
    }

    /// Subject listing, loaded on first call
    pub async fn subject_listing(&mut self) -> Result<&str, ExtractorError> {
        let listing = match self.subject_listing.take() {
            Some(listing) => listing,
            None => get_content(&self.options.subject_listing_path).await?,
        };
        Ok(self.subject_listing.insert(listing).as_str())
    }

    /// Prompt for the current inputs, rendered on first call
    pub async fn prompt(&mut self) -> Result<&str, ExtractorError> {
        if self.prompt.is_none() {
            self.text().await?;
            self.subject_listing().await?;

            let prompt = self.formatter.generate_prompt(
                self.text.as_deref().unwrap_or_default(),
                self.subject_listing.as_deref().unwrap_or_default(),
                self.options.user_context.as_deref(),
            );
            debug!("Prompt length: {} chars", prompt.len());
            self.prompt = Some(prompt);
        }
        Ok(self.prompt.as_deref().unwrap_or_default())
    }

    /// Query the model and keep its answer as the new raw output
    pub async fn process(&mut self) -> Result<&str, ExtractorError> {
        self.prompt().await?;
        let prompt = self.prompt.as_deref().unwrap_or_default();

        info!(
            "Querying {} with {} template ({} chars)",
            self.provider.model_name(),
            self.options.prompt_template,
            prompt.len()
        );

        let limit = self.serializer.config().query_timeout();
        let response = timeout(limit, self.provider.completions(prompt))
            .await
            .map_err(|_| ExtractorError::Timeout(limit.as_secs()))?
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        info!("Model response length: {} chars", response.len());
        self.serializer.set_raw_output(response);
        Ok(self.serializer.raw_output())
    }

    /// Entities of the latest raw output
    pub fn entities(&self) -> &[EntityRecord] {
        self.serializer.entities()
    }

    /// Render the latest raw output
    ///
    /// `format` falls back to the options, then to the configured default.
    pub fn serialize(&self, format: Option<OutputFormat>) -> Result<&str, ExtractorError> {
        let format = format
            .or(self.options.output_format)
            .unwrap_or(self.serializer.config().default_format);
        self.serializer.output(format)
    }
}

impl<L: LlmProvider> std::fmt::Debug for Engine<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("text_loaded", &self.text.is_some())
            .field("subject_listing_loaded", &self.subject_listing.is_some())
            .field("prompt_ready", &self.prompt.is_some())
            .finish()
    }
}
