//! Cached parse / extract / render state for the current raw output
//!
//! A [`Generation`] owns one raw model response and everything derived from
//! it. Derived values are computed on first use and memoized. Setting a new raw
//! output (or new configuration) replaces the generation as a whole, so no
//! cached value can outlive the input it was computed from.
//!
//! The cells are `std::cell::OnceCell`: a `Serializer` is meant for one caller
//! at a time and is not `Sync`.

use crate::config::ExtractorConfig;
use crate::document::ParsedDocument;
use crate::error::ExtractorError;
use crate::parser::extract_entities;
use crate::render::render;
use spotter_domain::{EntityRecord, OutputFormat};
use std::cell::OnceCell;
use tracing::debug;

/// One raw output and its lazily derived state
#[derive(Debug)]
pub struct Generation {
    raw: String,
    context_width: usize,
    parsed: OnceCell<ParsedDocument>,
    entities: OnceCell<Vec<EntityRecord>>,
    rendered: [OnceCell<String>; 3],
}

impl Generation {
    /// Start a generation; nothing is parsed until first asked for
    pub fn new(raw: impl Into<String>, context_width: usize) -> Self {
        Self {
            raw: raw.into(),
            context_width,
            parsed: OnceCell::new(),
            entities: OnceCell::new(),
            rendered: Default::default(),
        }
    }

    /// The raw markup this generation was built from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed document, built on first call
    pub fn parsed(&self) -> &ParsedDocument {
        self.parsed.get_or_init(|| {
            debug!("Parsing raw output ({} chars)", self.raw.chars().count());
            ParsedDocument::parse(&self.raw)
        })
    }

    /// Entity records, extracted on first call
    pub fn entities(&self) -> &[EntityRecord] {
        self.entities
            .get_or_init(|| extract_entities(self.parsed(), self.context_width))
    }

    /// Rendering in `format`, memoized per format
    pub fn rendered(&self, format: OutputFormat) -> Result<&str, ExtractorError> {
        let cell = &self.rendered[format.index()];
        if let Some(output) = cell.get() {
            return Ok(output);
        }

        let output = render(self.parsed(), self.entities(), format, self.context_width)?;
        debug!("Rendered {} output ({} bytes)", format, output.len());
        Ok(cell.get_or_init(|| output))
    }
}

/// Holds the current raw output and serves entities and renderings from it
///
/// # Examples
///
/// ```
/// use spotter_extractor::{ExtractorConfig, Serializer};
/// use spotter_domain::OutputFormat;
///
/// let mut serializer = Serializer::new(
///     r#"we <a id="1" title="Smith, John">John Smith</a>"#,
///     ExtractorConfig::default(),
/// );
/// assert_eq!(serializer.entities()[0].name, "Smith, John");
///
/// serializer.set_raw_output("no subjects");
/// assert!(serializer.entities().is_empty());
/// assert_eq!(serializer.output(OutputFormat::Structured).unwrap(), "[]");
/// ```
#[derive(Debug)]
pub struct Serializer {
    config: ExtractorConfig,
    generation: Generation,
}

impl Serializer {
    /// Create a serializer over `raw`
    pub fn new(raw: impl Into<String>, config: ExtractorConfig) -> Self {
        let generation = Generation::new(raw, config.context_width);
        Self { config, generation }
    }

    /// Replace the raw output, discarding every cached value
    pub fn set_raw_output(&mut self, raw: impl Into<String>) {
        self.generation = Generation::new(raw, self.config.context_width);
    }

    /// Replace the configuration, discarding every cached value
    pub fn set_config(&mut self, config: ExtractorConfig) {
        let raw = std::mem::take(&mut self.generation.raw);
        self.generation = Generation::new(raw, config.context_width);
        self.config = config;
    }

    /// Current configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Current raw output
    pub fn raw_output(&self) -> &str {
        self.generation.raw()
    }

    /// Parsed form of the current raw output
    pub fn document(&self) -> &ParsedDocument {
        self.generation.parsed()
    }

    /// Entities of the current raw output
    pub fn entities(&self) -> &[EntityRecord] {
        self.generation.entities()
    }

    /// Rendering of the current raw output in `format`
    pub fn output(&self, format: OutputFormat) -> Result<&str, ExtractorError> {
        self.generation.rendered(format)
    }

    /// Rendering selected by a user-supplied format token
    ///
    /// Unknown tokens fail with [`ExtractorError::UnsupportedFormat`] before
    /// anything is rendered.
    pub fn output_for_token(&self, token: &str) -> Result<&str, ExtractorError> {
        let format: OutputFormat = token.parse()?;
        self.output(format)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(String::new(), ExtractorConfig::default())
    }
}
