//! Subject Spotter Extractor
//!
//! Turns subject-annotated model output into entity records and renders them.
//!
//! # Overview
//!
//! A model is asked to wrap every mention of a known subject in an anchor
//! element, `<a id="SUBJECT_ID" title="SUBJECT_TITLE">verbatim text</a>`. This
//! crate parses that answer leniently, builds one [`EntityRecord`] per anchor
//! (with character windows of surrounding markup and a locator that collects
//! every anchor sharing the id), and renders the result as markup, CSV or JSON.
//!
//! # Architecture
//!
//! ```text
//! source → Engine → PromptFormatter → LlmProvider
//!                 → Serializer → ParsedDocument → extract_entities → render
//! ```
//!
//! # Example Usage
//!
//! ```
//! use spotter_extractor::{ExtractorConfig, Serializer};
//! use spotter_domain::OutputFormat;
//!
//! let serializer = Serializer::new(
//!     r#"I talked to <a id="94795" title="Hinds, Howell">Mr. H. Hinds</a> yesterday."#,
//!     ExtractorConfig::default(),
//! );
//!
//! let entity = &serializer.entities()[0];
//! assert_eq!(entity.id, "94795");
//! assert_eq!(entity.text, "Mr. H. Hinds");
//! assert_eq!(entity.preceding_context, "I talked to ");
//!
//! let csv = serializer.output(OutputFormat::Tabular).unwrap();
//! assert!(csv.starts_with("\"Subject ID\""));
//! ```

#![warn(missing_docs)]

mod config;
mod document;
mod engine;
mod error;
mod parser;
mod prompt;
mod render;
mod serializer;
pub mod source;
mod types;


pub use config::{ExtractorConfig, CONTEXT_WIDTH_ENV, DEFAULT_CONTEXT_WIDTH};
pub use document::ParsedDocument;
pub use engine::Engine;
pub use error::ExtractorError;
pub use parser::extract_entities;
pub use prompt::PromptFormatter;
pub use render::{render, tabular_headers};
pub use serializer::{Generation, Serializer};
pub use source::get_content;
pub use spotter_domain::EntityRecord;
pub use types::EngineOptions;
