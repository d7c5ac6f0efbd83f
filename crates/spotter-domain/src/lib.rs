//! Subject Spotter Domain Layer
//!
//! This crate holds the value types and trait interfaces shared by every other
//! crate in the workspace. It carries no I/O and no parsing logic.
//!
//! ## Key Concepts
//!
//! - **EntityRecord**: one annotated subject recovered from model output
//! - **OutputFormat**: the closed set of renderings (markup, tabular, structured)
//! - **PromptTemplate**: built-in prompt variants sent to the model
//! - **LlmService**: which model backend answers the prompt
//!
//! ## Architecture
//!
//! - Pure data and trait definitions
//! - Infrastructure implementations live in other crates
//! - Only `serde` and `thiserror` as dependencies

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod format;
pub mod service;
pub mod template;
pub mod traits;

// Re-exports for convenience
pub use entity::EntityRecord;
pub use error::DomainError;
pub use format::OutputFormat;
pub use service::LlmService;
pub use template::PromptTemplate;
