//! Subject Spotter CLI library.
//!
//! Argument parsing, settings resolution, the `process` command and output
//! writing for the `subject-spotter` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command, ProcessArgs};
pub use config::Settings;
pub use error::{CliError, Result};
