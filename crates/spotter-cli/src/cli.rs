//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use spotter_domain::{LlmService, OutputFormat, PromptTemplate};
use std::path::PathBuf;

/// Subject Spotter - Annotate transcriptions with known subjects using an LLM.
#[derive(Debug, Parser)]
#[command(name = "subject-spotter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "SUBJECT_SPOTTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log workflow details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Annotate a transcription and serialize the identified subjects
    Process(ProcessArgs),
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// URL or path of the transcription
    #[arg(long)]
    pub text_path: String,

    /// URL or path of the subject listing
    #[arg(long)]
    pub subject_listing_path: String,

    /// Description of the document, added to the prompt
    #[arg(long)]
    pub user_context: Option<String>,

    /// Prompt template
    #[arg(long, value_enum, default_value = "template1")]
    pub prompt_template: TemplateArg,

    /// LLM service
    #[arg(long, value_enum, default_value = "openai")]
    pub llm_service: ServiceArg,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    pub output_format: FormatArg,

    /// Write the output to `<PATH>.<ext>` instead of stdout
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// Echo the model response while it streams in
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub stream: bool,

    /// Characters of context kept on each side of a subject
    #[arg(long, env = "N_CHARACTERS")]
    pub context_width: Option<usize>,
}

/// Prompt template argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TemplateArg {
    /// Full instructions with a worked example
    Template1,
    /// Compact instructions
    Template2,
}

/// LLM service argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ServiceArg {
    /// OpenAI-compatible chat completions
    Openai,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FormatArg {
    /// Annotated markup
    Html,
    /// JSON listing of subjects
    Json,
    /// CSV table of subjects
    Csv,
}

impl From<TemplateArg> for PromptTemplate {
    fn from(template: TemplateArg) -> Self {
        match template {
            TemplateArg::Template1 => PromptTemplate::Template1,
            TemplateArg::Template2 => PromptTemplate::Template2,
        }
    }
}

impl From<ServiceArg> for LlmService {
    fn from(service: ServiceArg) -> Self {
        match service {
            ServiceArg::Openai => LlmService::OpenAi,
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Html => OutputFormat::Markup,
            FormatArg::Json => OutputFormat::Structured,
            FormatArg::Csv => OutputFormat::Tabular,
        }
    }
}
