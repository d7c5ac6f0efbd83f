//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::output::write_output;
use spotter_domain::traits::LlmProvider;
use spotter_domain::{LlmService, OutputFormat};
use spotter_extractor::{Engine, EngineOptions};
use spotter_llm::OpenAiProvider;
use std::path::Path;
use tracing::info;

/// Execute the process command.
pub async fn execute_process(args: ProcessArgs, settings: &Settings) -> Result<()> {
    let config = settings.extractor_config(&args)?;
    let format = OutputFormat::from(args.output_format);
    let service = LlmService::from(args.llm_service);
    let output_path = args.output_path.clone();
    let options = engine_options(args);

    match service {
        LlmService::OpenAi => {
            let openai = settings.openai_config(|key| std::env::var(key).ok())?;
            info!("Using OpenAI model {}", openai.model);
            let provider = OpenAiProvider::new(openai)?.with_stream(options.stream);
            let engine = Engine::new(provider, options, config);
            run(engine, format, output_path.as_deref()).await
        }
    }
}

/// Query the model, then write the serialized result.
pub async fn run<L>(mut engine: Engine<L>, format: OutputFormat, output_path: Option<&Path>) -> Result<()>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    engine.process().await?;
    if engine.options().stream && output_path.is_none() {
        // Separate the streamed echo from the serialized output
        println!();
    }

    let output = engine.serialize(Some(format))?;
    info!(
        "Serialized {} subjects as {} ({} bytes)",
        engine.entities().len(),
        format,
        output.len()
    );

    if let Some(path) = write_output(output, output_path, format)? {
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn engine_options(args: ProcessArgs) -> EngineOptions {
    EngineOptions {
        text_path: args.text_path,
        subject_listing_path: args.subject_listing_path,
        user_context: args.user_context,
        prompt_template: args.prompt_template.into(),
        output_format: Some(args.output_format.into()),
        stream: args.stream,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_extractor::ExtractorConfig;
    use spotter_llm::MockProvider;
    use std::fs;

    const ANNOTATED: &str = r#"I talked to <a id="94795" title="Hinds, Howell">Mr. H. Hinds</a> yesterday."#;

    fn engine(dir: &Path, response: &str) -> Engine<MockProvider> {
        let text = dir.join("text.txt");
        let listing = dir.join("subjects.json");
        fs::write(&text, "I talked to Mr. H. Hinds yesterday.").unwrap();
        fs::write(&listing, r#"[{"id":94795,"title":"Hinds, Howell"}]"#).unwrap();

        let options = EngineOptions::new(text.to_str().unwrap(), listing.to_str().unwrap());
        Engine::new(MockProvider::new(response), options, ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_run_writes_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("hinds");

        for format in OutputFormat::ALL {
            run(engine(dir.path(), ANNOTATED), format, Some(&base)).await.unwrap();
        }

        let csv = fs::read_to_string(dir.path().join("hinds.csv")).unwrap();
        assert!(csv.contains(r#""94795","Hinds, Howell","Mr. H. Hinds","I talked to "," yesterday.""#));

        let json = fs::read_to_string(dir.path().join("hinds.json")).unwrap();
        assert!(json.contains("\"name\": \"Hinds, Howell\""));

        let html = fs::read_to_string(dir.path().join("hinds.html")).unwrap();
        assert_eq!(html, format!("{ANNOTATED}\n"));
    }

    #[tokio::test]
    async fn test_run_reports_invalid_path() {
        let options = EngineOptions::new("missing.txt", "missing.json");
        let engine = Engine::new(MockProvider::new(ANNOTATED), options, ExtractorConfig::default());

        let err = run(engine, OutputFormat::Markup, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid path provided: missing.txt");
    }

    #[test]
    fn test_engine_options_from_args() {
        use crate::cli::{Cli, Command};
        use clap::Parser;

        let cli = Cli::parse_from([
            "subject-spotter",
            "process",
            "--text-path",
            "t",
            "--subject-listing-path",
            "s",
            "--output-format",
            "json",
            "--stream",
            "false",
        ]);
        let Command::Process(args) = cli.command;
        let options = engine_options(args);

        assert_eq!(options.text_path, "t");
        assert_eq!(options.output_format, Some(OutputFormat::Structured));
        assert!(!options.stream);
    }
}
