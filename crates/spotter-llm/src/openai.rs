//! OpenAI Provider Implementation
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint.
//!
//! # Features
//!
//! - Streaming (server-sent events) and whole-response modes
//! - Configuration from the environment (`OPENAI_ACCESS_TOKEN`, `OPENAI_MODEL`)
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use spotter_llm::{OpenAiConfig, OpenAiProvider};
//!
//! let config = OpenAiConfig::new("sk-...", "gpt-4o");
//! let provider = OpenAiProvider::new(config).unwrap().with_stream(false);
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use spotter_domain::traits::LlmProvider as LlmProviderTrait;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for a completion request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Connection settings for an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token sent with every request
    pub access_token: String,

    /// Model identifier (e.g., "gpt-4o")
    pub model: String,

    /// API base URL without trailing slash
    pub base_url: String,

    /// Log error response bodies at `error!` level
    pub log_errors: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Create a configuration with default base URL and timeout
    pub fn new(access_token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_errors: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load the configuration from process environment variables
    ///
    /// - `OPENAI_ACCESS_TOKEN` (required)
    /// - `OPENAI_MODEL` (required)
    /// - `OPENAI_BASE_URL` (optional)
    /// - `OPENAI_LOG_ERRORS` (`"true"` enables error body logging)
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup("OPENAI_ACCESS_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                LlmError::Configuration(
                    "Missing OPENAI_ACCESS_TOKEN! Set it in your environment or .env file."
                        .to_string(),
                )
            })?;

        let model = lookup("OPENAI_MODEL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                LlmError::Configuration(
                    "Missing OPENAI_MODEL! Set it in your environment or .env file.".to_string(),
                )
            })?;

        let mut config = Self::new(access_token, model);
        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|v| !v.is_empty()) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        config.log_errors = lookup("OPENAI_LOG_ERRORS").as_deref() == Some("true");

        Ok(config)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
    stream: bool,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider that streams by default
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            stream: true,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Enable or disable streaming; streamed pieces are echoed to stdout
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Whether responses are streamed
    pub fn is_streaming(&self) -> bool {
        self.stream
    }

    /// Post the request, retrying transient failures with exponential backoff
    async fn send(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response, LlmError> {
        let url = self.config.completions_url();
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.config.access_token)
                .json(body)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    if self.config.log_errors {
                        error!("OpenAI request failed with HTTP {}: {}", status, error_text);
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(LlmError::Unauthorized(error_text));
                    }
                    let error = LlmError::Communication(format!("HTTP {}: {}", status, error_text));
                    if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    if self.config.log_errors {
                        error!("OpenAI request failed: {}", e);
                    }
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Retrying OpenAI request in {:?} (attempt {})", delay, attempts + 1);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    async fn complete_whole(&self, prompt: &str) -> Result<String, LlmError> {
        let body = self.request(prompt, false);
        let response = self.send(&body).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
    }

    async fn complete_streamed(&self, prompt: &str) -> Result<String, LlmError> {
        let body = self.request(prompt, true);
        let mut response = self.send(&body).await?;

        let mut accumulator = SseAccumulator::default();
        let mut stdout = std::io::stdout();
        let mut echo = |piece: &str| {
            // Echo failures must not lose the completion
            let _ = stdout.write_all(piece.as_bytes());
            let _ = stdout.flush();
        };

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| LlmError::Communication(format!("Stream interrupted: {}", e)))?
        {
            accumulator.feed(&chunk, &mut echo)?;
            if accumulator.is_done() {
                break;
            }
        }

        accumulator.finish(&mut echo)
    }

    fn request<'a>(&'a self, prompt: &'a str, stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream,
        }
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    async fn completions(&self, prompt: &str) -> Result<String, Self::Error> {
        debug!(
            "Querying model '{}' (stream: {}, prompt: {} chars)",
            self.config.model,
            self.stream,
            prompt.chars().count()
        );

        if self.stream {
            self.complete_streamed(prompt).await
        } else {
            self.complete_whole(prompt).await
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// One parsed line of a server-sent event stream
#[derive(Debug, PartialEq, Eq)]
enum SseLine {
    Content(String),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> Result<SseLine, LlmError> {
    let line = line.trim_end_matches('\r');
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };
    let payload = payload.trim_start();

    if payload == "[DONE]" {
        return Ok(SseLine::Done);
    }
    if payload.is_empty() {
        return Ok(SseLine::Skip);
    }

    let chunk: ChatChunk = serde_json::from_str(payload)
        .map_err(|e| LlmError::InvalidResponse(format!("Invalid stream chunk: {}", e)))?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .map(SseLine::Content)
        .unwrap_or(SseLine::Skip))
}

/// Reassembles delta content from raw stream bytes split at arbitrary points
#[derive(Debug, Default)]
struct SseAccumulator {
    buffer: Vec<u8>,
    output: String,
    done: bool,
}

impl SseAccumulator {
    fn feed(&mut self, bytes: &[u8], on_piece: &mut impl FnMut(&str)) -> Result<(), LlmError> {
        if self.done {
            return Ok(());
        }
        self.buffer.extend_from_slice(bytes);

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.handle_line(&String::from_utf8_lossy(&line[..pos]), on_piece)?;
            if self.done {
                self.buffer.clear();
                break;
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str, on_piece: &mut impl FnMut(&str)) -> Result<(), LlmError> {
        match parse_sse_line(line)? {
            SseLine::Content(piece) => {
                on_piece(&piece);
                self.output.push_str(&piece);
            }
            SseLine::Done => self.done = true,
            SseLine::Skip => {}
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn finish(mut self, on_piece: &mut impl FnMut(&str)) -> Result<String, LlmError> {
        if !self.done && !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.handle_line(&String::from_utf8_lossy(&rest), on_piece)?;
        }
        Ok(self.output)
    }
}
