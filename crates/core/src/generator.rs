//! Content generation
//!
//! The session asks a text-generation service for lesson sets and free-text
//! answers through the `ContentGenerator` trait. `ChatCompletionsGenerator` talks
//! to any OpenAI-style `chat/completions` endpoint using a blocking client; every
//! call runs to completion (or times out) before the session continues.

use crate::lesson::LessonSet;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Response budget for generating a fresh module.
pub const INITIAL_MODULE_BUDGET: u32 = 5000;
/// Response budget for extending a completed module.
pub const MORE_LESSONS_BUDGET: u32 = 2500;
/// Response budget for free-text questions.
pub const QUESTION_BUDGET: u32 = 2500;
/// Response budget for module summaries.
pub const SUMMARY_BUDGET: u32 = 2500;

/// Structured output should be as repeatable as the service allows.
const LESSON_TEMPERATURE: f32 = 0.0;
const ANSWER_TEMPERATURE: f32 = 0.1;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("request to the generation service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("generation service returned no content")]
    EmptyResponse,
    #[error("could not find a JSON object in the generated text")]
    NoJsonObject,
    #[error("generated JSON does not describe a lesson set: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Produces lesson content from prompts.
#[cfg_attr(test, mockall::automock)]
pub trait ContentGenerator {
    /// Generates a lesson set. The service is expected to answer with one JSON
    /// object, possibly wrapped in prose.
    fn generate_module(&self, prompt: &str, budget: u32) -> Result<LessonSet, GenerationError>;

    /// Generates free text, e.g. an answer or a summary.
    fn answer_question(&self, prompt: &str, budget: u32) -> Result<String, GenerationError>;
}

/// Returns the slice from the first `{` to the last `}`.
///
/// If there is an opening brace but no closing one after it, the rest of the
/// text is returned and left for the JSON parser to reject.
pub fn extract_json(text: &str) -> Result<&str, GenerationError> {
    let first = text.find('{').ok_or(GenerationError::NoJsonObject)?;
    match text.rfind('}') {
        Some(last) if last > first => Ok(&text[first..=last]),
        _ => Ok(&text[first..]),
    }
}

/// Extracts and parses the lesson set embedded in generated text.
pub fn parse_lesson_set(text: &str) -> Result<LessonSet, GenerationError> {
    let json = extract_json(text)?;
    Ok(serde_json::from_str(json)?)
}

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Full URL of the `chat/completions` endpoint.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// A `ContentGenerator` backed by an OpenAI-compatible HTTP API.
pub struct ChatCompletionsGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl ChatCompletionsGenerator {
    /// Builds the HTTP client. Connect, read and write are bounded by `config.timeout`.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn complete(
        &self,
        prompt: &str,
        budget: u32,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let payload = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: budget,
            temperature,
        };
        debug!(
            model = %self.config.model,
            max_tokens = budget,
            temperature,
            prompt_chars = prompt.len(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            error!(%status, "Generation request rejected");
            debug!(raw_body = %body, "Raw generation response");
            return Err(GenerationError::Status { status, body });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            debug!(raw_body = %body, "Raw generation response");
            GenerationError::Malformed(e)
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

impl ContentGenerator for ChatCompletionsGenerator {
    fn generate_module(&self, prompt: &str, budget: u32) -> Result<LessonSet, GenerationError> {
        let text = self.complete(prompt, budget, LESSON_TEMPERATURE)?;
        let set = parse_lesson_set(&text).inspect_err(|_| {
            debug!(generated = %text, "Generated text did not contain a lesson set");
        })?;
        info!(module = %set.module_name, lessons = set.len(), "Lesson set generated");
        Ok(set)
    }

    fn answer_question(&self, prompt: &str, budget: u32) -> Result<String, GenerationError> {
        self.complete(prompt, budget, ANSWER_TEMPERATURE)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
