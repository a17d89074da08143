use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::engine::error::GenerationError;
use crate::model::generation_input::GenerationParams;

/// One call to the generative service: the prompt plus its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

/// Boundary to the external generative service.
///
/// Implementations return the raw model text and never parse it.
#[cfg_attr(test, mockall::automock)]
pub trait GenerationClient: Send + Sync {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Where and how to reach an OpenAI-compatible chat completions service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL up to and including the version segment, e.g. `http://localhost:1234/v1`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// [`GenerationClient`] speaking the `/chat/completions` protocol over blocking HTTP.
pub struct HttpGenerationClient {
    http: Client,
    config: ClientConfig,
}

impl HttpGenerationClient {
    pub fn new(config: ClientConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn map_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.config.timeout.as_secs())
        } else {
            GenerationError::Transport(err.to_string())
        }
    }

    /// Ask the service which models it serves.
    pub fn test_connection(&self) -> Result<String, GenerationError> {
        let mut req = self.http.get(self.url("models"));
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().map_err(|e| self.map_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }

        let body: serde_json::Value = resp.json().map_err(|e| self.map_error(e))?;
        Ok(format!(
            "Connected ({} models available)",
            body["data"].as_array().map(|a| a.len()).unwrap_or(0)
        ))
    }
}

impl GenerationClient for HttpGenerationClient {
    fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &request.params.model,
            temperature: request.params.temperature,
            max_tokens: request.params.max_output_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        tracing::debug!(
            model = %request.params.model,
            prompt_chars = request.prompt.len(),
            "sending completion request"
        );

        let mut req = self.http.post(self.url("chat/completions")).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().map_err(|e| self.map_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "completion request rejected");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let parsed: ChatCompletionResponse = resp.json().map_err(|e| self.map_error(e))?;
        first_text(parsed)
    }
}

fn first_text(resp: ChatCompletionResponse) -> Result<String, GenerationError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
