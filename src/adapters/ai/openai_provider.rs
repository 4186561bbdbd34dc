//! OpenAI-compatible text-generation adapter.
//!
//! Calls a chat-completions endpoint in JSON mode and returns the parsed
//! object. Any transport or parse failure maps onto `GenerationError`,
//! which call sites translate into deterministic heuristics.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::ports::{GenerationError, GenerationRequest, TextGeneration};

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: Secret<String>,
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible provider implementation.
pub struct OpenAiTextGeneration {
    config: OpenAiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiTextGeneration {
    /// Creates a provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` when the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if err.is_connect() {
            GenerationError::Network(format!("connection failed: {}", err))
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl TextGeneration for OpenAiTextGeneration {
    async fn generate_json(&self, request: GenerationRequest) -> Result<Value, GenerationError> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt,
            }],
            temperature: request.temperature,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => GenerationError::AuthenticationFailed,
                429 => GenerationError::RateLimited {
                    retry_after_secs: 30,
                },
                500..=599 => {
                    GenerationError::Unavailable(format!("server error {}: {}", status, error_body))
                }
                _ => GenerationError::Network(format!(
                    "unexpected status {}: {}",
                    status, error_body
                )),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("{}");

        serde_json::from_str(content).map_err(|e| GenerationError::Parse(e.to_string()))
    }
}
