//! Text-generation port.
//!
//! Abstracts the opaque classification/generation capability. Callers
//! must treat every error as a signal to fall back to deterministic
//! heuristics; generation failures never propagate to the user.

use async_trait::async_trait;
use serde_json::Value;

/// Request for a JSON-mode generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full prompt text, including any schema instructions.
    pub prompt: String,
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,
}

impl GenerationRequest {
    /// Creates a deterministic (temperature 0) request.
    pub fn deterministic(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.0,
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Port for the opaque text-generation capability.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    /// Generate a JSON object for the prompt.
    ///
    /// Implementations must return a parsed JSON value or an error; they
    /// never return free text.
    async fn generate_json(&self, request: GenerationRequest) -> Result<Value, GenerationError>;
}

/// Text-generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Provider is unavailable.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Response was not the requested JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Unavailable(_)
                | GenerationError::RateLimited { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}
