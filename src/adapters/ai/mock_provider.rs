//! Mock text-generation provider for testing.
//!
//! Configurable to return canned JSON values, inject errors, and track
//! calls, so tests exercise the heuristic-fallback paths without a
//! network.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{GenerationError, GenerationRequest, TextGeneration};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this JSON value.
    Json(Value),
    /// Return an error.
    Error(MockError),
}

/// Mock error kinds for testing fallback handling.
#[derive(Debug, Clone)]
pub enum MockError {
    Unavailable { message: String },
    RateLimited { retry_after_secs: u32 },
    Timeout { timeout_secs: u32 },
    Parse { message: String },
}

impl From<MockError> for GenerationError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Unavailable { message } => GenerationError::Unavailable(message),
            MockError::RateLimited { retry_after_secs } => {
                GenerationError::RateLimited { retry_after_secs }
            }
            MockError::Timeout { timeout_secs } => GenerationError::Timeout { timeout_secs },
            MockError::Parse { message } => GenerationError::Parse(message),
        }
    }
}

/// Mock text-generation provider.
///
/// Responses are consumed in order; once exhausted, an empty JSON object
/// is returned, which every caller treats as "no signal".
#[derive(Debug, Clone, Default)]
pub struct MockTextGeneration {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockTextGeneration {
    /// Creates a mock with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response.
    pub fn with_json(self, value: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Json(value));
        self
    }

    /// Queues an error response.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded requests.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGeneration for MockTextGeneration {
    async fn generate_json(&self, request: GenerationRequest) -> Result<Value, GenerationError> {
        self.calls.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Json(value)) => Ok(value),
            Some(MockResponse::Error(err)) => Err(err.into()),
            None => Ok(json!({})),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_responses_in_order() {
        let provider = MockTextGeneration::new()
            .with_json(json!({"a": 1}))
            .with_json(json!({"b": 2}));

        let first = provider
            .generate_json(GenerationRequest::deterministic("x"))
            .await
            .unwrap();
        let second = provider
            .generate_json(GenerationRequest::deterministic("y"))
            .await
            .unwrap();

        assert_eq!(first, json!({"a": 1}));
        assert_eq!(second, json!({"b": 2}));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn exhausted_queue_returns_empty_object() {
        let provider = MockTextGeneration::new();
        let value = provider
            .generate_json(GenerationRequest::deterministic("x"))
            .await
            .unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn configured_error_is_returned() {
        let provider = MockTextGeneration::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });
        let result = provider
            .generate_json(GenerationRequest::deterministic("x"))
            .await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockTextGeneration::new();
        provider
            .generate_json(GenerationRequest::deterministic("classify me"))
            .await
            .unwrap();
        assert_eq!(provider.calls()[0].prompt, "classify me");
    }
}
