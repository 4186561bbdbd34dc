//! Text-generation provider configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Text-generation provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the OpenAI-compatible provider
    pub openai_api_key: Option<Secret<String>>,

    /// Model identifier sent to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the provider API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// When true, the engine runs on heuristics only and never calls
    /// the provider (useful for offline tests and demos)
    #[serde(default)]
    pub offline: bool,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a provider key is configured
    pub fn has_provider(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.offline && !self.has_provider() {
            return Err(ValidationError::NoProviderConfigured);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            offline: false,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_without_key_fails_validation() {
        let config = AiConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::NoProviderConfigured)
        ));
    }

    #[test]
    fn offline_config_needs_no_key() {
        let config = AiConfig {
            offline: true,
            ..AiConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn timeout_converts_to_duration() {
        let config = AiConfig {
            timeout_secs: 45,
            ..AiConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(45));
    }
}
