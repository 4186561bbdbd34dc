//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `CAMPUS_CONNECTOR` prefix and nested values use double underscores
//! as separators.
//!
//! # Example
//!
//! ```no_run
//! use campus_connector::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod facts;
mod outreach;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use facts::FactTtlConfig;
pub use outreach::OutreachConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Text-generation provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Outreach campaign limits and thresholds
    #[serde(default)]
    pub outreach: OutreachConfig,

    /// Fact cache TTLs
    #[serde(default)]
    pub facts: FactTtlConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `CAMPUS_CONNECTOR` prefix, e.g.
    /// `CAMPUS_CONNECTOR__OUTREACH__HARD_CAP=25`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAMPUS_CONNECTOR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.outreach.validate()?;
        self.facts.validate()?;
        Ok(())
    }
}
