//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Threshold '{0}' must lie in [0,1]")]
    ThresholdOutOfRange(&'static str),

    #[error("Outreach batch size must be between 1 and the per-batch maximum")]
    InvalidBatchSize,

    #[error("Outreach hard cap must be at least the batch size")]
    InvalidHardCap,

    #[error("Fact TTL must be at least one day")]
    InvalidFactTtl,

    #[error("No text-generation provider configured")]
    NoProviderConfigured,
}
