//! Fact cache TTL configuration

use serde::Deserialize;

use super::error::ValidationError;

/// TTLs applied when validated answers are cached as facts
#[derive(Debug, Clone, Deserialize)]
pub struct FactTtlConfig {
    /// Days an event fact outlives the event's start time
    #[serde(default = "default_event_after_start_days")]
    pub event_after_start_days: i64,

    /// Days an event fact lives when no start time is known
    #[serde(default = "default_event_unknown_start_days")]
    pub event_unknown_start_days: i64,

    /// Days a profile or club fact lives
    #[serde(default = "default_profile_days")]
    pub profile_days: i64,

    /// Days an outreach-derived fact lives
    #[serde(default = "default_outreach_days")]
    pub outreach_days: i64,

    /// Maximum facts returned from a single lookup
    #[serde(default = "default_lookup_limit")]
    pub lookup_limit: usize,
}

impl FactTtlConfig {
    /// Validate TTL values
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ttls = [
            self.event_after_start_days,
            self.event_unknown_start_days,
            self.profile_days,
            self.outreach_days,
        ];
        if ttls.iter().any(|days| *days < 1) {
            return Err(ValidationError::InvalidFactTtl);
        }
        Ok(())
    }
}

impl Default for FactTtlConfig {
    fn default() -> Self {
        Self {
            event_after_start_days: default_event_after_start_days(),
            event_unknown_start_days: default_event_unknown_start_days(),
            profile_days: default_profile_days(),
            outreach_days: default_outreach_days(),
            lookup_limit: default_lookup_limit(),
        }
    }
}

fn default_event_after_start_days() -> i64 {
    7
}

fn default_event_unknown_start_days() -> i64 {
    30
}

fn default_profile_days() -> i64 {
    180
}

fn default_outreach_days() -> i64 {
    14
}

fn default_lookup_limit() -> usize {
    10
}
