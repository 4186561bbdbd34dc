//! Outreach campaign configuration
//!
//! Every retry/threshold constant the campaign engine relies on is named
//! here rather than hard-coded. The defaults encode a small bounded
//! retry budget; none of them carry product intent beyond that.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Outreach campaign configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutreachConfig {
    /// Targets contacted per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Hard maximum for a single batch, regardless of configuration
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Maximum number of expansion rounds per run
    #[serde(default = "default_max_expansions")]
    pub max_expansions: u32,

    /// Maximum distinct targets a run may ever contact
    #[serde(default = "default_hard_cap")]
    pub hard_cap: usize,

    /// Minimum total targets before the forum fallback is considered
    #[serde(default = "default_forum_fallback_min_targets")]
    pub forum_fallback_min_targets: usize,

    /// Candidate confidence required to move a run to consent
    #[serde(default = "default_confidence_threshold")]
    pub target_confidence_threshold: f64,

    /// Confidence required before an answer is cached as a fact
    #[serde(default = "default_confidence_threshold")]
    pub fact_write_threshold: f64,

    /// Days during which a previously contacted user is excluded
    #[serde(default = "default_recontact_window_days")]
    pub recontact_window_days: u32,
}

impl OutreachConfig {
    /// Effective batch size, clamped to the per-batch maximum
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.min(self.max_batch_size)
    }

    /// Recontact exclusion window as a Duration
    pub fn recontact_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.recontact_window_days) * 24 * 60 * 60)
    }

    /// Validate the outreach configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_size == 0 || self.batch_size > self.max_batch_size {
            return Err(ValidationError::InvalidBatchSize);
        }
        if self.hard_cap < self.batch_size {
            return Err(ValidationError::InvalidHardCap);
        }
        if !(0.0..=1.0).contains(&self.target_confidence_threshold) {
            return Err(ValidationError::ThresholdOutOfRange(
                "target_confidence_threshold",
            ));
        }
        if !(0.0..=1.0).contains(&self.fact_write_threshold) {
            return Err(ValidationError::ThresholdOutOfRange("fact_write_threshold"));
        }
        Ok(())
    }
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_batch_size: default_max_batch_size(),
            max_expansions: default_max_expansions(),
            hard_cap: default_hard_cap(),
            forum_fallback_min_targets: default_forum_fallback_min_targets(),
            target_confidence_threshold: default_confidence_threshold(),
            fact_write_threshold: default_confidence_threshold(),
            recontact_window_days: default_recontact_window_days(),
        }
    }
}

fn default_batch_size() -> usize {
    5
}

fn default_max_batch_size() -> usize {
    10
}

fn default_max_expansions() -> u32 {
    2
}

fn default_hard_cap() -> usize {
    25
}

fn default_forum_fallback_min_targets() -> usize {
    10
}

fn default_confidence_threshold() -> f64 {
    0.75
}

fn default_recontact_window_days() -> u32 {
    7
}
