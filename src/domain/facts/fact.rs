//! Verified facts: cached, time-bounded answers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CampusId, FactId, RunId};

/// Category a fact belongs to; drives its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactCategory {
    Event,
    Profile,
    Club,
    Outreach,
}

/// What the fact is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactSubject {
    pub kind: FactCategory,
    /// External record id, absent for run-level outreach summaries.
    pub id: Option<String>,
}

/// Where the fact came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FactSource {
    DbRecord { record_id: String },
    OutreachReply { run_id: RunId },
}

/// Consent standing of the underlying data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    OptIn,
    Unverified,
}

/// TTL policy in whole days, by category.
#[derive(Debug, Clone, Copy)]
pub struct FactTtls {
    pub event_after_start_days: i64,
    pub event_unknown_start_days: i64,
    pub profile_days: i64,
    pub outreach_days: i64,
}

/// Computes when a fact expires.
///
/// Event facts outlive the event's start time by a fixed margin; without
/// a known start time they run from verification. Profile, club, and
/// outreach facts always run from verification.
pub fn compute_expiry(
    category: FactCategory,
    verified_at: DateTime<Utc>,
    event_start: Option<DateTime<Utc>>,
    ttls: &FactTtls,
) -> DateTime<Utc> {
    match category {
        FactCategory::Event => match event_start {
            Some(start) => start + Duration::days(ttls.event_after_start_days),
            None => verified_at + Duration::days(ttls.event_unknown_start_days),
        },
        FactCategory::Profile | FactCategory::Club => {
            verified_at + Duration::days(ttls.profile_days)
        }
        FactCategory::Outreach => verified_at + Duration::days(ttls.outreach_days),
    }
}

/// A cached, validated answer, reusable until it expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedFact {
    pub id: FactId,
    pub campus: CampusId,
    pub subject: FactSubject,
    pub category: FactCategory,
    pub key: String,
    pub value: String,
    pub confidence: f64,
    pub source: FactSource,
    pub consent_status: ConsentStatus,
    pub verified_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerifiedFact {
    /// Creates a fact verified now, with expiry from the TTL policy.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        campus: CampusId,
        subject: FactSubject,
        category: FactCategory,
        key: impl Into<String>,
        value: impl Into<String>,
        confidence: f64,
        source: FactSource,
        event_start: Option<DateTime<Utc>>,
        ttls: &FactTtls,
    ) -> Self {
        let verified_at = Utc::now();
        let expires_at = compute_expiry(category, verified_at, event_start, ttls);
        Self {
            id: FactId::new(),
            campus,
            subject,
            category,
            key: key.into(),
            value: value.into(),
            confidence,
            source,
            consent_status: ConsentStatus::OptIn,
            verified_at,
            expires_at,
        }
    }

    /// True once the fact is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Case-insensitive substring match of any tag against key or value.
    pub fn matches_tags(&self, tags: &[String]) -> bool {
        if tags.is_empty() {
            return false;
        }
        let haystack = format!("{} {}", self.key, self.value).to_lowercase();
        tags.iter()
            .any(|tag| !tag.is_empty() && haystack.contains(&tag.to_lowercase()))
    }
}
