//! Fact cache service: TTL-bounded storage of validated answers.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::config::{FactTtlConfig, OutreachConfig};
use crate::domain::facts::{
    FactCategory, FactSource, FactSubject, FactTtls, VerifiedFact,
};
use crate::domain::foundation::{CampusId, DomainError, RunId};
use crate::ports::{FactRepository, RecordKind, RetrievedRecord};

/// Caching layer over the fact repository.
///
/// Lookups lazily sweep expired rows first; writes are gated on the
/// configured confidence threshold.
pub struct FactCache {
    facts: Arc<dyn FactRepository>,
    ttls: FactTtls,
    write_threshold: f64,
    lookup_limit: usize,
}

impl FactCache {
    pub fn new(
        facts: Arc<dyn FactRepository>,
        ttl_config: &FactTtlConfig,
        outreach_config: &OutreachConfig,
    ) -> Self {
        Self {
            facts,
            ttls: FactTtls {
                event_after_start_days: ttl_config.event_after_start_days,
                event_unknown_start_days: ttl_config.event_unknown_start_days,
                profile_days: ttl_config.profile_days,
                outreach_days: ttl_config.outreach_days,
            },
            write_threshold: outreach_config.fact_write_threshold,
            lookup_limit: ttl_config.lookup_limit,
        }
    }

    /// Unexpired facts matching any topic tag, in discovery order.
    ///
    /// Expired rows are deleted before matching, so a fact past its
    /// `expires_at` is never returned.
    pub async fn lookup(
        &self,
        campus: &CampusId,
        tags: &[String],
    ) -> Result<Vec<VerifiedFact>, DomainError> {
        let now = Utc::now();
        let swept = self.facts.delete_expired(now).await?;
        if swept > 0 {
            debug!(swept, "expired facts removed before lookup");
        }

        let facts = self.facts.list_by_campus(campus).await?;
        Ok(facts
            .into_iter()
            .filter(|f| !f.is_expired(now) && f.matches_tags(tags))
            .take(self.lookup_limit)
            .collect())
    }

    /// Caches an outreach-derived answer when it clears the threshold.
    ///
    /// Returns whether a fact was written.
    pub async fn store_outreach_summary(
        &self,
        campus: &CampusId,
        run_id: RunId,
        summary: &str,
        confidence: f64,
    ) -> Result<bool, DomainError> {
        if confidence < self.write_threshold {
            return Ok(false);
        }
        let fact = VerifiedFact::new(
            campus.clone(),
            FactSubject {
                kind: FactCategory::Outreach,
                id: None,
            },
            FactCategory::Outreach,
            "outreach_summary",
            summary,
            confidence,
            FactSource::OutreachReply { run_id },
            None,
            &self.ttls,
        );
        self.facts.insert(&fact).await?;
        Ok(true)
    }

    /// Caches a consent-verified retrieval hit when the answer built on
    /// it cleared the threshold. Returns whether a fact was written.
    pub async fn store_record_fact(
        &self,
        campus: &CampusId,
        record: &RetrievedRecord,
        confidence: f64,
    ) -> Result<bool, DomainError> {
        if confidence < self.write_threshold || !record.consent_verified {
            return Ok(false);
        }

        let (category, key) = match record.kind {
            RecordKind::Event => (FactCategory::Event, "event_details"),
            RecordKind::Profile => (FactCategory::Profile, "profile_summary"),
            RecordKind::Organization => (FactCategory::Club, "club_details"),
            // Already a cached fact; nothing new to store.
            RecordKind::Fact => return Ok(false),
        };

        let fact = VerifiedFact::new(
            campus.clone(),
            FactSubject {
                kind: category,
                id: Some(record.id.clone()),
            },
            category,
            key,
            format!("{} - {}", record.title, record.snippet),
            confidence,
            FactSource::DbRecord {
                record_id: record.id.clone(),
            },
            record.event_start,
            &self.ttls,
        );
        self.facts.insert(&fact).await?;
        Ok(true)
    }
}
