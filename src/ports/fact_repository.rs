//! Verified fact repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::facts::VerifiedFact;
use crate::domain::foundation::{CampusId, DomainError};

/// Repository port for cached verified facts.
///
/// Tag matching and the expiry policy live in the fact-cache service;
/// the repository only stores, lists, and sweeps.
#[async_trait]
pub trait FactRepository: Send + Sync {
    /// Insert a fact.
    async fn insert(&self, fact: &VerifiedFact) -> Result<(), DomainError>;

    /// All facts for a campus, in insertion order.
    async fn list_by_campus(&self, campus: &CampusId) -> Result<Vec<VerifiedFact>, DomainError>;

    /// Delete every fact with `expires_at < now`, returning the count.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
