//! In-memory verified fact repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::facts::VerifiedFact;
use crate::domain::foundation::{CampusId, DomainError};
use crate::ports::FactRepository;

/// In-memory fact store preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFacts {
    facts: Arc<RwLock<Vec<VerifiedFact>>>,
}

impl InMemoryFacts {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored facts (test helper).
    pub async fn len(&self) -> usize {
        self.facts.read().await.len()
    }

    /// True when the store is empty (test helper).
    pub async fn is_empty(&self) -> bool {
        self.facts.read().await.is_empty()
    }
}

#[async_trait]
impl FactRepository for InMemoryFacts {
    async fn insert(&self, fact: &VerifiedFact) -> Result<(), DomainError> {
        self.facts.write().await.push(fact.clone());
        Ok(())
    }

    async fn list_by_campus(&self, campus: &CampusId) -> Result<Vec<VerifiedFact>, DomainError> {
        let facts = self.facts.read().await;
        Ok(facts
            .iter()
            .filter(|f| &f.campus == campus)
            .cloned()
            .collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut facts = self.facts.write().await;
        let before = facts.len();
        facts.retain(|f| !f.is_expired(now));
        Ok((before - facts.len()) as u64)
    }
}
