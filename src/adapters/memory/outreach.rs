//! In-memory outreach run and target store.
//!
//! One store implements both repository ports so the active-run claim
//! can check and insert under a single write lock, which is exactly the
//! atomicity the port contract demands.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, RunId, TargetId, UserId};
use crate::domain::outreach::{OutreachRun, OutreachTarget};
use crate::ports::{OutreachRunRepository, OutreachTargetRepository};

#[derive(Debug, Default)]
struct Inner {
    runs: HashMap<RunId, OutreachRun>,
    targets: Vec<OutreachTarget>,
}

/// In-memory store backing both outreach repository ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOutreachStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryOutreachStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored runs (test helper).
    pub async fn run_count(&self) -> usize {
        self.inner.read().await.runs.len()
    }
}

#[async_trait]
impl OutreachRunRepository for InMemoryOutreachStore {
    async fn claim_active(&self, run: &OutreachRun) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        let conflict = inner
            .runs
            .values()
            .any(|existing| existing.requester == run.requester && !existing.is_terminal());
        if conflict {
            return Err(DomainError::conflict(format!(
                "requester {} already has an active outreach run",
                run.requester
            )));
        }
        inner.runs.insert(run.id, run.clone());
        Ok(())
    }

    async fn find(&self, run_id: &RunId) -> Result<Option<OutreachRun>, DomainError> {
        Ok(self.inner.read().await.runs.get(run_id).cloned())
    }

    async fn find_active_by_requester(
        &self,
        requester: &UserId,
    ) -> Result<Option<OutreachRun>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .runs
            .values()
            .find(|run| &run.requester == requester && !run.is_terminal())
            .cloned())
    }

    async fn update(&self, run: &OutreachRun) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        if !inner.runs.contains_key(&run.id) {
            return Err(DomainError::run_not_found(run.id));
        }
        inner.runs.insert(run.id, run.clone());
        Ok(())
    }
}

#[async_trait]
impl OutreachTargetRepository for InMemoryOutreachStore {
    async fn insert(&self, target: &OutreachTarget) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        let duplicate = inner
            .targets
            .iter()
            .any(|t| t.run_id == target.run_id && t.target_user == target.target_user);
        if duplicate {
            return Err(DomainError::validation(
                "target_user",
                format!(
                    "user {} already targeted in run {}",
                    target.target_user, target.run_id
                ),
            ));
        }
        inner.targets.push(target.clone());
        Ok(())
    }

    async fn list_by_run(&self, run_id: &RunId) -> Result<Vec<OutreachTarget>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .targets
            .iter()
            .filter(|t| &t.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn update(&self, target: &OutreachTarget) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        match inner.targets.iter_mut().find(|t| t.id == target.id) {
            Some(existing) => {
                *existing = target.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::TargetNotFound,
                format!("Outreach target not found: {}", target.id),
            )),
        }
    }

    async fn find(&self, target_id: &TargetId) -> Result<Option<OutreachTarget>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.targets.iter().find(|t| &t.id == target_id).cloned())
    }

    async fn contacted_since(
        &self,
        requester: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<UserId>, DomainError> {
        let inner = self.inner.read().await;
        let requester_runs: Vec<RunId> = inner
            .runs
            .values()
            .filter(|run| &run.requester == requester)
            .map(|run| run.id)
            .collect();
        Ok(inner
            .targets
            .iter()
            .filter(|t| requester_runs.contains(&t.run_id) && t.sent_at >= since)
            .map(|t| t.target_user.clone())
            .collect())
    }
}
