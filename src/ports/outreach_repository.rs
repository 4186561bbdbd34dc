//! Outreach run and target repository ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::{DomainError, RunId, TargetId, UserId};
use crate::domain::outreach::{OutreachRun, OutreachTarget};

/// Repository port for outreach runs.
#[async_trait]
pub trait OutreachRunRepository: Send + Sync {
    /// Atomically insert a run, claiming the requester's active slot.
    ///
    /// Fails with `ConcurrencyConflict` when the requester already has a
    /// run in a non-terminal status. Implementations must make the
    /// existence check and the insert one atomic step; a read-then-insert
    /// sequence is not an acceptable implementation.
    async fn claim_active(&self, run: &OutreachRun) -> Result<(), DomainError>;

    /// Find a run by id. Returns `None` if unknown.
    async fn find(&self, run_id: &RunId) -> Result<Option<OutreachRun>, DomainError>;

    /// Find the requester's non-terminal run, if any.
    async fn find_active_by_requester(
        &self,
        requester: &UserId,
    ) -> Result<Option<OutreachRun>, DomainError>;

    /// Update an existing run.
    ///
    /// # Errors
    ///
    /// - `RunNotFound` if the run doesn't exist
    async fn update(&self, run: &OutreachRun) -> Result<(), DomainError>;
}

/// Repository port for outreach targets.
#[async_trait]
pub trait OutreachTargetRepository: Send + Sync {
    /// Insert a target row.
    ///
    /// Implementations enforce uniqueness per (run, target_user); a
    /// duplicate insert is rejected with a validation error.
    async fn insert(&self, target: &OutreachTarget) -> Result<(), DomainError>;

    /// All targets of a run, in contact order.
    async fn list_by_run(&self, run_id: &RunId) -> Result<Vec<OutreachTarget>, DomainError>;

    /// Update an existing target.
    ///
    /// # Errors
    ///
    /// - `TargetNotFound` if the target doesn't exist
    async fn update(&self, target: &OutreachTarget) -> Result<(), DomainError>;

    /// Find a target by id.
    async fn find(&self, target_id: &TargetId) -> Result<Option<OutreachTarget>, DomainError>;

    /// Users contacted on behalf of a requester since the cutoff,
    /// across all of the requester's runs.
    async fn contacted_since(
        &self,
        requester: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<UserId>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn OutreachRunRepository) {}
    }

    #[test]
    fn target_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn OutreachTargetRepository) {}
    }
}
