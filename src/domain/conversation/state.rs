//! Per-user conversation state.
//!
//! Created lazily on the first inbound message and mutated by the
//! transition function and the consent coordinator. Never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, RunId, UserId};

use super::mode::ConversationMode;
use super::task::{Task, TaskResult};

/// Which side of an introduction a pending consent is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentSide {
    Requester,
    Candidate,
}

/// A consent question that has been asked but not yet answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConsent {
    pub run_id: RunId,
    pub side: ConsentSide,
    pub asked_at: DateTime<Utc>,
}

/// Log entry for a task that reached a terminal status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTask {
    pub run_id: Option<RunId>,
    pub query: String,
    pub result: TaskResult,
    pub resolved_at: DateTime<Utc>,
}

/// Complete conversational state for one (user, conversation) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub user: UserId,
    pub conversation: ConversationId,
    pub mode: ConversationMode,
    pub active_task: Option<Task>,
    pub pending_consents: Vec<PendingConsent>,
    pub resolved_tasks: Vec<ResolvedTask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Creates the initial state for a first-time conversation.
    pub fn new(user: UserId, conversation: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            user,
            conversation,
            mode: ConversationMode::Idle,
            active_task: None,
            pending_consents: Vec::new(),
            resolved_tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a new mode and active task, stamping `updated_at`.
    pub fn apply(&mut self, mode: ConversationMode, active_task: Option<Task>) {
        self.mode = mode;
        self.active_task = active_task;
        self.updated_at = Utc::now();
    }

    /// Records that a consent question was asked for a run.
    pub fn push_pending_consent(&mut self, run_id: RunId, side: ConsentSide) {
        self.pending_consents.push(PendingConsent {
            run_id,
            side,
            asked_at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// Drops the pending consent entry for a run, if present.
    pub fn clear_pending_consent(&mut self, run_id: RunId) {
        self.pending_consents.retain(|c| c.run_id != run_id);
        self.updated_at = Utc::now();
    }

    /// Returns the pending consent entry for a run.
    pub fn pending_consent_for(&self, run_id: RunId) -> Option<&PendingConsent> {
        self.pending_consents.iter().find(|c| c.run_id == run_id)
    }

    /// True when any consent question is unanswered.
    pub fn has_pending_consent(&self) -> bool {
        !self.pending_consents.is_empty()
    }

    /// Appends a terminal task record and clears the active task.
    pub fn log_resolved(&mut self, query: impl Into<String>, run_id: Option<RunId>, result: TaskResult) {
        self.resolved_tasks.push(ResolvedTask {
            run_id,
            query: query.into(),
            result,
            resolved_at: Utc::now(),
        });
        self.active_task = None;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::task::TaskKind;

    fn state() -> ConversationState {
        ConversationState::new(UserId::new("u1").unwrap(), ConversationId::new())
    }

    #[test]
    fn new_state_starts_idle() {
        let state = state();
        assert_eq!(state.mode, ConversationMode::Idle);
        assert!(state.active_task.is_none());
        assert!(state.pending_consents.is_empty());
    }

    #[test]
    fn apply_updates_mode_and_task() {
        let mut state = state();
        let task = Task::new(TaskKind::PeopleSearch, "tennis partner");
        state.apply(ConversationMode::Outreach, Some(task.clone()));
        assert_eq!(state.mode, ConversationMode::Outreach);
        assert_eq!(state.active_task, Some(task));
    }

    #[test]
    fn pending_consents_push_and_clear() {
        let mut state = state();
        let run_id = RunId::new();
        state.push_pending_consent(run_id, ConsentSide::Requester);
        assert!(state.has_pending_consent());
        assert!(state.pending_consent_for(run_id).is_some());

        state.clear_pending_consent(run_id);
        assert!(!state.has_pending_consent());
    }

    #[test]
    fn log_resolved_clears_active_task() {
        let mut state = state();
        let run_id = RunId::new();
        let task = Task::new(TaskKind::PeopleSearch, "tennis partner").with_run(run_id);
        state.apply(ConversationMode::AwaitingConsent, Some(task));

        state.log_resolved("tennis partner", Some(run_id), TaskResult::Connected { run_id });
        assert!(state.active_task.is_none());
        assert_eq!(state.resolved_tasks.len(), 1);
    }
}
