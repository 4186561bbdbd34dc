//! Information-need tasks tracked per conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RunId, StateMachine, TaskId};

/// What kind of information need a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Answerable from structured records.
    DbQuery,
    /// Requires finding a willing person.
    PeopleSearch,
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Searching,
    OutreachSent,
    AwaitingConsent,
    Resolved,
    Failed,
}

impl StateMachine for TaskStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TaskStatus::*;
        matches!(
            (self, target),
            (Pending, Searching)
                | (Pending, OutreachSent)
                | (Pending, Failed)
                | (Searching, OutreachSent)
                | (Searching, Resolved)
                | (Searching, Failed)
                | (OutreachSent, AwaitingConsent)
                | (OutreachSent, Resolved)
                | (OutreachSent, Failed)
                | (AwaitingConsent, Resolved)
                | (AwaitingConsent, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TaskStatus::*;
        match self {
            Pending => vec![Searching, OutreachSent, Failed],
            Searching => vec![OutreachSent, Resolved, Failed],
            OutreachSent => vec![AwaitingConsent, Resolved, Failed],
            AwaitingConsent => vec![Resolved, Failed],
            Resolved | Failed => vec![],
        }
    }
}

/// Why a task finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum TaskResult {
    Cancelled,
    Answered { summary: String },
    Connected { run_id: RunId },
    Declined { run_id: RunId },
    Expired { run_id: RunId },
}

/// An information-need task. Cleared from the conversation state on
/// cancel or resolution; a summary survives in the resolved-task log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub query: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub run_id: Option<RunId>,
    pub result: Option<TaskResult>,
}

impl Task {
    /// Creates a new pending task for a query.
    pub fn new(kind: TaskKind, query: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            kind,
            query: query.into(),
            status: TaskStatus::Pending,
            started_at: Utc::now(),
            run_id: None,
            result: None,
        }
    }

    /// Attaches the outreach run backing this task.
    pub fn with_run(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Marks the task failed with a cancelled result.
    pub fn cancelled(mut self) -> Self {
        self.status = TaskStatus::Failed;
        self.result = Some(TaskResult::Cancelled);
        self
    }

    /// Returns true once the task reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
