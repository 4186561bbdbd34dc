//! Outreach targets: users contacted during a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, MessageId, RunId, StateMachine, TargetId, UserId};

/// Reply status of a contacted target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Sent,
    Replied,
    Declined,
}

impl StateMachine for TargetStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TargetStatus::*;
        matches!((self, target), (Sent, Replied) | (Sent, Declined) | (Replied, Declined))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TargetStatus::*;
        match self {
            Sent => vec![Replied, Declined],
            Replied => vec![Declined],
            Declined => vec![],
        }
    }
}

/// Where a target came from in the selection cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    Friend,
    Classmate,
    CachedFact,
    ProfileMatch,
    CampusActive,
    ForumComment,
}

/// One user contacted during an outreach run.
///
/// Unique per (run, target_user); the repository enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachTarget {
    pub id: TargetId,
    pub run_id: RunId,
    pub target_user: UserId,
    pub channel: ChannelId,
    pub outreach_message: MessageId,
    pub source: TargetSource,
    pub status: TargetStatus,
    pub sent_at: DateTime<Utc>,
}

impl OutreachTarget {
    /// Records a freshly contacted target.
    pub fn new(
        run_id: RunId,
        target_user: UserId,
        channel: ChannelId,
        outreach_message: MessageId,
        source: TargetSource,
    ) -> Self {
        Self {
            id: TargetId::new(),
            run_id,
            target_user,
            channel,
            outreach_message,
            source,
            status: TargetStatus::Sent,
            sent_at: Utc::now(),
        }
    }
}
