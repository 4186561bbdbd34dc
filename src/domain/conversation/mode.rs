//! Conversational modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode a user's conversation with the assistant is currently in.
///
/// Modes are not lifecycle-constrained; the transition function in
/// [`super::transition`] is the single authority on how they move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationMode {
    /// No interaction yet.
    Idle,
    /// Free-form chat, no structured task in flight.
    Conversation,
    /// Answering a structured query from records.
    Agent,
    /// An outreach campaign is running for this user.
    Outreach,
    /// A suggested introduction is waiting on a consent reply.
    AwaitingConsent,
}

impl ConversationMode {
    /// Returns true when a structured task is expected to be active.
    pub fn is_task_mode(&self) -> bool {
        matches!(
            self,
            ConversationMode::Agent | ConversationMode::Outreach | ConversationMode::AwaitingConsent
        )
    }
}

impl fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationMode::Idle => "idle",
            ConversationMode::Conversation => "conversation",
            ConversationMode::Agent => "agent",
            ConversationMode::Outreach => "outreach",
            ConversationMode::AwaitingConsent => "awaiting_consent",
        };
        write!(f, "{}", s)
    }
}
