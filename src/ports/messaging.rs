//! Messaging port: channels, sends, and inbound polling.
//!
//! The engine never owns delivery; it opens channels, writes assistant
//! messages, and polls for inbound messages after a timestamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, DomainError, MessageId, UserId};

/// An inbound (user-authored) message observed in a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: MessageId,
    pub channel: ChannelId,
    pub sender: UserId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Port for the external messaging fabric.
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Open (or reuse) the assistant's direct channel with a user.
    async fn open_direct(&self, user: &UserId) -> Result<ChannelId, DomainError>;

    /// Create a fresh group channel between the given participants.
    async fn create_group(&self, participants: &[UserId]) -> Result<ChannelId, DomainError>;

    /// Send an assistant message into a channel.
    async fn send(&self, channel: &ChannelId, body: &str) -> Result<MessageId, DomainError>;

    /// Inbound messages from `sender` in a channel strictly after
    /// `since`, oldest first.
    async fn inbound_since(
        &self,
        channel: &ChannelId,
        sender: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<InboundMessage>, DomainError>;
}
