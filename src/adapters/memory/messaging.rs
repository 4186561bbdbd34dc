//! In-memory messaging fabric.
//!
//! Assistant sends are recorded per channel; tests push inbound user
//! messages to simulate asynchronous human replies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ChannelId, DomainError, MessageId, UserId};
use crate::ports::{InboundMessage, Messaging};

#[derive(Debug, Clone)]
struct StoredMessage {
    id: MessageId,
    /// `None` marks an assistant message.
    sender: Option<UserId>,
    body: String,
    sent_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    direct: HashMap<UserId, ChannelId>,
    group_channels: Vec<ChannelId>,
    messages: HashMap<ChannelId, Vec<StoredMessage>>,
}

/// In-memory messaging adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessaging {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryMessaging {
    /// Creates an empty fabric.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a user replying in a channel (test helper).
    pub async fn push_inbound(&self, channel: &ChannelId, sender: &UserId, body: &str) {
        let mut inner = self.inner.write().await;
        inner.messages.entry(*channel).or_default().push(StoredMessage {
            id: MessageId::new(),
            sender: Some(sender.clone()),
            body: body.to_string(),
            sent_at: Utc::now(),
        });
    }

    /// Assistant messages sent into a channel, oldest first (test helper).
    pub async fn sent_bodies(&self, channel: &ChannelId) -> Vec<String> {
        let inner = self.inner.read().await;
        inner
            .messages
            .get(channel)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.sender.is_none())
                    .map(|m| m.body.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The assistant's direct channel with a user, if one was opened
    /// (test helper).
    pub async fn direct_channel(&self, user: &UserId) -> Option<ChannelId> {
        self.inner.read().await.direct.get(user).copied()
    }

    /// Number of group channels created (test helper).
    pub async fn group_channel_count(&self) -> usize {
        self.inner.read().await.group_channels.len()
    }
}

#[async_trait]
impl Messaging for InMemoryMessaging {
    async fn open_direct(&self, user: &UserId) -> Result<ChannelId, DomainError> {
        let mut inner = self.inner.write().await;
        let channel = *inner
            .direct
            .entry(user.clone())
            .or_insert_with(ChannelId::new);
        inner.messages.entry(channel).or_default();
        Ok(channel)
    }

    async fn create_group(&self, _participants: &[UserId]) -> Result<ChannelId, DomainError> {
        let mut inner = self.inner.write().await;
        let channel = ChannelId::new();
        inner.group_channels.push(channel);
        inner.messages.insert(channel, Vec::new());
        Ok(channel)
    }

    async fn send(&self, channel: &ChannelId, body: &str) -> Result<MessageId, DomainError> {
        let mut inner = self.inner.write().await;
        let id = MessageId::new();
        inner.messages.entry(*channel).or_default().push(StoredMessage {
            id,
            sender: None,
            body: body.to_string(),
            sent_at: Utc::now(),
        });
        Ok(id)
    }

    async fn inbound_since(
        &self,
        channel: &ChannelId,
        sender: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<InboundMessage>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .get(channel)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.sender.as_ref() == Some(sender) && m.sent_at > since)
                    .map(|m| InboundMessage {
                        id: m.id,
                        channel: *channel,
                        sender: sender.clone(),
                        body: m.body.clone(),
                        sent_at: m.sent_at,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
