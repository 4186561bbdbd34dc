//! Conversation state repository port.

use async_trait::async_trait;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::{ConversationId, DomainError, UserId};

/// Repository port for per-user conversation state.
///
/// State is created lazily on first message and never deleted, so the
/// only write operation is an upsert.
#[async_trait]
pub trait ConversationStateRepository: Send + Sync {
    /// Find the state for a (user, conversation) pair.
    ///
    /// Returns `None` if the user has never messaged on this
    /// conversation.
    async fn find(
        &self,
        user: &UserId,
        conversation: &ConversationId,
    ) -> Result<Option<ConversationState>, DomainError>;

    /// Insert or replace the state.
    async fn save(&self, state: &ConversationState) -> Result<(), DomainError>;
}
