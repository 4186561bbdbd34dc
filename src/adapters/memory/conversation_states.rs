//! In-memory conversation state repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::{ConversationId, DomainError, UserId};
use crate::ports::ConversationStateRepository;

/// In-memory storage for conversation states, keyed by
/// (user, conversation).
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStates {
    states: Arc<RwLock<HashMap<(UserId, ConversationId), ConversationState>>>,
}

impl InMemoryConversationStates {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored states (test helper).
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    /// True when the store is empty (test helper).
    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStateRepository for InMemoryConversationStates {
    async fn find(
        &self,
        user: &UserId,
        conversation: &ConversationId,
    ) -> Result<Option<ConversationState>, DomainError> {
        let states = self.states.read().await;
        Ok(states.get(&(user.clone(), *conversation)).cloned())
    }

    async fn save(&self, state: &ConversationState) -> Result<(), DomainError> {
        let mut states = self.states.write().await;
        states.insert((state.user.clone(), state.conversation), state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_find_roundtrips() {
        let repo = InMemoryConversationStates::new();
        let user = UserId::new("u1").unwrap();
        let conversation = ConversationId::new();
        let state = ConversationState::new(user.clone(), conversation);

        repo.save(&state).await.unwrap();
        let found = repo.find(&user, &conversation).await.unwrap();
        assert_eq!(found, Some(state));
    }

    #[tokio::test]
    async fn find_unknown_returns_none() {
        let repo = InMemoryConversationStates::new();
        let found = repo
            .find(&UserId::new("nobody").unwrap(), &ConversationId::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
