//! In-memory user memory repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::UserMemory;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::UserMemoryRepository;

/// In-memory store for the user-memory side channel.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserMemories {
    memories: Arc<RwLock<HashMap<UserId, UserMemory>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl InMemoryUserMemories {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent saves fail, for exercising the best-effort
    /// side-channel contract in tests.
    pub async fn fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }
}

#[async_trait]
impl UserMemoryRepository for InMemoryUserMemories {
    async fn find(&self, user: &UserId) -> Result<Option<UserMemory>, DomainError> {
        Ok(self.memories.read().await.get(user).cloned())
    }

    async fn save(&self, memory: &UserMemory) -> Result<(), DomainError> {
        if *self.fail_writes.read().await {
            return Err(DomainError::storage("user memory store unavailable"));
        }
        self.memories
            .write()
            .await
            .insert(memory.user.clone(), memory.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_find_roundtrips() {
        let repo = InMemoryUserMemories::new();
        let user = UserId::new("u1").unwrap();
        let memory = UserMemory::new(user.clone());

        repo.save(&memory).await.unwrap();
        assert_eq!(repo.find(&user).await.unwrap(), Some(memory));
    }

    #[tokio::test]
    async fn failing_writes_surface_storage_error() {
        let repo = InMemoryUserMemories::new();
        repo.fail_writes(true).await;
        let memory = UserMemory::new(UserId::new("u1").unwrap());
        assert!(repo.save(&memory).await.is_err());
    }
}
