//! User memory repository port.

use async_trait::async_trait;

use crate::domain::conversation::UserMemory;
use crate::domain::foundation::{DomainError, UserId};

/// Repository port for the per-user memory side channel.
#[async_trait]
pub trait UserMemoryRepository: Send + Sync {
    /// Find a user's memory. Returns `None` for first-time users.
    async fn find(&self, user: &UserId) -> Result<Option<UserMemory>, DomainError>;

    /// Insert or replace a user's memory.
    async fn save(&self, memory: &UserMemory) -> Result<(), DomainError>;
}
