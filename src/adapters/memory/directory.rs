//! In-memory directory adapter, seedable for tests and demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CampusId, DomainError, UserId};
use crate::ports::{Directory, Profile};

#[derive(Debug, Default)]
struct Inner {
    friends: HashMap<UserId, Vec<UserId>>,
    classmates: HashMap<UserId, Vec<UserId>>,
    profiles: Vec<Profile>,
}

/// In-memory directory of users, friendships, and affiliations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile.
    pub async fn add_profile(&self, profile: Profile) {
        self.inner.write().await.profiles.push(profile);
    }

    /// Seeds a symmetric friendship.
    pub async fn add_friendship(&self, a: &UserId, b: &UserId) {
        let mut inner = self.inner.write().await;
        inner.friends.entry(a.clone()).or_default().push(b.clone());
        inner.friends.entry(b.clone()).or_default().push(a.clone());
    }

    /// Seeds a shared-class affiliation.
    pub async fn add_classmates(&self, a: &UserId, b: &UserId) {
        let mut inner = self.inner.write().await;
        inner
            .classmates
            .entry(a.clone())
            .or_default()
            .push(b.clone());
        inner
            .classmates
            .entry(b.clone())
            .or_default()
            .push(a.clone());
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn friends_of(&self, user: &UserId) -> Result<Vec<UserId>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.friends.get(user).cloned().unwrap_or_default())
    }

    async fn classmates_of(&self, user: &UserId) -> Result<Vec<UserId>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.classmates.get(user).cloned().unwrap_or_default())
    }

    async fn active_profiles(
        &self,
        campus: &CampusId,
        limit: usize,
    ) -> Result<Vec<Profile>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .profiles
            .iter()
            .filter(|p| &p.campus == campus)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn profile(&self, user: &UserId) -> Result<Option<Profile>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.iter().find(|p| &p.user_id == user).cloned())
    }
}
