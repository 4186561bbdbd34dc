//! In-memory forum gateway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CampusId, DomainError, PostId, UserId};
use crate::ports::{ForumComment, ForumGateway};

#[derive(Debug, Clone)]
struct StoredPost {
    #[allow(dead_code)]
    campus: CampusId,
    title: String,
    comments: Vec<ForumComment>,
}

/// In-memory forum with seedable comments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryForum {
    posts: Arc<RwLock<HashMap<PostId, StoredPost>>>,
}

impl InMemoryForum {
    /// Creates an empty forum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a user commenting on a post (test helper).
    pub async fn push_comment(&self, post: &PostId, author: &UserId, body: &str) {
        let mut posts = self.posts.write().await;
        if let Some(stored) = posts.get_mut(post) {
            stored.comments.push(ForumComment {
                author: author.clone(),
                body: body.to_string(),
                posted_at: Utc::now(),
            });
        }
    }

    /// Number of posts published (test helper).
    pub async fn post_count(&self) -> usize {
        self.posts.read().await.len()
    }

    /// Title of a post (test helper).
    pub async fn title_of(&self, post: &PostId) -> Option<String> {
        self.posts.read().await.get(post).map(|p| p.title.clone())
    }
}

#[async_trait]
impl ForumGateway for InMemoryForum {
    async fn publish_anonymous(
        &self,
        campus: &CampusId,
        title: &str,
        _body: &str,
        _tags: &[String],
    ) -> Result<PostId, DomainError> {
        let mut posts = self.posts.write().await;
        let id = PostId::new();
        posts.insert(
            id,
            StoredPost {
                campus: campus.clone(),
                title: title.to_string(),
                comments: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn comments_since(
        &self,
        post: &PostId,
        since: DateTime<Utc>,
    ) -> Result<Vec<ForumComment>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts
            .get(post)
            .map(|stored| {
                stored
                    .comments
                    .iter()
                    .filter(|c| c.posted_at > since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_then_comment_roundtrips() {
        let forum = InMemoryForum::new();
        let campus = CampusId::new("campus-1").unwrap();
        let before = Utc::now();
        let post = forum
            .publish_anonymous(&campus, "Anyone into chess?", "drop a comment", &[])
            .await
            .unwrap();

        let commenter = UserId::new("carol").unwrap();
        forum.push_comment(&post, &commenter, "me!").await;

        let comments = forum.comments_since(&post, before).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, commenter);
    }

    #[tokio::test]
    async fn comments_before_cutoff_are_excluded() {
        let forum = InMemoryForum::new();
        let campus = CampusId::new("campus-1").unwrap();
        let post = forum
            .publish_anonymous(&campus, "t", "b", &[])
            .await
            .unwrap();
        forum
            .push_comment(&post, &UserId::new("carol").unwrap(), "hi")
            .await;

        let comments = forum.comments_since(&post, Utc::now()).await.unwrap();
        assert!(comments.is_empty());
    }
}
