//! Forum gateway port for the anonymous-post fallback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CampusId, DomainError, PostId, UserId};

/// A comment left under a fallback post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumComment {
    pub author: UserId,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

/// Port for the campus forum.
#[async_trait]
pub trait ForumGateway: Send + Sync {
    /// Publish one anonymous public post, returning its id.
    async fn publish_anonymous(
        &self,
        campus: &CampusId,
        title: &str,
        body: &str,
        tags: &[String],
    ) -> Result<PostId, DomainError>;

    /// Comments on a post strictly after `since`, oldest first.
    async fn comments_since(
        &self,
        post: &PostId,
        since: DateTime<Utc>,
    ) -> Result<Vec<ForumComment>, DomainError>;
}
