//! Directory port: social graph adjacency and profile reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CampusId, DomainError, UserId};

/// Public profile view used for target selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub campus: CampusId,
    pub display_name: String,
    pub bio: String,
    pub major: String,
    pub interests: Vec<String>,
}

impl Profile {
    /// Searchable lowercase text over bio, major, and interests.
    pub fn haystack(&self) -> String {
        let mut text = format!("{} {} ", self.bio, self.major);
        text.push_str(&self.interests.join(" "));
        text.to_lowercase()
    }

    /// True when any tag appears in the profile text.
    pub fn matches_tags(&self, tags: &[String]) -> bool {
        if tags.is_empty() {
            return false;
        }
        let haystack = self.haystack();
        tags.iter()
            .any(|tag| !tag.is_empty() && haystack.contains(&tag.to_lowercase()))
    }
}

/// Read-only port over the user directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Direct social connections of a user.
    async fn friends_of(&self, user: &UserId) -> Result<Vec<UserId>, DomainError>;

    /// Users sharing a structured affiliation (e.g. same class).
    async fn classmates_of(&self, user: &UserId) -> Result<Vec<UserId>, DomainError>;

    /// Active profiles on a campus, arbitrary order, up to `limit`.
    async fn active_profiles(
        &self,
        campus: &CampusId,
        limit: usize,
    ) -> Result<Vec<Profile>, DomainError>;

    /// One user's profile, if visible.
    async fn profile(&self, user: &UserId) -> Result<Option<Profile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(bio: &str, interests: &[&str]) -> Profile {
        Profile {
            user_id: UserId::new("u1").unwrap(),
            campus: CampusId::new("campus-1").unwrap(),
            display_name: "Test User".to_string(),
            bio: bio.to_string(),
            major: "Undeclared".to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn haystack_includes_interests() {
        let p = profile("climbs on weekends", &["Bouldering"]);
        assert!(p.haystack().contains("bouldering"));
    }

    #[test]
    fn tag_matching_over_profile_text() {
        let p = profile("plays chess at the union", &[]);
        assert!(p.matches_tags(&["chess".to_string()]));
        assert!(!p.matches_tags(&["tennis".to_string()]));
        assert!(!p.matches_tags(&[]));
    }

    #[test]
    fn directory_is_object_safe() {
        fn _accepts_dyn(_dir: &dyn Directory) {}
    }
}
