//! Outreach run entity and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::conversation::IntentKind;
use crate::domain::foundation::{CampusId, ConversationId, PostId, RunId, StateMachine, UserId};

/// Lifecycle status of an outreach run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Waiting for replies from contacted targets.
    Collecting,
    /// An anonymous forum post is live; commenters become targets.
    ForumPosted,
    /// A candidate has been suggested; an introduction waits on consent.
    AwaitingConsent,
    /// The run resolved (introduction made or answer delivered).
    Done,
    /// Retry budget exhausted with no qualifying candidate.
    Expired,
    /// Explicitly cancelled or both sides refused.
    Failed,
}

impl StateMachine for RunStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RunStatus::*;
        matches!(
            (self, target),
            (Collecting, ForumPosted)
                | (Collecting, AwaitingConsent)
                | (Collecting, Done)
                | (Collecting, Expired)
                | (Collecting, Failed)
                | (ForumPosted, AwaitingConsent)
                | (ForumPosted, Done)
                | (ForumPosted, Expired)
                | (ForumPosted, Failed)
                | (AwaitingConsent, Done)
                | (AwaitingConsent, Failed)
                | (AwaitingConsent, Collecting)
                | (AwaitingConsent, ForumPosted)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RunStatus::*;
        match self {
            Collecting => vec![ForumPosted, AwaitingConsent, Done, Expired, Failed],
            ForumPosted => vec![AwaitingConsent, Done, Expired, Failed],
            AwaitingConsent => vec![Done, Failed, Collecting, ForumPosted],
            Done | Expired | Failed => vec![],
        }
    }
}

/// Candidate currently suggested for an introduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedCandidate {
    pub user: UserId,
    /// Whether the candidate's replies already signalled consent.
    pub consent: bool,
    pub confidence: f64,
}

/// Reference to the anonymous forum post backing a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPostRef {
    pub post_id: PostId,
    pub posted_at: DateTime<Utc>,
}

/// A bounded crowdsourcing campaign for one information need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachRun {
    pub id: RunId,
    pub requester: UserId,
    pub conversation: ConversationId,
    pub campus: CampusId,
    pub query: String,
    pub intent: IntentKind,
    pub topic_tags: Vec<String>,
    pub status: RunStatus,
    pub batch_number: u32,
    pub expansions: u32,
    pub target_confidence_threshold: f64,
    pub hard_cap: usize,
    pub confidence: Option<f64>,
    pub suggested_candidate: Option<SuggestedCandidate>,
    pub forum_post: Option<ForumPostRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OutreachRun {
    /// Creates a run in the collecting state.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requester: UserId,
        conversation: ConversationId,
        campus: CampusId,
        query: impl Into<String>,
        intent: IntentKind,
        topic_tags: Vec<String>,
        target_confidence_threshold: f64,
        hard_cap: usize,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RunId::new(),
            requester,
            conversation,
            campus,
            query: query.into(),
            intent,
            topic_tags,
            status: RunStatus::Collecting,
            batch_number: 1,
            expansions: 0,
            target_confidence_threshold,
            hard_cap,
            confidence: None,
            suggested_candidate: None,
            forum_post: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once the run reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves the run to a new status, stamping `updated_at`.
    ///
    /// The caller is expected to have validated the transition through
    /// [`StateMachine::transition_to`]; this just applies it.
    pub fn set_status(&mut self, status: RunStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Reverts an awaiting-consent run after a declined introduction:
    /// back to forum-posted when a post exists, collecting otherwise.
    pub fn revert_after_decline(&mut self) {
        self.suggested_candidate = None;
        let status = if self.forum_post.is_some() {
            RunStatus::ForumPosted
        } else {
            RunStatus::Collecting
        };
        self.set_status(status);
    }

    /// Attaches the forum post created by the fallback.
    pub fn attach_forum_post(&mut self, post_id: PostId) {
        self.forum_post = Some(ForumPostRef {
            post_id,
            posted_at: Utc::now(),
        });
        self.set_status(RunStatus::ForumPosted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> OutreachRun {
        OutreachRun::new(
            UserId::new("requester").unwrap(),
            ConversationId::new(),
            CampusId::new("campus-1").unwrap(),
            "anyone into chess?",
            IntentKind::PeopleSearch,
            vec!["chess".to_string()],
            0.75,
            25,
        )
    }

    #[test]
    fn new_run_is_collecting() {
        let run = run();
        assert_eq!(run.status, RunStatus::Collecting);
        assert_eq!(run.batch_number, 1);
        assert_eq!(run.expansions, 0);
        assert!(!run.is_terminal());
    }

    #[test]
    fn terminal_statuses_have_no_transitions() {
        assert!(RunStatus::Done.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(!RunStatus::Collecting.is_terminal());
    }

    #[test]
    fn awaiting_consent_can_revert() {
        assert!(RunStatus::AwaitingConsent.can_transition_to(&RunStatus::Collecting));
        assert!(RunStatus::AwaitingConsent.can_transition_to(&RunStatus::ForumPosted));
        assert!(RunStatus::AwaitingConsent.can_transition_to(&RunStatus::Done));
    }

    #[test]
    fn revert_after_decline_picks_collecting_without_post() {
        let mut run = run();
        run.set_status(RunStatus::AwaitingConsent);
        run.suggested_candidate = Some(SuggestedCandidate {
            user: UserId::new("candidate").unwrap(),
            consent: true,
            confidence: 0.85,
        });

        run.revert_after_decline();
        assert_eq!(run.status, RunStatus::Collecting);
        assert!(run.suggested_candidate.is_none());
    }

    #[test]
    fn revert_after_decline_picks_forum_posted_with_post() {
        let mut run = run();
        run.attach_forum_post(PostId::new());
        run.set_status(RunStatus::AwaitingConsent);

        run.revert_after_decline();
        assert_eq!(run.status, RunStatus::ForumPosted);
    }

    #[test]
    fn collecting_cannot_jump_back_from_done() {
        assert!(!RunStatus::Done.can_transition_to(&RunStatus::Collecting));
    }
}
