//! Candidate scores derived from interpreted replies.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

use super::interpreter::{ConsentSignal, Interpretation, ReplyType};
use super::scoring::{reply_base_score, CANDIDATE_CAP, CORROBORATION_BONUS};

/// Derived, transient score for one candidate within a run.
///
/// Recomputed on every collection pass from all replies attributed to
/// that candidate; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub user_id: UserId,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub support_count: u32,
    pub consent: bool,
}

impl CandidateScore {
    fn from_reply(user_id: UserId, interpretation: &Interpretation) -> Self {
        Self {
            user_id,
            confidence: reply_base_score(interpretation.reply_type, interpretation.consent),
            evidence: interpretation.evidence.clone(),
            support_count: 1,
            consent: interpretation.consent == ConsentSignal::Yes,
        }
    }

    fn corroborate(&mut self, interpretation: &Interpretation) {
        self.support_count += 1;
        self.confidence = (self.confidence + CORROBORATION_BONUS).min(CANDIDATE_CAP);
        for item in &interpretation.evidence {
            if !self.evidence.contains(item) {
                self.evidence.push(item.clone());
            }
        }
        self.consent = self.consent || interpretation.consent == ConsentSignal::Yes;
    }
}

/// Folds interpreted replies into per-candidate scores, ordered by
/// confidence descending. Unknown-type replies are excluded entirely.
pub fn aggregate_candidates(replies: &[(UserId, Interpretation)]) -> Vec<CandidateScore> {
    let mut scores: Vec<CandidateScore> = Vec::new();

    for (user_id, interpretation) in replies {
        if interpretation.reply_type == ReplyType::Unknown {
            continue;
        }
        match scores.iter_mut().find(|c| &c.user_id == user_id) {
            Some(existing) => existing.corroborate(interpretation),
            None => scores.push(CandidateScore::from_reply(user_id.clone(), interpretation)),
        }
    }

    scores.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn interp(reply_type: ReplyType, consent: ConsentSignal, evidence: &str) -> Interpretation {
        Interpretation {
            reply_type,
            consent,
            evidence: vec![evidence.to_string()],
        }
    }

    #[test]
    fn single_consenting_self_claim_scores_at_least_point_eighty_five() {
        let replies = vec![(
            user("a"),
            interp(ReplyType::SelfClaim, ConsentSignal::Yes, "self_claim"),
        )];
        let scores = aggregate_candidates(&replies);
        assert_eq!(scores.len(), 1);
        assert!(scores[0].confidence >= 0.85);
        assert!(scores[0].consent);
    }

    #[test]
    fn corroboration_adds_bonus_and_unions_evidence() {
        let replies = vec![
            (
                user("a"),
                interp(ReplyType::SelfClaim, ConsentSignal::Yes, "self_claim"),
            ),
            (
                user("a"),
                interp(ReplyType::Referral, ConsentSignal::Unknown, "referral"),
            ),
        ];
        let scores = aggregate_candidates(&replies);
        assert_eq!(scores.len(), 1);
        assert!((scores[0].confidence - 0.90).abs() < 1e-9);
        assert_eq!(scores[0].support_count, 2);
        assert!(scores[0].consent);
        assert!(scores[0].evidence.contains(&"self_claim".to_string()));
        assert!(scores[0].evidence.contains(&"referral".to_string()));
    }

    #[test]
    fn confidence_caps_at_ninety_five() {
        let replies: Vec<_> = (0..10)
            .map(|_| {
                (
                    user("a"),
                    interp(ReplyType::SelfClaim, ConsentSignal::Yes, "self_claim"),
                )
            })
            .collect();
        let scores = aggregate_candidates(&replies);
        assert!((scores[0].confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn unknown_replies_are_excluded() {
        let replies = vec![
            (user("a"), Interpretation::unknown()),
            (
                user("b"),
                interp(ReplyType::Referral, ConsentSignal::Unknown, "referral"),
            ),
        ];
        let scores = aggregate_candidates(&replies);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].user_id, user("b"));
    }

    #[test]
    fn candidates_ordered_by_confidence() {
        let replies = vec![
            (
                user("referrer"),
                interp(ReplyType::Referral, ConsentSignal::Unknown, "referral"),
            ),
            (
                user("player"),
                interp(ReplyType::SelfClaim, ConsentSignal::Yes, "self_claim"),
            ),
        ];
        let scores = aggregate_candidates(&replies);
        assert_eq!(scores[0].user_id, user("player"));
        assert_eq!(scores[1].user_id, user("referrer"));
    }
}
