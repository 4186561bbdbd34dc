//! Confidence scorers.
//!
//! Every function here is pure: raw signals in, a score in [0,1] out.
//! The weights are empirical calibration values, exposed as named
//! constants so they can be reasoned about in one place.

use std::collections::HashSet;

use super::interpreter::{ConsentSignal, ReplyType};

/// Score for a self-claim reply with explicit consent.
pub const SELF_CLAIM_CONSENTING: f64 = 0.85;
/// Score for a self-claim reply without explicit consent.
pub const SELF_CLAIM_BASE: f64 = 0.65;
/// Score for a referral reply.
pub const REFERRAL_BASE: f64 = 0.55;
/// Added per corroborating reply from the same candidate.
pub const CORROBORATION_BONUS: f64 = 0.05;
/// Ceiling for any candidate confidence.
pub const CANDIDATE_CAP: f64 = 0.95;

/// Base of the run-level outreach confidence.
pub const OUTREACH_BASE: f64 = 0.4;
/// Added per satisfied signal group in the run-level score.
pub const OUTREACH_SIGNAL_BONUS: f64 = 0.2;
/// Ceiling for the run-level outreach confidence.
pub const OUTREACH_CAP: f64 = 0.95;
/// Floor reported when no replies arrived at all.
pub const NO_REPLY_FLOOR: f64 = 0.1;

const EVENT_TOKENS: &[&str] = &["event", "meet", "session", "talk"];
const TIME_PLACE_TOKENS: &[&str] = &["pm", "am", "tonight", "today", "at ", "location", "room"];
const CONTACT_TOKENS: &[&str] = &[
    "discord", "email", "ig", "instagram", "group chat", "flyer",
];

/// Base score for a single interpreted reply.
///
/// Replies with an unknown type score zero and are excluded from
/// candidate aggregation entirely.
pub fn reply_base_score(reply_type: ReplyType, consent: ConsentSignal) -> f64 {
    match reply_type {
        ReplyType::SelfClaim => {
            if consent == ConsentSignal::Yes {
                SELF_CLAIM_CONSENTING
            } else {
                SELF_CLAIM_BASE
            }
        }
        ReplyType::Referral => REFERRAL_BASE,
        ReplyType::Unknown => 0.0,
    }
}

/// Run-level confidence over all reply texts, independent of any single
/// candidate. Judges whether the replies collectively answer the ask.
pub fn outreach_confidence(reply_texts: &[String]) -> f64 {
    if reply_texts.is_empty() {
        return NO_REPLY_FLOOR;
    }

    let lowered: Vec<String> = reply_texts.iter().map(|t| t.to_lowercase()).collect();
    let any_contains =
        |tokens: &[&str]| lowered.iter().any(|t| tokens.iter().any(|tok| t.contains(tok)));

    let mut score = OUTREACH_BASE;
    if any_contains(EVENT_TOKENS) {
        score += OUTREACH_SIGNAL_BONUS;
    }
    if any_contains(TIME_PLACE_TOKENS) {
        score += OUTREACH_SIGNAL_BONUS;
    }
    if any_contains(CONTACT_TOKENS) {
        score += OUTREACH_SIGNAL_BONUS;
    }
    if reply_texts.len() >= 2 {
        score += OUTREACH_SIGNAL_BONUS;
    }

    score.min(OUTREACH_CAP)
}

/// Jaccard agreement between two retrieval passes' identifier sets.
///
/// 1.0 when both passes return nothing, 0.0 when exactly one does.
pub fn retrieval_agreement(first: &HashSet<String>, second: &HashSet<String>) -> f64 {
    if first.is_empty() && second.is_empty() {
        return 1.0;
    }
    if first.is_empty() || second.is_empty() {
        return 0.0;
    }
    let intersection = first.intersection(second).count() as f64;
    let union = first.union(second).count() as f64;
    intersection / union
}

/// Direct-answer confidence for the non-outreach path.
///
/// Count baseline × dual-retrieval agreement × source-quality ratio,
/// rounded to two decimals. The quality ratio is the fraction of results
/// that are consent-verified; an empty result set keeps ratio 1.0 so the
/// zero-result baseline survives the product.
pub fn direct_answer_confidence(
    result_count: usize,
    verified_count: usize,
    first_pass_ids: &HashSet<String>,
    second_pass_ids: &HashSet<String>,
) -> f64 {
    let base = match result_count {
        0 => 0.1,
        1..=2 => 0.5,
        _ => 0.8,
    };

    let agreement = retrieval_agreement(first_pass_ids, second_pass_ids);

    let quality = if result_count == 0 {
        1.0
    } else {
        verified_count.min(result_count) as f64 / result_count as f64
    };

    round2(base * agreement * quality)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn self_claim_with_consent_scores_highest() {
        assert_eq!(
            reply_base_score(ReplyType::SelfClaim, ConsentSignal::Yes),
            0.85
        );
        assert_eq!(
            reply_base_score(ReplyType::SelfClaim, ConsentSignal::No),
            0.65
        );
        assert_eq!(
            reply_base_score(ReplyType::SelfClaim, ConsentSignal::Unknown),
            0.65
        );
        assert_eq!(
            reply_base_score(ReplyType::Referral, ConsentSignal::Yes),
            0.55
        );
        assert_eq!(
            reply_base_score(ReplyType::Unknown, ConsentSignal::Yes),
            0.0
        );
    }

    #[test]
    fn zero_replies_floor_at_point_one() {
        assert_eq!(outreach_confidence(&[]), 0.1);
    }

    #[test]
    fn signal_groups_stack_up_to_cap() {
        let replies = vec![
            "we meet tonight at 8pm in room 204".to_string(),
            "join the discord, link on the flyer".to_string(),
        ];
        // event + time/place + contact + two replies = 0.4 + 4*0.2, capped
        assert_eq!(outreach_confidence(&replies), 0.95);
    }

    #[test]
    fn single_bland_reply_stays_at_base() {
        let replies = vec!["maybe".to_string()];
        assert_eq!(outreach_confidence(&replies), 0.4);
    }

    #[test]
    fn agreement_is_one_when_both_empty() {
        assert_eq!(retrieval_agreement(&ids(&[]), &ids(&[])), 1.0);
    }

    #[test]
    fn agreement_is_zero_when_one_empty() {
        assert_eq!(retrieval_agreement(&ids(&["a"]), &ids(&[])), 0.0);
        assert_eq!(retrieval_agreement(&ids(&[]), &ids(&["a"])), 0.0);
    }

    #[test]
    fn agreement_is_jaccard_overlap() {
        let a = ids(&["a", "b", "c"]);
        let b = ids(&["b", "c", "d"]);
        assert_eq!(retrieval_agreement(&a, &b), 0.5);
    }

    #[test]
    fn direct_answer_confidence_multiplies_factors() {
        let pass = ids(&["a", "b", "c"]);
        // 3 results, all verified, perfect agreement: 0.8 * 1.0 * 1.0
        assert_eq!(direct_answer_confidence(3, 3, &pass, &pass), 0.8);
        // half verified
        let score = direct_answer_confidence(2, 1, &pass, &pass);
        assert_eq!(score, 0.25);
    }

    #[test]
    fn zero_results_keep_the_floor() {
        assert_eq!(direct_answer_confidence(0, 0, &ids(&[]), &ids(&[])), 0.1);
    }

    proptest! {
        #[test]
        fn outreach_confidence_stays_in_unit_interval(replies in proptest::collection::vec(".*", 0..6)) {
            let score = outreach_confidence(&replies);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn direct_answer_confidence_stays_in_unit_interval(
            result_count in 0usize..20,
            verified_count in 0usize..20,
            a in proptest::collection::hash_set("[a-z]{1,4}", 0..8),
            b in proptest::collection::hash_set("[a-z]{1,4}", 0..8),
        ) {
            let score = direct_answer_confidence(result_count, verified_count, &a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn reply_base_scores_stay_in_unit_interval(
            reply_type in prop_oneof![
                Just(ReplyType::SelfClaim),
                Just(ReplyType::Referral),
                Just(ReplyType::Unknown)
            ],
            consent in prop_oneof![
                Just(ConsentSignal::Yes),
                Just(ConsentSignal::No),
                Just(ConsentSignal::Unknown)
            ],
        ) {
            let score = reply_base_score(reply_type, consent);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
