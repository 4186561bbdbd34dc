//! Heuristic reply interpretation.
//!
//! Classifies a free-text outreach reply into a claim type and a consent
//! signal using word-level token matching. The application-layer
//! interpreter only escalates to the text-generation capability when
//! neither claim pattern matches here.

use serde::{Deserialize, Serialize};

/// What kind of claim a reply makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyType {
    /// The respondent claims to satisfy the need themselves.
    SelfClaim,
    /// The respondent points at a third party.
    Referral,
    /// Nothing classifiable.
    Unknown,
}

/// Consent signal read from a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentSignal {
    Yes,
    No,
    Unknown,
}

/// Full interpretation of one reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub reply_type: ReplyType,
    pub consent: ConsentSignal,
    pub evidence: Vec<String>,
}

impl Interpretation {
    /// An interpretation carrying no signal at all.
    pub fn unknown() -> Self {
        Self {
            reply_type: ReplyType::Unknown,
            consent: ConsentSignal::Unknown,
            evidence: Vec::new(),
        }
    }
}

/// Outcome of the heuristic pass.
#[derive(Debug, Clone, PartialEq)]
pub enum HeuristicOutcome {
    /// A claim pattern matched; no model call needed.
    Conclusive(Interpretation),
    /// No claim pattern matched; the consent found so far is carried
    /// into the fallback.
    Inconclusive { consent: ConsentSignal },
}

const AFFIRMATIVE_WORDS: &[&str] = &["yes", "yep", "yeah", "yup", "sure", "ok", "okay"];
const AFFIRMATIVE_PHRASES: &[&str] = &["i'm down", "im down"];
const NEGATIVE_WORDS: &[&str] = &["no", "nah", "nope"];
const NEGATIVE_PHRASES: &[&str] = &["not really"];
const FIRST_PERSON_WORDS: &[&str] = &["i", "me", "i'm", "im"];
const FIRST_PERSON_PHRASES: &[&str] = &["i play", "i do", "i am"];
const REFERRAL_WORDS: &[&str] = &["they", "them", "ask"];
const REFERRAL_PHRASES: &[&str] = &["my friend", "you should ask"];

fn words_of(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn has_word(words: &[String], list: &[&str]) -> bool {
    words.iter().any(|w| list.contains(&w.as_str()))
}

fn has_phrase(text: &str, list: &[&str]) -> bool {
    list.iter().any(|p| text.contains(p))
}

/// Reads the consent signal out of a reply. Negations win ties.
pub fn consent_signal(text: &str) -> ConsentSignal {
    let normalized = text.trim().to_lowercase();
    let words = words_of(&normalized);

    let mut consent = ConsentSignal::Unknown;
    if has_word(&words, AFFIRMATIVE_WORDS) || has_phrase(&normalized, AFFIRMATIVE_PHRASES) {
        consent = ConsentSignal::Yes;
    }
    if has_word(&words, NEGATIVE_WORDS) || has_phrase(&normalized, NEGATIVE_PHRASES) {
        consent = ConsentSignal::No;
    }
    consent
}

/// Runs the lexical pass over a reply.
pub fn interpret_heuristically(text: &str) -> HeuristicOutcome {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return HeuristicOutcome::Conclusive(Interpretation::unknown());
    }

    let consent = consent_signal(&normalized);
    let words = words_of(&normalized);

    if has_word(&words, FIRST_PERSON_WORDS) || has_phrase(&normalized, FIRST_PERSON_PHRASES) {
        return HeuristicOutcome::Conclusive(Interpretation {
            reply_type: ReplyType::SelfClaim,
            consent,
            evidence: vec!["self_claim".to_string()],
        });
    }

    if normalized.contains('@')
        || has_word(&words, REFERRAL_WORDS)
        || has_phrase(&normalized, REFERRAL_PHRASES)
    {
        return HeuristicOutcome::Conclusive(Interpretation {
            reply_type: ReplyType::Referral,
            consent,
            evidence: vec!["referral".to_string()],
        });
    }

    HeuristicOutcome::Inconclusive { consent }
}
