//! Heuristic intent classification and topic-tag extraction.
//!
//! Lexical rules handle the common cases without any model call; the
//! application-layer router only consults the text-generation capability
//! when these heuristics come up empty.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of intents the engine routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Greeting,
    SmallTalk,
    Followup,
    ConsentResponse,
    CancelTask,
    CountQuery,
    EventSearch,
    ClubSearch,
    CampusInfo,
    PeopleSearch,
    Unknown,
}

impl IntentKind {
    /// Intents answerable from structured records.
    pub fn is_structured_info(&self) -> bool {
        matches!(
            self,
            IntentKind::CountQuery
                | IntentKind::EventSearch
                | IntentKind::ClubSearch
                | IntentKind::CampusInfo
        )
    }
}

/// Classified intent with the topic tags pulled from the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: IntentKind,
    pub topic_tags: Vec<String>,
    pub raw: String,
}

const GREETINGS: &[&str] = &["yo", "hey", "hi", "sup", "what's up", "whats up", "wyd"];
const CANCEL_PREFIXES: &[&str] = &["cancel", "stop", "end", "drop", "never mind", "nevermind"];
const AFFIRMATIVE: &[&str] = &["yes", "yep", "yeah", "yup", "sure", "ok", "okay"];
const NEGATIVE: &[&str] = &["no", "nope", "nah"];
const SMALL_TALK_PROBES: &[&str] = &["how are you", "how's your day", "what's good", "hru"];
const PEOPLE_MARKERS: &[&str] = &[
    "find", "anyone", "someone", "people", "person", "connect me", "looking for",
];
const CLUB_MARKERS: &[&str] = &["club", "clubs", "org", "organization", "organizations"];
const EVENT_MARKERS: &[&str] = &["event", "events", "party", "show", "concert", "talk"];
const CAMPUS_MARKERS: &[&str] = &[
    "campus", "library", "gym", "dining", "hours", "where is", "where's",
];
const COUNT_MARKERS: &[&str] = &["how many", "count", "number of"];

static TAG_SYNONYMS: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([(
        "cs",
        vec!["computer science", "comp sci", "comp-sci", "compsci"],
    )])
});

/// Extracts lowercase topic tags: alphanumeric words longer than two
/// characters, first eight in order of appearance.
pub fn extract_topic_tags(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| w.len() > 2)
        .map(|w| w.to_lowercase())
        .take(8)
        .collect()
}

/// Expands tags with known synonyms, deduplicating while preserving order.
pub fn expand_tags(tags: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if !expanded.contains(&tag) {
            expanded.push(tag.clone());
        }
        if let Some(synonyms) = TAG_SYNONYMS.get(tag.as_str()) {
            for synonym in synonyms {
                let synonym = synonym.to_string();
                if !expanded.contains(&synonym) {
                    expanded.push(synonym);
                }
            }
        }
    }
    expanded
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Classifies a message with lexical heuristics alone.
///
/// `consent_pending` tells the classifier that a bare yes/no should be
/// read as a consent response rather than a follow-up; `has_active_task`
/// makes unmatched text default to a follow-up instead of Unknown.
pub fn classify(text: &str, consent_pending: bool, has_active_task: bool) -> IntentResult {
    let raw = text.to_string();
    let normalized = text.trim().to_lowercase();
    let topic_tags = extract_topic_tags(&normalized);

    let intent = classify_normalized(&normalized, consent_pending, has_active_task);

    IntentResult {
        intent,
        topic_tags,
        raw,
    }
}

fn classify_normalized(text: &str, consent_pending: bool, has_active_task: bool) -> IntentKind {
    if text.is_empty() {
        return IntentKind::Unknown;
    }

    if CANCEL_PREFIXES.iter().any(|p| text.starts_with(p))
        || text.contains("end that task")
        || text.contains("stop asking")
    {
        return IntentKind::CancelTask;
    }

    if AFFIRMATIVE.contains(&text) || NEGATIVE.contains(&text) {
        if consent_pending {
            return IntentKind::ConsentResponse;
        }
        return IntentKind::Followup;
    }

    if GREETINGS.contains(&text) || text.len() <= 3 {
        return IntentKind::Greeting;
    }

    if contains_any(text, SMALL_TALK_PROBES) {
        return IntentKind::SmallTalk;
    }

    if contains_any(text, COUNT_MARKERS) {
        return IntentKind::CountQuery;
    }

    if contains_any(text, CLUB_MARKERS) {
        return IntentKind::ClubSearch;
    }

    if contains_any(text, EVENT_MARKERS) {
        return IntentKind::EventSearch;
    }

    if contains_any(text, PEOPLE_MARKERS) {
        return IntentKind::PeopleSearch;
    }

    if contains_any(text, CAMPUS_MARKERS) {
        return IntentKind::CampusInfo;
    }

    if has_active_task {
        return IntentKind::Followup;
    }

    IntentKind::Unknown
}

/// Reads an affirmative/negative out of a short consent reply.
pub fn parse_consent_answer(text: &str) -> Option<bool> {
    let normalized = text.trim().to_lowercase();
    if AFFIRMATIVE.contains(&normalized.as_str()) {
        return Some(true);
    }
    if NEGATIVE.contains(&normalized.as_str()) {
        return Some(false);
    }
    None
}
