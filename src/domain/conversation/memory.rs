//! Lightweight per-user memory, updated best-effort after each message.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

use super::intent::IntentKind;

/// Interaction counters and extracted preferences for one user.
///
/// Updates to this record are a side channel: a failed write must never
/// alter the primary response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMemory {
    pub user: UserId,
    pub total_interactions: u64,
    pub questions_asked: u64,
    pub likes: Vec<String>,
    pub last_intent: Option<IntentKind>,
    pub last_interaction_at: DateTime<Utc>,
}

const MAX_LIKES: usize = 10;

impl UserMemory {
    /// Fresh memory for a user with no history.
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            total_interactions: 0,
            questions_asked: 0,
            likes: Vec::new(),
            last_intent: None,
            last_interaction_at: Utc::now(),
        }
    }

    /// Folds one inbound message into the memory.
    pub fn record_interaction(&mut self, intent: IntentKind, text: &str) {
        self.total_interactions += 1;
        if intent.is_structured_info() || intent == IntentKind::PeopleSearch {
            self.questions_asked += 1;
        }
        for preference in extract_preferences(text) {
            if !self.likes.contains(&preference) {
                self.likes.push(preference);
            }
        }
        if self.likes.len() > MAX_LIKES {
            let excess = self.likes.len() - MAX_LIKES;
            self.likes.drain(0..excess);
        }
        self.last_intent = Some(intent);
        self.last_interaction_at = Utc::now();
    }
}

static PREFERENCE_MARKERS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["i like ", "i love ", "i enjoy ", "i'm into "]);

/// Extracts simple "i like ..." style preference phrases.
pub fn extract_preferences(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut preferences = Vec::new();
    for marker in PREFERENCE_MARKERS.iter() {
        if let Some(index) = lowered.find(marker) {
            let rest = &lowered[index + marker.len()..];
            let phrase: String = rest
                .chars()
                .take_while(|c| !matches!(c, '.' | ',' | '!' | '?'))
                .collect();
            let phrase = phrase.trim().to_string();
            if !phrase.is_empty() && !preferences.contains(&phrase) {
                preferences.push(phrase);
            }
        }
    }
    preferences
}
