//! Intent routing: lexical heuristics with a model fallback.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::domain::conversation::intent::{classify, expand_tags, extract_topic_tags};
use crate::domain::conversation::{IntentKind, IntentResult};
use crate::ports::{GenerationRequest, TextGeneration};

/// Routes inbound messages to an intent.
///
/// The lexical classifier decides almost everything; the model is only
/// consulted for messages the heuristics cannot place, and its failure
/// leaves the heuristic verdict standing.
pub struct IntentRouter {
    text_generation: Arc<dyn TextGeneration>,
}

impl IntentRouter {
    pub fn new(text_generation: Arc<dyn TextGeneration>) -> Self {
        Self { text_generation }
    }

    /// Classifies a message, expanding topic tags with synonyms.
    pub async fn route(
        &self,
        text: &str,
        consent_pending: bool,
        has_active_task: bool,
    ) -> IntentResult {
        let mut result = classify(text, consent_pending, has_active_task);
        result.topic_tags = expand_tags(&result.topic_tags);

        if result.intent != IntentKind::Unknown {
            return result;
        }

        match self
            .text_generation
            .generate_json(GenerationRequest::deterministic(routing_prompt(text)))
            .await
        {
            Ok(value) => {
                if let Some(intent) = parse_intent(&value) {
                    result.intent = intent;
                }
                if let Some(tags) = parse_tags(&value) {
                    result.topic_tags = expand_tags(&tags);
                }
                result
            }
            Err(err) => {
                warn!(error = %err, "intent routing degraded to heuristics");
                result
            }
        }
    }
}

fn routing_prompt(text: &str) -> String {
    format!(
        "Classify this user message for a campus assistant.\n\n\
         Message: \"{}\"\n\n\
         Return JSON:\n\
         {{\n\
           \"intent\": \"greeting|small_talk|followup|count_query|event_search|club_search|campus_info|people_search|unknown\",\n\
           \"tags\": [\"topic\", \"keywords\"]\n\
         }}",
        text
    )
}

fn parse_intent(value: &Value) -> Option<IntentKind> {
    match value.get("intent").and_then(Value::as_str)? {
        "greeting" => Some(IntentKind::Greeting),
        "small_talk" => Some(IntentKind::SmallTalk),
        "followup" => Some(IntentKind::Followup),
        "count_query" => Some(IntentKind::CountQuery),
        "event_search" => Some(IntentKind::EventSearch),
        "club_search" => Some(IntentKind::ClubSearch),
        "campus_info" => Some(IntentKind::CampusInfo),
        "people_search" => Some(IntentKind::PeopleSearch),
        _ => None,
    }
}

fn parse_tags(value: &Value) -> Option<Vec<String>> {
    let tags = value.get("tags")?.as_array()?;
    let parsed: Vec<String> = tags
        .iter()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if parsed.is_empty() {
        // Keep the lexical tags when the model returns nothing usable.
        None
    } else {
        Some(parsed)
    }
}

/// Topic tags for a query without running the router (used by callers
/// that already know the intent).
pub fn tags_for(text: &str) -> Vec<String> {
    expand_tags(&extract_topic_tags(&text.to_lowercase()))
}
