//! Reply interpretation service: heuristics first, model fallback.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::domain::outreach::interpreter::{interpret_heuristically, HeuristicOutcome};
use crate::domain::outreach::{ConsentSignal, Interpretation, ReplyType};
use crate::ports::{GenerationRequest, TextGeneration};

/// Interprets outreach replies, deferring to the text-generation
/// capability only when the lexical pass finds no claim pattern.
pub struct ReplyInterpreter {
    text_generation: Arc<dyn TextGeneration>,
}

impl ReplyInterpreter {
    pub fn new(text_generation: Arc<dyn TextGeneration>) -> Self {
        Self { text_generation }
    }

    /// Classifies one free-text reply.
    ///
    /// Capability failures never propagate: the result degrades to an
    /// unknown claim type carrying whatever consent the heuristics
    /// already found.
    pub async fn interpret(&self, text: &str) -> Interpretation {
        let consent = match interpret_heuristically(text) {
            HeuristicOutcome::Conclusive(interpretation) => return interpretation,
            HeuristicOutcome::Inconclusive { consent } => consent,
        };

        let prompt = classification_prompt(text);
        match self
            .text_generation
            .generate_json(GenerationRequest::deterministic(prompt))
            .await
        {
            Ok(value) => parse_classification(&value, consent),
            Err(err) => {
                warn!(error = %err, "reply classification degraded to heuristics");
                Interpretation {
                    reply_type: ReplyType::Unknown,
                    consent,
                    evidence: Vec::new(),
                }
            }
        }
    }
}

fn classification_prompt(text: &str) -> String {
    format!(
        "Classify this reply to an outreach question.\n\n\
         Reply: \"{}\"\n\n\
         Return JSON:\n\
         {{\n\
           \"reply_type\": \"self_claim|referral|unknown\",\n\
           \"consent\": \"yes|no|unknown\"\n\
         }}",
        text
    )
}

fn parse_classification(value: &Value, heuristic_consent: ConsentSignal) -> Interpretation {
    let reply_type = match value.get("reply_type").and_then(Value::as_str) {
        Some("self_claim") => ReplyType::SelfClaim,
        Some("referral") => ReplyType::Referral,
        _ => ReplyType::Unknown,
    };

    let consent = match value.get("consent").and_then(Value::as_str) {
        Some("yes") => ConsentSignal::Yes,
        Some("no") => ConsentSignal::No,
        _ => heuristic_consent,
    };

    let evidence = match reply_type {
        ReplyType::SelfClaim => vec!["self_claim".to_string()],
        ReplyType::Referral => vec!["referral".to_string()],
        ReplyType::Unknown => Vec::new(),
    };

    Interpretation {
        reply_type,
        consent,
        evidence,
    }
}
