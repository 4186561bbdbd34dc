//! Pure conversational mode transitions.
//!
//! The single decision table for how an inbound message moves a
//! conversation between modes. No side effects; persistence and any
//! run-lifecycle consequences are the caller's responsibility.

use super::intent::{IntentKind, IntentResult};
use super::mode::ConversationMode;
use super::task::{Task, TaskKind, TaskStatus};

/// Outcome of a transition decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub mode: ConversationMode,
    pub active_task: Option<Task>,
}

/// Decides the next mode and active task for an inbound message.
///
/// Rules are checked in order: cancel, greeting/small-talk, consent
/// response, follow-up, structured-info queries, people search,
/// fallback. `db_answerable` routes a people search to the agent path
/// when structured records can already satisfy it.
pub fn determine_transition(
    current_mode: ConversationMode,
    intent: &IntentResult,
    text: &str,
    active_task: Option<Task>,
    db_answerable: bool,
) -> Transition {
    let text = text.trim();

    match intent.intent {
        IntentKind::CancelTask => Transition {
            mode: ConversationMode::Conversation,
            active_task: None,
        },

        IntentKind::Greeting | IntentKind::SmallTalk => Transition {
            mode: ConversationMode::Conversation,
            active_task,
        },

        IntentKind::ConsentResponse => Transition {
            mode: ConversationMode::AwaitingConsent,
            active_task,
        },

        IntentKind::Followup => Transition {
            mode: if current_mode == ConversationMode::Idle {
                ConversationMode::Conversation
            } else {
                current_mode
            },
            active_task,
        },

        IntentKind::CountQuery
        | IntentKind::EventSearch
        | IntentKind::ClubSearch
        | IntentKind::CampusInfo => {
            let mut task = active_task
                .filter(|t| !t.is_terminal())
                .unwrap_or_else(|| Task::new(TaskKind::DbQuery, text));
            task.status = TaskStatus::Searching;
            Transition {
                mode: ConversationMode::Agent,
                active_task: Some(task),
            }
        }

        IntentKind::PeopleSearch => {
            let mut task = active_task
                .filter(|t| !t.is_terminal() && t.kind == TaskKind::PeopleSearch)
                .unwrap_or_else(|| Task::new(TaskKind::PeopleSearch, text));
            if db_answerable {
                task.status = TaskStatus::Searching;
                Transition {
                    mode: ConversationMode::Agent,
                    active_task: Some(task),
                }
            } else {
                task.status = TaskStatus::OutreachSent;
                Transition {
                    mode: ConversationMode::Outreach,
                    active_task: Some(task),
                }
            }
        }

        IntentKind::Unknown => Transition {
            mode: ConversationMode::Conversation,
            active_task,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::intent::classify;

    fn intent_for(text: &str) -> IntentResult {
        classify(text, false, false)
    }

    #[test]
    fn cancel_clears_task_and_returns_to_conversation() {
        let task = Task::new(TaskKind::PeopleSearch, "chess partner");
        let transition = determine_transition(
            ConversationMode::Outreach,
            &intent_for("cancel that"),
            "cancel that",
            Some(task),
            false,
        );
        assert_eq!(transition.mode, ConversationMode::Conversation);
        assert!(transition.active_task.is_none());
    }

    #[test]
    fn greeting_preserves_active_task() {
        let task = Task::new(TaskKind::PeopleSearch, "chess partner");
        let transition = determine_transition(
            ConversationMode::Outreach,
            &intent_for("hey"),
            "hey",
            Some(task.clone()),
            false,
        );
        assert_eq!(transition.mode, ConversationMode::Conversation);
        assert_eq!(transition.active_task.map(|t| t.id), Some(task.id));
    }

    #[test]
    fn consent_response_enters_awaiting_consent() {
        let intent = classify("yes", true, true);
        let transition =
            determine_transition(ConversationMode::AwaitingConsent, &intent, "yes", None, false);
        assert_eq!(transition.mode, ConversationMode::AwaitingConsent);
    }

    #[test]
    fn followup_preserves_mode_and_task() {
        let intent = classify("the one near the quad", false, true);
        let task = Task::new(TaskKind::DbQuery, "events tonight");
        let transition = determine_transition(
            ConversationMode::Agent,
            &intent,
            "the one near the quad",
            Some(task.clone()),
            false,
        );
        assert_eq!(transition.mode, ConversationMode::Agent);
        assert_eq!(transition.active_task.map(|t| t.id), Some(task.id));
    }

    #[test]
    fn structured_info_starts_db_query_task() {
        let transition = determine_transition(
            ConversationMode::Idle,
            &intent_for("any events tonight?"),
            "any events tonight?",
            None,
            false,
        );
        assert_eq!(transition.mode, ConversationMode::Agent);
        let task = transition.active_task.unwrap();
        assert_eq!(task.kind, TaskKind::DbQuery);
        assert_eq!(task.status, TaskStatus::Searching);
    }

    #[test]
    fn people_search_goes_to_agent_when_db_answerable() {
        let transition = determine_transition(
            ConversationMode::Idle,
            &intent_for("anyone into tennis?"),
            "anyone into tennis?",
            None,
            true,
        );
        assert_eq!(transition.mode, ConversationMode::Agent);
        assert_eq!(
            transition.active_task.unwrap().status,
            TaskStatus::Searching
        );
    }

    #[test]
    fn people_search_goes_to_outreach_otherwise() {
        let transition = determine_transition(
            ConversationMode::Idle,
            &intent_for("anyone into tennis?"),
            "anyone into tennis?",
            None,
            false,
        );
        assert_eq!(transition.mode, ConversationMode::Outreach);
        let task = transition.active_task.unwrap();
        assert_eq!(task.kind, TaskKind::PeopleSearch);
        assert_eq!(task.status, TaskStatus::OutreachSent);
    }

    #[test]
    fn unknown_falls_back_to_conversation_keeping_task() {
        let intent = classify("the weather is weird", false, false);
        let task = Task::new(TaskKind::PeopleSearch, "chess partner");
        let transition = determine_transition(
            ConversationMode::Outreach,
            &intent,
            "the weather is weird",
            Some(task.clone()),
            false,
        );
        assert_eq!(transition.mode, ConversationMode::Conversation);
        assert_eq!(transition.active_task.map(|t| t.id), Some(task.id));
    }
}
