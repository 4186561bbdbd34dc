//! Inbound message handler: the engine's front door.
//!
//! One short, synchronous transition per message: classify, update the
//! conversation state machine, and either answer from records, start an
//! outreach run, resolve a pending consent, or just chat.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::answer::DirectAnswerService;
use crate::application::campaign::CampaignManager;
use crate::application::consent::ConsentCoordinator;
use crate::application::intent_router::IntentRouter;
use crate::domain::conversation::intent::parse_consent_answer;
use crate::domain::conversation::{
    determine_transition, ConsentSide, ConversationMode, ConversationState, IntentKind,
    TaskResult, TaskStatus, UserMemory,
};
use crate::domain::foundation::{
    CampusId, ConversationId, DomainError, ErrorCode, RunId, UserId,
};
use crate::domain::outreach::messages;
use crate::ports::{
    ConversationStateRepository, OutreachRunRepository, UserMemoryRepository,
};

/// Command for one inbound chat message.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub user: UserId,
    pub conversation: ConversationId,
    pub campus: CampusId,
    pub text: String,
}

/// What the caller renders back to the user.
#[derive(Debug, Clone)]
pub struct InboundOutcome {
    pub mode: ConversationMode,
    pub confidence: Option<f64>,
    pub answer_text: String,
    pub run_id: Option<RunId>,
    pub task_state: Option<TaskStatus>,
    pub ui_hints: Vec<String>,
}

/// Handler for `handle_inbound_message`.
pub struct HandleInboundMessage {
    states: Arc<dyn ConversationStateRepository>,
    memories: Arc<dyn UserMemoryRepository>,
    runs: Arc<dyn OutreachRunRepository>,
    router: Arc<IntentRouter>,
    answers: Arc<DirectAnswerService>,
    campaign: Arc<CampaignManager>,
    consent: Arc<ConsentCoordinator>,
}

impl HandleInboundMessage {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        states: Arc<dyn ConversationStateRepository>,
        memories: Arc<dyn UserMemoryRepository>,
        runs: Arc<dyn OutreachRunRepository>,
        router: Arc<IntentRouter>,
        answers: Arc<DirectAnswerService>,
        campaign: Arc<CampaignManager>,
        consent: Arc<ConsentCoordinator>,
    ) -> Self {
        Self {
            states,
            memories,
            runs,
            router,
            answers,
            campaign,
            consent,
        }
    }

    pub async fn handle(&self, cmd: InboundCommand) -> Result<InboundOutcome, DomainError> {
        if cmd.text.trim().is_empty() {
            return Err(DomainError::validation("text", "message text cannot be empty"));
        }

        let mut state = match self.states.find(&cmd.user, &cmd.conversation).await? {
            Some(state) => state,
            None => ConversationState::new(cmd.user.clone(), cmd.conversation),
        };

        let consent_pending = state.has_pending_consent();
        let has_task = state.active_task.is_some();
        let intent = self
            .router
            .route(&cmd.text, consent_pending, has_task)
            .await;
        debug!(user = %cmd.user, intent = ?intent.intent, "inbound message classified");

        self.update_memory(&cmd.user, intent.intent, &cmd.text).await;

        if intent.intent == IntentKind::ConsentResponse && consent_pending {
            return self.handle_consent_reply(state, &cmd).await;
        }

        if intent.intent == IntentKind::CancelTask {
            return self.handle_cancel(state).await;
        }

        // Probe records before deciding where a search routes.
        let probe = if intent.intent.is_structured_info()
            || intent.intent == IntentKind::PeopleSearch
        {
            Some(
                self.answers
                    .answer(&cmd.campus, &cmd.text, &intent.topic_tags)
                    .await,
            )
        } else {
            None
        };
        let db_answerable = probe.as_ref().map(|p| p.db_answerable).unwrap_or(false);

        let transition = determine_transition(
            state.mode,
            &intent,
            &cmd.text,
            state.active_task.clone(),
            db_answerable,
        );
        state.apply(transition.mode, transition.active_task);

        match state.mode {
            ConversationMode::Agent => {
                // A follow-up can land here without a fresh probe.
                let (answer_text, confidence) = match probe {
                    Some(probe) => (probe.answer_text, Some(probe.confidence)),
                    None => (
                        "gotcha - tell me a little more and i'm on it.".to_string(),
                        None,
                    ),
                };
                self.states.save(&state).await?;
                Ok(InboundOutcome {
                    mode: state.mode,
                    confidence,
                    answer_text,
                    run_id: state.active_task.as_ref().and_then(|t| t.run_id),
                    task_state: state.active_task.as_ref().map(|t| t.status),
                    ui_hints: Vec::new(),
                })
            }
            ConversationMode::Outreach => self.start_outreach(state, &cmd, &intent).await,
            _ => {
                let (answer_text, ui_hints) = self.chat_reply(&cmd.user, intent.intent).await;
                self.states.save(&state).await?;
                Ok(InboundOutcome {
                    mode: state.mode,
                    confidence: None,
                    answer_text,
                    run_id: state.active_task.as_ref().and_then(|t| t.run_id),
                    task_state: state.active_task.as_ref().map(|t| t.status),
                    ui_hints,
                })
            }
        }
    }

    /// A bare yes/no while a consent question is pending.
    async fn handle_consent_reply(
        &self,
        state: ConversationState,
        cmd: &InboundCommand,
    ) -> Result<InboundOutcome, DomainError> {
        let Some(pending) = state.pending_consents.first().cloned() else {
            // Classifier only emits ConsentResponse with a pending entry.
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "consent response without a pending consent",
            ));
        };

        let Some(answer) = parse_consent_answer(&cmd.text) else {
            return Ok(InboundOutcome {
                mode: ConversationMode::AwaitingConsent,
                confidence: None,
                answer_text: "just reply YES or NO and i'll take it from there.".to_string(),
                run_id: Some(pending.run_id),
                task_state: state.active_task.as_ref().map(|t| t.status),
                ui_hints: vec!["YES".to_string(), "NO".to_string()],
            });
        };

        let run = self.runs.find(&pending.run_id).await?;
        let candidate_consent = run
            .as_ref()
            .and_then(|r| r.suggested_candidate.as_ref())
            .map(|c| c.consent)
            .unwrap_or(false);

        let (requester_ok, target_ok) = match pending.side {
            ConsentSide::Requester => (answer, candidate_consent),
            ConsentSide::Candidate => (true, answer),
        };

        let outcome = self
            .consent
            .resolve(pending.run_id, requester_ok, target_ok)
            .await?;

        // The coordinator rewrote the state; pick up its version.
        let refreshed = self
            .states
            .find(&cmd.user, &cmd.conversation)
            .await?
            .unwrap_or(state);

        let answer_text = match outcome.status {
            crate::domain::outreach::RunStatus::Done => messages::connected(),
            crate::domain::outreach::RunStatus::Failed => messages::no_connection(),
            _ => messages::kept_searching_after_requester_decline(),
        };

        Ok(InboundOutcome {
            mode: refreshed.mode,
            confidence: run.and_then(|r| r.confidence),
            answer_text,
            run_id: Some(pending.run_id),
            task_state: refreshed.active_task.as_ref().map(|t| t.status),
            ui_hints: Vec::new(),
        })
    }

    /// Explicit cancel: fail the active run and clear the task in the
    /// same request.
    async fn handle_cancel(
        &self,
        mut state: ConversationState,
    ) -> Result<InboundOutcome, DomainError> {
        if let Some(task) = state.active_task.clone() {
            if let Some(run_id) = task.run_id {
                match self.campaign.cancel(run_id).await {
                    Ok(()) => info!(run = %run_id, "run cancelled by user"),
                    Err(err) if err.is_not_found() => {
                        debug!(run = %run_id, "cancelled task had no run")
                    }
                    Err(err) => return Err(err),
                }
                state.clear_pending_consent(run_id);
            }
            state.log_resolved(task.query, task.run_id, TaskResult::Cancelled);
        }
        state.apply(ConversationMode::Conversation, None);
        self.states.save(&state).await?;

        Ok(InboundOutcome {
            mode: ConversationMode::Conversation,
            confidence: None,
            answer_text: "okay, dropped that. anything else?".to_string(),
            run_id: None,
            task_state: None,
            ui_hints: Vec::new(),
        })
    }

    /// People search the records can't satisfy: start a campaign.
    async fn start_outreach(
        &self,
        mut state: ConversationState,
        cmd: &InboundCommand,
        intent: &crate::domain::conversation::IntentResult,
    ) -> Result<InboundOutcome, DomainError> {
        let started = self
            .campaign
            .start(
                cmd.user.clone(),
                cmd.conversation,
                cmd.campus.clone(),
                &cmd.text,
                intent.intent,
                intent.topic_tags.clone(),
            )
            .await;

        let run_id = match started {
            Ok(run) => run.id,
            Err(err) if err.code == ErrorCode::ConcurrencyConflict => {
                // The requester already has a live campaign; point the
                // task at it instead of racing a second one.
                match self.runs.find_active_by_requester(&cmd.user).await? {
                    Some(existing) => existing.id,
                    None => return Err(err),
                }
            }
            Err(err) => return Err(err),
        };

        if let Some(task) = state.active_task.as_mut() {
            task.run_id = Some(run_id);
        }
        self.states.save(&state).await?;

        Ok(InboundOutcome {
            mode: ConversationMode::Outreach,
            confidence: None,
            answer_text: messages::collection_started(),
            run_id: Some(run_id),
            task_state: state.active_task.as_ref().map(|t| t.status),
            ui_hints: Vec::new(),
        })
    }

    /// Deterministic conversational replies; no model in the loop.
    async fn chat_reply(&self, user: &UserId, intent: IntentKind) -> (String, Vec<String>) {
        let hints = vec![
            "Find clubs".to_string(),
            "Find events".to_string(),
            "Meet people".to_string(),
        ];
        let like_hint = match self.memories.find(user).await {
            Ok(Some(memory)) => memory
                .likes
                .last()
                .map(|like| format!(" btw, still into {}?", like))
                .unwrap_or_default(),
            _ => String::new(),
        };

        let text = match intent {
            IntentKind::Greeting => format!(
                "hey! what's up? want help finding people, events, or info on campus?{}",
                like_hint
            ),
            IntentKind::SmallTalk => format!("not much! what can i dig up for you?{}", like_hint),
            IntentKind::Followup => "gotcha - tell me a little more and i'm on it.".to_string(),
            _ => "got it - what do you want to find on campus?".to_string(),
        };
        (text, hints)
    }

    /// Best-effort user-memory side channel; never alters the response.
    async fn update_memory(&self, user: &UserId, intent: IntentKind, text: &str) {
        let mut memory = match self.memories.find(user).await {
            Ok(Some(memory)) => memory,
            Ok(None) => UserMemory::new(user.clone()),
            Err(err) => {
                debug!(error = %err, "user memory load skipped");
                return;
            }
        };
        memory.record_interaction(intent, text);
        if let Err(err) = self.memories.save(&memory).await {
            warn!(error = %err, "user memory write failed");
        }
    }
}
