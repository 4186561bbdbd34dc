//! Consent coordination: resolving two-sided consent into an
//! introduction or a continued search.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::conversation::{ConversationMode, TaskResult};
use crate::domain::foundation::{ChannelId, DomainError, RunId, UserId};
use crate::domain::outreach::{messages, OutreachRun, RunStatus, TargetStatus};
use crate::ports::{
    ConversationStateRepository, Messaging, OutreachRunRepository, OutreachTargetRepository,
};

/// Result of a consent resolution.
#[derive(Debug, Clone)]
pub struct ConsentOutcome {
    pub status: RunStatus,
    pub channel: Option<ChannelId>,
}

/// Resolves requester/candidate consent for a suggested introduction.
pub struct ConsentCoordinator {
    runs: Arc<dyn OutreachRunRepository>,
    targets: Arc<dyn OutreachTargetRepository>,
    states: Arc<dyn ConversationStateRepository>,
    messaging: Arc<dyn Messaging>,
}

impl ConsentCoordinator {
    pub fn new(
        runs: Arc<dyn OutreachRunRepository>,
        targets: Arc<dyn OutreachTargetRepository>,
        states: Arc<dyn ConversationStateRepository>,
        messaging: Arc<dyn Messaging>,
    ) -> Self {
        Self {
            runs,
            targets,
            states,
            messaging,
        }
    }

    /// Resolves both consent signals for a run.
    ///
    /// Idempotent by run identity: resolving an already-`Done` or
    /// `Failed` run reports the terminal status and performs no side
    /// effects, so a repeated both-true call never creates a second
    /// channel.
    pub async fn resolve(
        &self,
        run_id: RunId,
        requester_ok: bool,
        target_ok: bool,
    ) -> Result<ConsentOutcome, DomainError> {
        let mut run = match self.runs.find(&run_id).await? {
            Some(run) => run,
            None => return Err(DomainError::run_not_found(run_id)),
        };
        if run.is_terminal() {
            return Ok(ConsentOutcome {
                status: run.status,
                channel: None,
            });
        }

        let candidate = match run.suggested_candidate.clone() {
            Some(candidate) => candidate.user,
            None => {
                return Err(DomainError::validation(
                    "suggested_candidate",
                    "run has no suggested candidate to resolve consent for",
                ))
            }
        };

        match (requester_ok, target_ok) {
            (true, true) => self.connect(&mut run, &candidate).await,
            (false, true) => {
                self.notify_candidate(&candidate, &messages::requester_moved_on())
                    .await;
                self.keep_searching(
                    &mut run,
                    &candidate,
                    &messages::kept_searching_after_requester_decline(),
                )
                .await
            }
            (true, false) => {
                self.keep_searching(&mut run, &candidate, &messages::candidate_unavailable())
                    .await
            }
            (false, false) => self.fail(&mut run).await,
        }
    }

    /// Both sides agreed: create the shared channel and close the run.
    async fn connect(
        &self,
        run: &mut OutreachRun,
        candidate: &UserId,
    ) -> Result<ConsentOutcome, DomainError> {
        let channel = self
            .messaging
            .create_group(&[run.requester.clone(), candidate.clone()])
            .await?;
        if let Err(err) = self.messaging.send(&channel, &messages::introduction()).await {
            warn!(error = %err, "introduction message failed");
        }

        run.set_status(RunStatus::Done);
        self.runs.update(run).await?;
        info!(run = %run.id, candidate = %candidate, "introduction created");

        self.notify_requester(&run.requester, &messages::connected())
            .await;
        self.settle_requester_state(run, TaskResult::Connected { run_id: run.id })
            .await;

        Ok(ConsentOutcome {
            status: RunStatus::Done,
            channel: Some(channel),
        })
    }

    /// One side declined: revert the run, mark the target declined, and
    /// leave the campaign open for future candidates.
    async fn keep_searching(
        &self,
        run: &mut OutreachRun,
        candidate: &UserId,
        requester_note: &str,
    ) -> Result<ConsentOutcome, DomainError> {
        run.revert_after_decline();
        self.runs.update(run).await?;
        info!(run = %run.id, candidate = %candidate, "introduction declined, search continues");

        self.decline_target(run, candidate).await;
        self.notify_requester(&run.requester, requester_note).await;
        self.settle_requester_state(run, TaskResult::Declined { run_id: run.id })
            .await;

        Ok(ConsentOutcome {
            status: run.status,
            channel: None,
        })
    }

    /// Neither side agreed: the run fails terminally.
    async fn fail(&self, run: &mut OutreachRun) -> Result<ConsentOutcome, DomainError> {
        run.set_status(RunStatus::Failed);
        self.runs.update(run).await?;
        info!(run = %run.id, "consent refused on both sides");

        self.notify_requester(&run.requester, &messages::no_connection())
            .await;
        self.settle_requester_state(run, TaskResult::Declined { run_id: run.id })
            .await;

        Ok(ConsentOutcome {
            status: RunStatus::Failed,
            channel: None,
        })
    }

    /// Marks the candidate's target row declined (best-effort).
    async fn decline_target(&self, run: &OutreachRun, candidate: &UserId) {
        let targets = match self.targets.list_by_run(&run.id).await {
            Ok(targets) => targets,
            Err(err) => {
                warn!(error = %err, "target list unavailable for decline");
                return;
            }
        };
        let Some(mut target) = targets.into_iter().find(|t| &t.target_user == candidate) else {
            debug!(run = %run.id, "declined candidate had no target row");
            return;
        };
        target.status = TargetStatus::Declined;
        if let Err(err) = self.targets.update(&target).await {
            warn!(error = %err, "target decline update failed");
        }
    }

    /// Clears the pending consent and logs the terminal task record.
    async fn settle_requester_state(&self, run: &OutreachRun, result: TaskResult) {
        match self.states.find(&run.requester, &run.conversation).await {
            Ok(Some(mut state)) => {
                state.mode = ConversationMode::Conversation;
                state.clear_pending_consent(run.id);
                state.log_resolved(run.query.clone(), Some(run.id), result);
                if let Err(err) = self.states.save(&state).await {
                    warn!(error = %err, "conversation state update failed");
                }
            }
            Ok(None) => debug!(run = %run.id, "no conversation state to settle"),
            Err(err) => warn!(error = %err, "conversation state load failed"),
        }
    }

    async fn notify_requester(&self, requester: &UserId, body: &str) {
        match self.messaging.open_direct(requester).await {
            Ok(channel) => {
                if let Err(err) = self.messaging.send(&channel, body).await {
                    warn!(error = %err, "requester notification failed");
                }
            }
            Err(err) => warn!(error = %err, "requester channel unavailable"),
        }
    }

    async fn notify_candidate(&self, candidate: &UserId, body: &str) {
        match self.messaging.open_direct(candidate).await {
            Ok(channel) => {
                if let Err(err) = self.messaging.send(&channel, body).await {
                    warn!(error = %err, "candidate notification failed");
                }
            }
            Err(err) => warn!(error = %err, "candidate channel unavailable"),
        }
    }
}
