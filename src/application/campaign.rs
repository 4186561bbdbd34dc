//! Outreach campaign manager: run lifecycle from first batch to
//! termination.
//!
//! Every public method is one short, poll-driven state transition
//! against the durable ports; waiting for humans is represented purely
//! as persisted run status.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::application::fact_cache::FactCache;
use crate::application::reply_interpreter::ReplyInterpreter;
use crate::config::OutreachConfig;
use crate::domain::conversation::{
    ConsentSide, ConversationMode, IntentKind, TaskResult, TaskStatus,
};
use crate::domain::foundation::{CampusId, ConversationId, DomainError, RunId, UserId};
use crate::domain::outreach::{
    aggregate_candidates, messages, scoring, CandidateScore, Interpretation, OutreachRun,
    OutreachTarget, RunStatus, SuggestedCandidate, TargetSource, TargetStatus,
};
use crate::ports::{
    ConversationStateRepository, Directory, ForumGateway, Messaging, OutreachRunRepository,
    OutreachTargetRepository,
};

const PROFILE_SCAN_LIMIT: usize = 200;

/// Result of one `collect` pass.
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    pub status: RunStatus,
    pub confidence: Option<f64>,
    pub message: String,
}

/// Owns the outreach campaign lifecycle.
pub struct CampaignManager {
    runs: Arc<dyn OutreachRunRepository>,
    targets: Arc<dyn OutreachTargetRepository>,
    states: Arc<dyn ConversationStateRepository>,
    messaging: Arc<dyn Messaging>,
    directory: Arc<dyn Directory>,
    forum: Arc<dyn ForumGateway>,
    fact_cache: Arc<FactCache>,
    interpreter: Arc<ReplyInterpreter>,
    config: OutreachConfig,
}

impl CampaignManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        runs: Arc<dyn OutreachRunRepository>,
        targets: Arc<dyn OutreachTargetRepository>,
        states: Arc<dyn ConversationStateRepository>,
        messaging: Arc<dyn Messaging>,
        directory: Arc<dyn Directory>,
        forum: Arc<dyn ForumGateway>,
        fact_cache: Arc<FactCache>,
        interpreter: Arc<ReplyInterpreter>,
        config: OutreachConfig,
    ) -> Self {
        Self {
            runs,
            targets,
            states,
            messaging,
            directory,
            forum,
            fact_cache,
            interpreter,
            config,
        }
    }

    /// Starts a run: claims the requester's active slot, contacts the
    /// first batch, and tells the requester that collection has begun.
    pub async fn start(
        &self,
        requester: UserId,
        conversation: ConversationId,
        campus: CampusId,
        query: &str,
        intent: IntentKind,
        topic_tags: Vec<String>,
    ) -> Result<OutreachRun, DomainError> {
        let run = OutreachRun::new(
            requester,
            conversation,
            campus,
            query,
            intent,
            topic_tags,
            self.config.target_confidence_threshold,
            self.config.hard_cap,
        );
        self.runs.claim_active(&run).await?;

        let excluded = self.excluded_for(&run, &[]).await?;
        let batch = self.config.effective_batch_size().min(run.hard_cap);
        let selections = self.select_targets(&run, batch, &excluded).await?;
        let contacted = self.contact_targets(&run, &selections).await;

        info!(run = %run.id, contacted, "outreach run started");
        self.notify_requester(&run.requester, &messages::collection_started())
            .await;

        Ok(run)
    }

    /// Marks a run failed after an explicit cancel. A no-op on runs
    /// already in a terminal status.
    pub async fn cancel(&self, run_id: RunId) -> Result<(), DomainError> {
        let mut run = match self.runs.find(&run_id).await? {
            Some(run) => run,
            None => return Err(DomainError::run_not_found(run_id)),
        };
        if run.is_terminal() {
            return Ok(());
        }
        run.set_status(RunStatus::Failed);
        self.runs.update(&run).await?;
        info!(run = %run_id, "outreach run cancelled");
        Ok(())
    }

    /// One collection pass: polls replies, applies the forum fallback,
    /// expands or terminates, and promotes a qualifying candidate.
    pub async fn collect(&self, run_id: RunId) -> Result<CollectOutcome, DomainError> {
        let mut run = match self.runs.find(&run_id).await? {
            Some(run) => run,
            None => return Err(DomainError::run_not_found(run_id)),
        };
        if run.is_terminal() {
            return Ok(CollectOutcome {
                status: run.status,
                confidence: run.confidence,
                message: "run already finished".to_string(),
            });
        }

        let mut targets = self.targets.list_by_run(&run_id).await?;
        let replies = self.poll_replies(&mut targets).await?;

        if replies.is_empty()
            && run.forum_post.is_none()
            && run.expansions >= self.config.max_expansions
            && targets.len() >= self.config.forum_fallback_min_targets
        {
            if let Some(outcome) = self.try_forum_fallback(&mut run).await? {
                return Ok(outcome);
            }
        }

        if run.forum_post.is_some() {
            self.recruit_forum_commenters(&run, &targets).await?;
        }

        if replies.is_empty() {
            return self.handle_silence(&mut run, targets.len()).await;
        }

        let texts: Vec<String> = replies.iter().map(|(_, text)| text.clone()).collect();
        let interpretations: Vec<(UserId, Interpretation)> =
            futures::future::join_all(replies.iter().map(|(user, text)| async move {
                (user.clone(), self.interpreter.interpret(text).await)
            }))
            .await;
        let candidates = aggregate_candidates(&interpretations);
        let confidence = scoring::outreach_confidence(&texts);
        run.confidence = Some(confidence);

        let summary = format!("{}: {}", run.query, texts[0]);
        if let Err(err) = self
            .fact_cache
            .store_outreach_summary(&run.campus, run.id, &summary, confidence)
            .await
        {
            debug!(error = %err, "outreach fact write skipped");
        }

        if let Some(best) = candidates
            .first()
            .filter(|c| c.confidence >= run.target_confidence_threshold)
        {
            return self.promote_candidate(&mut run, best, confidence).await;
        }

        // Replies exist but nobody qualifies yet; keep asking while the
        // retry budget lasts, otherwise deliver the summarized answer.
        if run.expansions < self.config.max_expansions && targets.len() < run.hard_cap {
            self.expand(&mut run, targets.len()).await?;
            return Ok(CollectOutcome {
                status: run.status,
                confidence: Some(confidence),
                message: "still collecting replies".to_string(),
            });
        }

        run.set_status(RunStatus::Done);
        self.runs.update(&run).await?;
        let answer = format!("here's what i heard back: \"{}\"", texts[0]);
        self.notify_requester(&run.requester, &answer).await;
        self.close_requester_task(&run, TaskResult::Answered { summary }).await;
        Ok(CollectOutcome {
            status: RunStatus::Done,
            confidence: Some(confidence),
            message: answer,
        })
    }

    /// Polls every contacted, non-declined target for its first reply
    /// after `sent_at`, marking fresh repliers. Returns all replies in
    /// the run so candidate scores are recomputed from scratch.
    async fn poll_replies(
        &self,
        targets: &mut [OutreachTarget],
    ) -> Result<Vec<(UserId, String)>, DomainError> {
        let mut replies = Vec::new();
        for target in targets.iter_mut() {
            if target.status == TargetStatus::Declined {
                continue;
            }
            let inbound = match self
                .messaging
                .inbound_since(&target.channel, &target.target_user, target.sent_at)
                .await
            {
                Ok(inbound) => inbound,
                Err(err) => {
                    warn!(error = %err, target = %target.id, "reply poll skipped");
                    continue;
                }
            };
            let Some(first) = inbound.into_iter().next() else {
                continue;
            };
            if target.status == TargetStatus::Sent {
                target.status = TargetStatus::Replied;
                self.targets.update(target).await?;
            }
            replies.push((target.target_user.clone(), first.body));
        }
        Ok(replies)
    }

    /// Publishes the one-and-only anonymous fallback post.
    ///
    /// A forum outage is degraded: the run keeps collecting and the
    /// expiry logic decides its fate.
    async fn try_forum_fallback(
        &self,
        run: &mut OutreachRun,
    ) -> Result<Option<CollectOutcome>, DomainError> {
        let (title, body) = messages::forum_post(&run.topic_tags);
        match self
            .forum
            .publish_anonymous(&run.campus, &title, &body, &run.topic_tags)
            .await
        {
            Ok(post_id) => {
                run.attach_forum_post(post_id);
                self.runs.update(run).await?;
                info!(run = %run.id, post = %post_id, "forum fallback posted");
                self.notify_requester(&run.requester, &messages::forum_posted())
                    .await;
                Ok(Some(CollectOutcome {
                    status: RunStatus::ForumPosted,
                    confidence: None,
                    message: "posted to forum".to_string(),
                }))
            }
            Err(err) => {
                warn!(error = %err, run = %run.id, "forum fallback unavailable");
                Ok(None)
            }
        }
    }

    /// Turns each new forum commenter into an implicit one-on-one
    /// target, up to the run's hard cap.
    async fn recruit_forum_commenters(
        &self,
        run: &OutreachRun,
        targets: &[OutreachTarget],
    ) -> Result<(), DomainError> {
        let Some(post) = &run.forum_post else {
            return Ok(());
        };
        let comments = match self.forum.comments_since(&post.post_id, post.posted_at).await {
            Ok(comments) => comments,
            Err(err) => {
                warn!(error = %err, run = %run.id, "forum comment poll skipped");
                return Ok(());
            }
        };

        let existing: HashSet<&UserId> = targets.iter().map(|t| &t.target_user).collect();
        let budget = run.hard_cap.saturating_sub(targets.len());
        let mut selections: Vec<(UserId, TargetSource)> = Vec::new();
        for comment in comments {
            if selections.len() >= budget {
                break;
            }
            if comment.author == run.requester
                || existing.contains(&comment.author)
                || selections.iter().any(|(u, _)| u == &comment.author)
            {
                continue;
            }
            selections.push((comment.author, TargetSource::ForumComment));
        }

        if !selections.is_empty() {
            let contacted = self.contact_targets(run, &selections).await;
            info!(run = %run.id, contacted, "forum commenters recruited");
        }
        Ok(())
    }

    /// Zero replies this pass: expand while the budget lasts, keep a
    /// forum-backed run open, or expire.
    async fn handle_silence(
        &self,
        run: &mut OutreachRun,
        contacted: usize,
    ) -> Result<CollectOutcome, DomainError> {
        if run.expansions < self.config.max_expansions && contacted < run.hard_cap {
            self.expand(run, contacted).await?;
            return Ok(CollectOutcome {
                status: run.status,
                confidence: None,
                message: "still collecting replies".to_string(),
            });
        }

        if run.forum_post.is_some() {
            return Ok(CollectOutcome {
                status: run.status,
                confidence: None,
                message: "collecting forum replies".to_string(),
            });
        }

        run.set_status(RunStatus::Expired);
        self.runs.update(run).await?;
        self.notify_requester(&run.requester, &messages::search_expired())
            .await;
        self.close_requester_task(run, TaskResult::Expired { run_id: run.id })
            .await;
        Ok(CollectOutcome {
            status: RunStatus::Expired,
            confidence: run.confidence,
            message: "no qualifying replies".to_string(),
        })
    }

    /// One expansion round. Counts against the budget even when the
    /// selection pool is dry, so a starved run still converges on the
    /// forum fallback or expiry.
    async fn expand(&self, run: &mut OutreachRun, contacted: usize) -> Result<(), DomainError> {
        let batch = self
            .config
            .effective_batch_size()
            .min(run.hard_cap.saturating_sub(contacted));
        let current = self.targets.list_by_run(&run.id).await?;
        let excluded = self.excluded_for(run, &current).await?;
        let selections = self.select_targets(run, batch, &excluded).await?;

        run.expansions += 1;
        if !selections.is_empty() {
            let added = self.contact_targets(run, &selections).await;
            run.batch_number += 1;
            info!(run = %run.id, added, round = run.expansions, "outreach expanded");
            self.notify_requester(&run.requester, &messages::still_searching())
                .await;
        }
        self.runs.update(run).await?;
        Ok(())
    }

    /// Moves the run to awaiting-consent around the best candidate.
    async fn promote_candidate(
        &self,
        run: &mut OutreachRun,
        best: &CandidateScore,
        confidence: f64,
    ) -> Result<CollectOutcome, DomainError> {
        run.suggested_candidate = Some(SuggestedCandidate {
            user: best.user_id.clone(),
            consent: best.consent,
            confidence: best.confidence,
        });
        run.set_status(RunStatus::AwaitingConsent);
        self.runs.update(run).await?;
        info!(run = %run.id, candidate = %best.user_id, "candidate suggested");

        // Candidates who never said an explicit yes get asked directly.
        if !best.consent {
            match self.messaging.open_direct(&best.user_id).await {
                Ok(channel) => {
                    if let Err(err) = self
                        .messaging
                        .send(&channel, &messages::consent_request(&run.topic_tags))
                        .await
                    {
                        warn!(error = %err, "candidate consent ask failed");
                    }
                }
                Err(err) => warn!(error = %err, "candidate channel unavailable"),
            }
        }

        self.notify_requester(&run.requester, &messages::candidate_found())
            .await;

        match self.states.find(&run.requester, &run.conversation).await {
            Ok(Some(mut state)) => {
                state.mode = ConversationMode::AwaitingConsent;
                if let Some(task) = state.active_task.as_mut() {
                    task.status = TaskStatus::AwaitingConsent;
                }
                state.push_pending_consent(run.id, ConsentSide::Requester);
                if let Err(err) = self.states.save(&state).await {
                    warn!(error = %err, "conversation state update failed");
                }
            }
            Ok(None) => warn!(run = %run.id, "requester conversation state missing"),
            Err(err) => warn!(error = %err, "conversation state load failed"),
        }

        Ok(CollectOutcome {
            status: RunStatus::AwaitingConsent,
            confidence: Some(confidence),
            message: messages::candidate_found(),
        })
    }

    /// Target-selection cascade, deduplicated against `excluded`.
    async fn select_targets(
        &self,
        run: &OutreachRun,
        batch: usize,
        excluded: &HashSet<UserId>,
    ) -> Result<Vec<(UserId, TargetSource)>, DomainError> {
        let mut picked: Vec<(UserId, TargetSource)> = Vec::new();
        let mut seen = excluded.clone();

        fn push(
            user: UserId,
            source: TargetSource,
            picked: &mut Vec<(UserId, TargetSource)>,
            seen: &mut HashSet<UserId>,
        ) {
            if !seen.contains(&user) {
                seen.insert(user.clone());
                picked.push((user, source));
            }
        }

        for friend in self.directory.friends_of(&run.requester).await? {
            if picked.len() >= batch {
                return Ok(picked);
            }
            push(friend, TargetSource::Friend, &mut picked, &mut seen);
        }

        for classmate in self.directory.classmates_of(&run.requester).await? {
            if picked.len() >= batch {
                return Ok(picked);
            }
            push(classmate, TargetSource::Classmate, &mut picked, &mut seen);
        }

        match self.fact_cache.lookup(&run.campus, &run.topic_tags).await {
            Ok(facts) => {
                for fact in facts {
                    if picked.len() >= batch {
                        return Ok(picked);
                    }
                    let Some(subject_id) = fact.subject.id else {
                        continue;
                    };
                    if let Ok(user) = UserId::new(subject_id) {
                        push(user, TargetSource::CachedFact, &mut picked, &mut seen);
                    }
                }
            }
            Err(err) => warn!(error = %err, "fact-based targeting skipped"),
        }

        let profiles = self
            .directory
            .active_profiles(&run.campus, PROFILE_SCAN_LIMIT)
            .await?;

        for profile in profiles.iter().filter(|p| p.matches_tags(&run.topic_tags)) {
            if picked.len() >= batch {
                return Ok(picked);
            }
            push(
                profile.user_id.clone(),
                TargetSource::ProfileMatch,
                &mut picked,
                &mut seen,
            );
        }

        for profile in &profiles {
            if picked.len() >= batch {
                return Ok(picked);
            }
            push(
                profile.user_id.clone(),
                TargetSource::CampusActive,
                &mut picked,
                &mut seen,
            );
        }

        Ok(picked)
    }

    /// Opens a channel, sends the ask, and records a target row for
    /// each selection. Per-target failures are logged and skipped.
    async fn contact_targets(
        &self,
        run: &OutreachRun,
        selections: &[(UserId, TargetSource)],
    ) -> usize {
        let ask = messages::outreach_ask(&run.query, &run.topic_tags);
        let mut contacted = 0;

        for (user, source) in selections {
            let channel = match self.messaging.open_direct(user).await {
                Ok(channel) => channel,
                Err(err) => {
                    warn!(error = %err, user = %user, "target channel unavailable");
                    continue;
                }
            };
            let message_id = match self.messaging.send(&channel, &ask).await {
                Ok(id) => id,
                Err(err) => {
                    warn!(error = %err, user = %user, "outreach send failed");
                    continue;
                }
            };
            let target = OutreachTarget::new(run.id, user.clone(), channel, message_id, *source);
            match self.targets.insert(&target).await {
                Ok(()) => contacted += 1,
                Err(err) => warn!(error = %err, user = %user, "target insert failed"),
            }
        }

        contacted
    }

    /// Exclusion set for target selection: the requester, users already
    /// targeted in this run, and anyone the requester's runs contacted
    /// within the recontact window.
    async fn excluded_for(
        &self,
        run: &OutreachRun,
        current_targets: &[OutreachTarget],
    ) -> Result<HashSet<UserId>, DomainError> {
        let mut excluded: HashSet<UserId> = HashSet::new();
        excluded.insert(run.requester.clone());
        for target in current_targets {
            excluded.insert(target.target_user.clone());
        }
        let cutoff = Utc::now() - Duration::days(i64::from(self.config.recontact_window_days));
        for user in self.targets.contacted_since(&run.requester, cutoff).await? {
            excluded.insert(user);
        }
        Ok(excluded)
    }

    /// Best-effort note to the requester's assistant channel.
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

    /// Best-effort terminal bookkeeping on the requester's state.
    async fn close_requester_task(&self, run: &OutreachRun, result: TaskResult) {
        match self.states.find(&run.requester, &run.conversation).await {
            Ok(Some(mut state)) => {
                state.mode = ConversationMode::Conversation;
                state.clear_pending_consent(run.id);
                state.log_resolved(run.query.clone(), Some(run.id), result);
                if let Err(err) = self.states.save(&state).await {
                    warn!(error = %err, "conversation state update failed");
                }
            }
            Ok(None) => debug!(run = %run.id, "no conversation state to close"),
            Err(err) => warn!(error = %err, "conversation state load failed"),
        }
    }
}
