//! Integration tests for consent resolution.

mod common;

use campus_connector::application::ResolveConsentCommand;
use campus_connector::domain::conversation::ConversationMode;
use campus_connector::domain::foundation::{ErrorCode, RunId, UserId};
use campus_connector::domain::outreach::{RunStatus, TargetStatus};

use common::World;

/// Drives a run to awaiting-consent with a consenting candidate.
async fn awaiting_consent_world() -> (World, RunId, UserId) {
    let world = World::new();
    let friends = world.seed_friends(5, "plays pickup basketball").await;

    let outcome = world.inbound("anyone into pickup basketball?").await;
    let run_id = outcome.run_id.unwrap();
    world.reply_from(&friends[0], "yes! I play every week").await;
    let collected = world.engine.collect_outreach(run_id).await.unwrap();
    assert_eq!(collected.status, RunStatus::AwaitingConsent);

    (world, run_id, friends[0].clone())
}

#[tokio::test]
async fn both_sides_yes_connects_and_is_idempotent() {
    let (world, run_id, _) = awaiting_consent_world().await;

    let first = world
        .engine
        .resolve_consent(ResolveConsentCommand {
            run_id,
            requester_ok: true,
            target_ok: true,
        })
        .await
        .unwrap();
    assert_eq!(first.status, RunStatus::Done);
    assert!(first.channel.is_some());
    assert_eq!(world.messaging.group_channel_count().await, 1);

    // Resolving a done run again must not create a second channel.
    let second = world
        .engine
        .resolve_consent(ResolveConsentCommand {
            run_id,
            requester_ok: true,
            target_ok: true,
        })
        .await
        .unwrap();
    assert_eq!(second.status, RunStatus::Done);
    assert!(second.channel.is_none());
    assert_eq!(world.messaging.group_channel_count().await, 1);
}

#[tokio::test]
async fn requester_decline_reverts_and_marks_target_declined() {
    let (world, run_id, candidate) = awaiting_consent_world().await;

    let outcome = world
        .engine
        .resolve_consent(ResolveConsentCommand {
            run_id,
            requester_ok: false,
            target_ok: true,
        })
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Collecting);
    assert!(outcome.channel.is_none());
    assert_eq!(world.messaging.group_channel_count().await, 0);

    let run = world.run(run_id).await;
    assert_eq!(run.status, RunStatus::Collecting);
    assert!(run.suggested_candidate.is_none());

    let targets = world.targets_of(run_id).await;
    let declined = targets.iter().find(|t| t.target_user == candidate).unwrap();
    assert_eq!(declined.status, TargetStatus::Declined);

    // The candidate was told politely.
    let channel = world.messaging.direct_channel(&candidate).await.unwrap();
    let sent = world.messaging.sent_bodies(&channel).await;
    assert!(sent.iter().any(|m| m.contains("already found someone")));

    // The requester's task is cleared and logged.
    let state = world.state().await;
    assert!(state.active_task.is_none());
    assert!(state.pending_consents.is_empty());
    assert_eq!(state.mode, ConversationMode::Conversation);
    assert_eq!(state.resolved_tasks.len(), 1);
}

#[tokio::test]
async fn target_decline_reverts_and_notifies_requester() {
    let (world, run_id, candidate) = awaiting_consent_world().await;

    let outcome = world
        .engine
        .resolve_consent(ResolveConsentCommand {
            run_id,
            requester_ok: true,
            target_ok: false,
        })
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Collecting);
    let targets = world.targets_of(run_id).await;
    assert_eq!(
        targets
            .iter()
            .find(|t| t.target_user == candidate)
            .unwrap()
            .status,
        TargetStatus::Declined
    );

    let requester_channel = world
        .messaging
        .direct_channel(&world.requester)
        .await
        .unwrap();
    let sent = world.messaging.sent_bodies(&requester_channel).await;
    assert!(sent.iter().any(|m| m.contains("weren't available")));
}

#[tokio::test]
async fn both_decline_fails_the_run_terminally() {
    let (world, run_id, _) = awaiting_consent_world().await;

    let outcome = world
        .engine
        .resolve_consent(ResolveConsentCommand {
            run_id,
            requester_ok: false,
            target_ok: false,
        })
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Failed);
    assert_eq!(world.run(run_id).await.status, RunStatus::Failed);
    assert_eq!(world.messaging.group_channel_count().await, 0);
}

#[tokio::test]
async fn decline_reverts_to_forum_posted_when_a_post_exists() {
    let world = World::new();
    world.seed_friends(10, "plays pickup basketball").await;

    let outcome = world.inbound("anyone into pickup basketball?").await;
    let run_id = outcome.run_id.unwrap();
    for _ in 0..3 {
        world.engine.collect_outreach(run_id).await.unwrap();
    }
    let post_id = world.run(run_id).await.forum_post.unwrap().post_id;

    let commenter = UserId::new("commenter").unwrap();
    world.forum.push_comment(&post_id, &commenter, "me!").await;
    world.engine.collect_outreach(run_id).await.unwrap();
    world.reply_from(&commenter, "yes I'm down to play").await;
    let collected = world.engine.collect_outreach(run_id).await.unwrap();
    assert_eq!(collected.status, RunStatus::AwaitingConsent);

    let outcome = world
        .engine
        .resolve_consent(ResolveConsentCommand {
            run_id,
            requester_ok: false,
            target_ok: true,
        })
        .await
        .unwrap();
    assert_eq!(outcome.status, RunStatus::ForumPosted);
}

#[tokio::test]
async fn unknown_run_is_reported_as_not_found() {
    let world = World::new();
    let err = world
        .engine
        .resolve_consent(ResolveConsentCommand {
            run_id: RunId::new(),
            requester_ok: true,
            target_ok: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RunNotFound);
}

#[tokio::test]
async fn requester_no_in_chat_keeps_the_search_going() {
    let (world, run_id, candidate) = awaiting_consent_world().await;

    let outcome = world.inbound("no").await;
    assert_eq!(outcome.mode, ConversationMode::Conversation);

    let run = world.run(run_id).await;
    assert_eq!(run.status, RunStatus::Collecting);
    assert!(run.suggested_candidate.is_none());

    let targets = world.targets_of(run_id).await;
    assert_eq!(
        targets
            .iter()
            .find(|t| t.target_user == candidate)
            .unwrap()
            .status,
        TargetStatus::Declined
    );
}
