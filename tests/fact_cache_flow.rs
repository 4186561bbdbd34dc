//! Integration tests for the fact cache and the direct-answer path.

mod common;

use campus_connector::application::InboundCommand;
use campus_connector::domain::conversation::ConversationMode;
use campus_connector::domain::facts::FactCategory;
use campus_connector::domain::foundation::{ConversationId, UserId};
use campus_connector::domain::outreach::RunStatus;
use campus_connector::ports::{FactRepository, RecordKind, RetrievedRecord};
use chrono::{Duration, Utc};

use common::World;

fn verified_record(id: &str, title: &str) -> RetrievedRecord {
    RetrievedRecord {
        id: id.to_string(),
        kind: RecordKind::Organization,
        title: title.to_string(),
        snippet: "meets thursdays in the union".to_string(),
        score: 0.9,
        consent_verified: true,
        event_start: None,
    }
}

#[tokio::test]
async fn structured_query_answers_from_records_and_caches_facts() {
    let world = World::new();
    for i in 0..3 {
        world
            .retrieval
            .add_record(&world.campus, verified_record(&format!("org-{}", i), "Chess Society"))
            .await;
    }

    let outcome = world.inbound("any chess clubs on campus?").await;

    assert_eq!(outcome.mode, ConversationMode::Agent);
    assert_eq!(outcome.confidence, Some(0.8));
    assert!(outcome.answer_text.contains("Chess Society"));
    assert!(outcome.run_id.is_none());

    // Verified hits behind a qualifying answer become club facts.
    let facts = world.facts.list_by_campus(&world.campus).await.unwrap();
    assert_eq!(facts.len(), 3);
    assert!(facts.iter().all(|f| f.category == FactCategory::Club));
}

#[tokio::test]
async fn retrieval_outage_degrades_to_a_clarifying_answer() {
    let world = World::new();
    world.retrieval.fail(true).await;

    let outcome = world.inbound("any chess clubs on campus?").await;

    assert_eq!(outcome.mode, ConversationMode::Agent);
    assert_eq!(outcome.confidence, Some(0.1));
    assert!(outcome.answer_text.contains("ask around"));
}

#[tokio::test]
async fn high_confidence_outreach_answer_is_cached_for_reuse() {
    let world = World::new();
    let friends = world.seed_friends(5, "plays pickup basketball").await;

    let outcome = world.inbound("anyone into pickup basketball?").await;
    let run_id = outcome.run_id.unwrap();

    // Rich reply: meeting, time, and a contact channel.
    world
        .reply_from(
            &friends[0],
            "yes! I host games, we meet tonight at 8pm in room 204, join the discord",
        )
        .await;
    let collected = world.engine.collect_outreach(run_id).await.unwrap();
    assert_eq!(collected.status, RunStatus::AwaitingConsent);
    assert_eq!(collected.confidence, Some(0.95));

    let facts = world.facts.list_by_campus(&world.campus).await.unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].category, FactCategory::Outreach);
    assert!(facts[0].value.contains("basketball"));

    // A second student asking the same thing is served from the cache,
    // with no new campaign.
    let other = UserId::new("other-student").unwrap();
    let outcome = world
        .engine
        .handle_inbound_message(InboundCommand {
            user: other,
            conversation: ConversationId::new(),
            campus: world.campus.clone(),
            text: "anyone into basketball around here?".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(outcome.mode, ConversationMode::Agent);
    assert!(outcome.run_id.is_none());
    assert!(outcome.confidence.unwrap() >= 0.75);
    assert!(outcome.answer_text.contains("basketball"));
}

#[tokio::test]
async fn expired_facts_are_never_served() {
    let world = World::new();

    // Cache a fact, then age it past expiry.
    let friends = world.seed_friends(5, "plays pickup basketball").await;
    let outcome = world.inbound("anyone into pickup basketball?").await;
    let run_id = outcome.run_id.unwrap();
    world
        .reply_from(
            &friends[0],
            "yes! I host games, we meet tonight at 8pm in room 204, join the discord",
        )
        .await;
    world.engine.collect_outreach(run_id).await.unwrap();

    let mut aged = world
        .facts
        .list_by_campus(&world.campus)
        .await
        .unwrap()
        .remove(0);
    world
        .facts
        .delete_expired(Utc::now() + Duration::days(365))
        .await
        .unwrap();
    aged.expires_at = Utc::now() - Duration::seconds(1);
    world.facts.insert(&aged).await.unwrap();

    // The stale fact neither answers the query nor survives the sweep.
    let other = UserId::new("other-student").unwrap();
    let outcome = world
        .engine
        .handle_inbound_message(InboundCommand {
            user: other,
            conversation: ConversationId::new(),
            campus: world.campus.clone(),
            text: "anyone into basketball around here?".to_string(),
        })
        .await
        .unwrap();

    assert_ne!(outcome.mode, ConversationMode::Agent);
    assert!(world.facts.is_empty().await);
}

#[tokio::test]
async fn memory_store_outage_never_affects_the_primary_response() {
    let world = World::new();
    world.seed_friends(5, "plays pickup basketball").await;
    world.memories.fail_writes(true).await;

    let outcome = world.inbound("anyone into pickup basketball?").await;
    assert_eq!(outcome.mode, ConversationMode::Outreach);
    assert!(outcome.run_id.is_some());
}

#[tokio::test]
async fn chat_messages_never_touch_retrieval_or_outreach() {
    let world = World::new();

    let outcome = world.inbound("hey").await;
    assert_eq!(outcome.mode, ConversationMode::Conversation);
    assert!(outcome.run_id.is_none());
    assert!(outcome.confidence.is_none());
    assert!(!outcome.ui_hints.is_empty());
    assert_eq!(world.outreach.run_count().await, 0);
}
