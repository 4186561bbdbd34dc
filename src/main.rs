//! Demo binary: runs the engine against in-memory adapters.
//!
//! Feeds one message (from argv, or a default ask) through the full
//! inbound pipeline and prints the outcome, then drives a collection
//! pass if a run started. Useful for poking at the workflow without any
//! external services.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use campus_connector::adapters::{
    InMemoryConversationStates, InMemoryDirectory, InMemoryFacts, InMemoryForum,
    InMemoryMessaging, InMemoryOutreachStore, InMemoryRetrieval, InMemoryUserMemories,
    MockTextGeneration,
};
use campus_connector::application::{Engine, EnginePorts, InboundCommand};
use campus_connector::config::AppConfig;
use campus_connector::domain::foundation::{CampusId, ConversationId, UserId};
use campus_connector::ports::Profile;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut config = AppConfig::load()?;
    // The demo runs entirely offline on the heuristic paths.
    config.ai.offline = true;
    config.validate()?;

    let campus = CampusId::new("demo-campus")?;
    let requester = UserId::new("demo-requester")?;

    let messaging = Arc::new(InMemoryMessaging::new());
    let directory = Arc::new(InMemoryDirectory::new());
    seed_directory(&directory, &campus, &requester).await;

    let outreach = Arc::new(InMemoryOutreachStore::new());
    let engine = Engine::new(
        EnginePorts {
            states: Arc::new(InMemoryConversationStates::new()),
            memories: Arc::new(InMemoryUserMemories::new()),
            runs: outreach.clone(),
            targets: outreach,
            facts: Arc::new(InMemoryFacts::new()),
            directory,
            messaging: messaging.clone(),
            forum: Arc::new(InMemoryForum::new()),
            retrieval: Arc::new(InMemoryRetrieval::new()),
            text_generation: Arc::new(MockTextGeneration::new()),
        },
        &config,
    );

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let text = if text.is_empty() {
        "anyone into pickup basketball?".to_string()
    } else {
        text
    };

    let outcome = engine
        .handle_inbound_message(InboundCommand {
            user: requester,
            conversation: ConversationId::new(),
            campus,
            text,
        })
        .await?;

    println!("mode:       {}", outcome.mode);
    println!("answer:     {}", outcome.answer_text);
    if let Some(confidence) = outcome.confidence {
        println!("confidence: {:.2}", confidence);
    }

    if let Some(run_id) = outcome.run_id {
        info!(%run_id, "run started, simulating a consenting reply");
        let helper = UserId::new("friend-1")?;
        if let Some(channel) = messaging.direct_channel(&helper).await {
            messaging
                .push_inbound(&channel, &helper, "yes! I play every thursday at 7pm")
                .await;
        }
        let collected = engine.collect_outreach(run_id).await?;
        println!("collect:    {:?} - {}", collected.status, collected.message);
    }

    Ok(())
}

async fn seed_directory(directory: &InMemoryDirectory, campus: &CampusId, requester: &UserId) {
    for (name, bio) in [
        ("friend-1", "intramural basketball, pickup games"),
        ("friend-2", "cs major, chess club"),
        ("friend-3", "climbing wall regular"),
    ] {
        let user = UserId::new(name).expect("seed user id");
        directory
            .add_profile(Profile {
                user_id: user.clone(),
                campus: campus.clone(),
                display_name: name.to_string(),
                bio: bio.to_string(),
                major: "Undeclared".to_string(),
                interests: Vec::new(),
            })
            .await;
        directory.add_friendship(requester, &user).await;
    }
}
