//! Shared test world: the engine wired over in-memory adapters.

#![allow(dead_code)]

use std::sync::Arc;

use campus_connector::adapters::{
    InMemoryConversationStates, InMemoryDirectory, InMemoryFacts, InMemoryForum,
    InMemoryMessaging, InMemoryOutreachStore, InMemoryRetrieval, InMemoryUserMemories,
    MockTextGeneration,
};
use campus_connector::application::{Engine, EnginePorts, InboundCommand, InboundOutcome};
use campus_connector::config::AppConfig;
use campus_connector::domain::conversation::ConversationState;
use campus_connector::domain::foundation::{CampusId, ConversationId, RunId, UserId};
use campus_connector::domain::outreach::{OutreachRun, OutreachTarget};
use campus_connector::ports::{
    ConversationStateRepository, OutreachRunRepository, OutreachTargetRepository, Profile,
};

pub struct World {
    pub engine: Engine,
    pub messaging: Arc<InMemoryMessaging>,
    pub directory: Arc<InMemoryDirectory>,
    pub forum: Arc<InMemoryForum>,
    pub facts: Arc<InMemoryFacts>,
    pub retrieval: Arc<InMemoryRetrieval>,
    pub outreach: Arc<InMemoryOutreachStore>,
    pub states: Arc<InMemoryConversationStates>,
    pub memories: Arc<InMemoryUserMemories>,
    pub campus: CampusId,
    pub requester: UserId,
    pub conversation: ConversationId,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(offline_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let messaging = Arc::new(InMemoryMessaging::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let forum = Arc::new(InMemoryForum::new());
        let facts = Arc::new(InMemoryFacts::new());
        let retrieval = Arc::new(InMemoryRetrieval::new());
        let outreach = Arc::new(InMemoryOutreachStore::new());
        let states = Arc::new(InMemoryConversationStates::new());
        let memories = Arc::new(InMemoryUserMemories::new());

        let engine = Engine::new(
            EnginePorts {
                states: states.clone(),
                memories: memories.clone(),
                runs: outreach.clone(),
                targets: outreach.clone(),
                facts: facts.clone(),
                directory: directory.clone(),
                messaging: messaging.clone(),
                forum: forum.clone(),
                retrieval: retrieval.clone(),
                text_generation: Arc::new(MockTextGeneration::new()),
            },
            &config,
        );

        Self {
            engine,
            messaging,
            directory,
            forum,
            facts,
            retrieval,
            outreach,
            states,
            memories,
            campus: CampusId::new("campus-1").unwrap(),
            requester: UserId::new("requester").unwrap(),
            conversation: ConversationId::new(),
        }
    }

    /// Seeds `count` users as friends of the requester, bios matching
    /// the given text.
    pub async fn seed_friends(&self, count: usize, bio: &str) -> Vec<UserId> {
        let mut users = Vec::new();
        for i in 0..count {
            let user = UserId::new(format!("friend-{}", i)).unwrap();
            self.directory
                .add_profile(Profile {
                    user_id: user.clone(),
                    campus: self.campus.clone(),
                    display_name: format!("Friend {}", i),
                    bio: bio.to_string(),
                    major: "Undeclared".to_string(),
                    interests: Vec::new(),
                })
                .await;
            self.directory.add_friendship(&self.requester, &user).await;
            users.push(user);
        }
        users
    }

    /// Sends one message from the requester through the engine.
    pub async fn inbound(&self, text: &str) -> InboundOutcome {
        self.engine
            .handle_inbound_message(InboundCommand {
                user: self.requester.clone(),
                conversation: self.conversation,
                campus: self.campus.clone(),
                text: text.to_string(),
            })
            .await
            .expect("inbound message handled")
    }

    /// Simulates a target replying on their direct channel.
    pub async fn reply_from(&self, user: &UserId, text: &str) {
        let channel = self
            .messaging
            .direct_channel(user)
            .await
            .expect("target was contacted");
        self.messaging.push_inbound(&channel, user, text).await;
    }

    pub async fn run(&self, run_id: RunId) -> OutreachRun {
        OutreachRunRepository::find(&*self.outreach, &run_id)
            .await
            .unwrap()
            .expect("run exists")
    }

    pub async fn targets_of(&self, run_id: RunId) -> Vec<OutreachTarget> {
        self.outreach.list_by_run(&run_id).await.unwrap()
    }

    pub async fn state(&self) -> ConversationState {
        self.states
            .find(&self.requester, &self.conversation)
            .await
            .unwrap()
            .expect("conversation state exists")
    }
}

pub fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.ai.offline = true;
    config
}
