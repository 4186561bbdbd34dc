//! Engine facade: wires ports into services and exposes the three
//! operations of the workflow engine.

use std::sync::Arc;

use crate::application::answer::DirectAnswerService;
use crate::application::campaign::{CampaignManager, CollectOutcome};
use crate::application::consent::{ConsentCoordinator, ConsentOutcome};
use crate::application::fact_cache::FactCache;
use crate::application::handlers::{
    CollectOutreach, HandleInboundMessage, InboundCommand, InboundOutcome, ResolveConsent,
    ResolveConsentCommand,
};
use crate::application::intent_router::IntentRouter;
use crate::application::reply_interpreter::ReplyInterpreter;
use crate::config::AppConfig;
use crate::domain::foundation::{DomainError, RunId};
use crate::ports::{
    ConversationStateRepository, Directory, FactRepository, ForumGateway, Messaging,
    OutreachRunRepository, OutreachTargetRepository, Retrieval, TextGeneration,
    UserMemoryRepository,
};

/// Every dependency the engine needs, injected explicitly.
///
/// There is deliberately no ambient client anywhere: each component
/// receives exactly the ports it uses.
pub struct EnginePorts {
    pub states: Arc<dyn ConversationStateRepository>,
    pub memories: Arc<dyn UserMemoryRepository>,
    pub runs: Arc<dyn OutreachRunRepository>,
    pub targets: Arc<dyn OutreachTargetRepository>,
    pub facts: Arc<dyn FactRepository>,
    pub directory: Arc<dyn Directory>,
    pub messaging: Arc<dyn Messaging>,
    pub forum: Arc<dyn ForumGateway>,
    pub retrieval: Arc<dyn Retrieval>,
    pub text_generation: Arc<dyn TextGeneration>,
}

/// The outreach/consent workflow engine.
pub struct Engine {
    inbound: HandleInboundMessage,
    collect: CollectOutreach,
    resolve: ResolveConsent,
}

impl Engine {
    /// Wires all services from ports and configuration.
    pub fn new(ports: EnginePorts, config: &AppConfig) -> Self {
        let fact_cache = Arc::new(FactCache::new(
            ports.facts.clone(),
            &config.facts,
            &config.outreach,
        ));
        let interpreter = Arc::new(ReplyInterpreter::new(ports.text_generation.clone()));
        let router = Arc::new(IntentRouter::new(ports.text_generation.clone()));
        let answers = Arc::new(DirectAnswerService::new(
            ports.retrieval.clone(),
            fact_cache.clone(),
            config.outreach.target_confidence_threshold,
        ));
        let campaign = Arc::new(CampaignManager::new(
            ports.runs.clone(),
            ports.targets.clone(),
            ports.states.clone(),
            ports.messaging.clone(),
            ports.directory.clone(),
            ports.forum.clone(),
            fact_cache.clone(),
            interpreter,
            config.outreach.clone(),
        ));
        let consent = Arc::new(ConsentCoordinator::new(
            ports.runs.clone(),
            ports.targets.clone(),
            ports.states.clone(),
            ports.messaging.clone(),
        ));

        let inbound = HandleInboundMessage::new(
            ports.states,
            ports.memories,
            ports.runs,
            router,
            answers,
            campaign.clone(),
            consent.clone(),
        );

        Self {
            inbound,
            collect: CollectOutreach::new(campaign),
            resolve: ResolveConsent::new(consent),
        }
    }

    /// Processes one inbound chat message.
    pub async fn handle_inbound_message(
        &self,
        cmd: InboundCommand,
    ) -> Result<InboundOutcome, DomainError> {
        self.inbound.handle(cmd).await
    }

    /// Runs one collection pass over an outreach run.
    pub async fn collect_outreach(&self, run_id: RunId) -> Result<CollectOutcome, DomainError> {
        self.collect.handle(run_id).await
    }

    /// Resolves consent for a suggested introduction.
    pub async fn resolve_consent(
        &self,
        cmd: ResolveConsentCommand,
    ) -> Result<ConsentOutcome, DomainError> {
        self.resolve.handle(cmd).await
    }
}
