//! Application layer: services and use-case handlers.

pub mod answer;
pub mod campaign;
pub mod consent;
mod engine;
pub mod fact_cache;
pub mod handlers;
pub mod intent_router;
pub mod reply_interpreter;

pub use answer::{DirectAnswer, DirectAnswerService};
pub use campaign::{CampaignManager, CollectOutcome};
pub use consent::{ConsentCoordinator, ConsentOutcome};
pub use engine::{Engine, EnginePorts};
pub use fact_cache::FactCache;
pub use handlers::{
    CollectOutreach, HandleInboundMessage, InboundCommand, InboundOutcome, ResolveConsent,
    ResolveConsentCommand,
};
pub use intent_router::IntentRouter;
pub use reply_interpreter::ReplyInterpreter;
