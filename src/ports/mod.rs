//! Ports: async trait contracts for every external collaborator.

mod conversation_state_repository;
mod directory;
mod fact_repository;
mod forum;
mod messaging;
mod outreach_repository;
mod retrieval;
mod text_generation;
mod user_memory_repository;

pub use conversation_state_repository::ConversationStateRepository;
pub use directory::{Directory, Profile};
pub use fact_repository::FactRepository;
pub use forum::{ForumComment, ForumGateway};
pub use messaging::{InboundMessage, Messaging};
pub use outreach_repository::{OutreachRunRepository, OutreachTargetRepository};
pub use retrieval::{RecordKind, Retrieval, RetrievalError, RetrievedRecord};
pub use text_generation::{GenerationError, GenerationRequest, TextGeneration};
pub use user_memory_repository::UserMemoryRepository;
