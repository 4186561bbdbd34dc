//! Foundation types shared across the domain layer.

mod errors;
mod ids;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    CampusId, ChannelId, ConversationId, FactId, MessageId, PostId, RunId, TargetId, TaskId,
    UserId,
};
pub use state_machine::StateMachine;
