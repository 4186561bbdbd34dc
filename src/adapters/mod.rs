//! Adapters: concrete implementations of the ports.

pub mod ai;
pub mod memory;

pub use ai::{MockError, MockResponse, MockTextGeneration, OpenAiConfig, OpenAiTextGeneration};
pub use memory::{
    InMemoryConversationStates, InMemoryDirectory, InMemoryFacts, InMemoryForum,
    InMemoryMessaging, InMemoryOutreachStore, InMemoryRetrieval, InMemoryUserMemories,
};
