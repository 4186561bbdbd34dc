//! Text-generation provider adapters.

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockError, MockResponse, MockTextGeneration};
pub use openai_provider::{OpenAiConfig, OpenAiTextGeneration};
