pub mod message;
pub mod openai;
pub mod provider;

pub use message::*;
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use provider::*;
