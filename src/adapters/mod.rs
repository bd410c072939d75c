//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (Anthropic, OpenAI, mock, failover)
//! - `terminal` - Styled output for the interactive shell

pub mod ai;
pub mod terminal;

pub use ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, MockAIProvider, OpenAIConfig,
    OpenAIProvider,
};
pub use terminal::TerminalRenderer;
