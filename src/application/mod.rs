//! Application layer - session orchestration.
//!
//! Coordinates the conversation domain with the completion provider port.

mod conversation_controller;
mod preamble;

pub use conversation_controller::{
    ChatSettings, ConversationController, SessionSummary, SubmitOutcome, CONNECTION_ERROR_TEXT,
    FALLBACK_REPLY_TEXT,
};
pub use preamble::ADVISOR_PREAMBLE;
