//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types that form the
//! vocabulary of the advisor chat domain.

mod ids;
mod timestamp;
mod errors;

pub use ids::{ConversationId, TurnId};
pub use timestamp::Timestamp;
pub use errors::{DomainError, ErrorCode};
