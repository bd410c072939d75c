//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `conversation` - Turns, the append-only conversation, feedback prompting
//! - `rendering` - Pure projections of turn text into drawable lines and pills

pub mod conversation;
pub mod foundation;
pub mod rendering;
