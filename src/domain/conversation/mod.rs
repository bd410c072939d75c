//! Conversation domain module.
//!
//! Holds the ordered turn history and decides when the end-of-conversation
//! feedback prompt should appear.

mod conversation;
mod feedback;
mod turn;

pub use conversation::Conversation;
pub use feedback::{FeedbackError, FeedbackLabel, FeedbackState, FeedbackTrigger, MIN_ASSISTANT_TURNS};
pub use turn::{Speaker, Turn};
