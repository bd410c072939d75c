//! Turn entity for conversations.
//!
//! Turns are immutable records of one user or assistant utterance.
//! Rendering never mutates a turn; derived views are projected from `text`.

use crate::domain::foundation::{DomainError, Timestamp, TurnId};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The person chatting.
    User,
    /// The language model (or a synthetic stand-in for it).
    Assistant,
}

impl Speaker {
    /// Returns the speaker expected to follow this one.
    pub fn next(&self) -> Speaker {
        match self {
            Speaker::User => Speaker::Assistant,
            Speaker::Assistant => Speaker::User,
        }
    }
}

/// An immutable turn within a conversation.
///
/// # Invariants
///
/// - `text` is non-empty after trimming (validated at construction)
/// - nothing about a turn changes once constructed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    speaker: Speaker,
    text: String,
    created_at: Timestamp,
}

impl Turn {
    /// Creates a new turn.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if text is empty or whitespace-only
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::empty_field("text"));
        }

        Ok(Self {
            id: TurnId::new(),
            speaker,
            text,
            created_at: Timestamp::now(),
        })
    }

    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Speaker::User, text)
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Speaker::Assistant, text)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TurnId {
        &self.id
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }

    pub fn is_assistant(&self) -> bool {
        self.speaker == Speaker::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod speaker {
        use super::*;

        #[test]
        fn alternates() {
            assert_eq!(Speaker::User.next(), Speaker::Assistant);
            assert_eq!(Speaker::Assistant.next(), Speaker::User);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&Speaker::Assistant).unwrap();
            assert_eq!(json, "\"assistant\"");
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn user_creates_user_turn() {
            let turn = Turn::user("Should I open a TFSA?").unwrap();
            assert!(turn.is_user());
            assert!(!turn.is_assistant());
            assert_eq!(turn.text(), "Should I open a TFSA?");
        }

        #[test]
        fn assistant_creates_assistant_turn() {
            let turn = Turn::assistant("Great question.").unwrap();
            assert_eq!(turn.speaker(), Speaker::Assistant);
        }

        #[test]
        fn rejects_empty_text() {
            assert!(Turn::user("").is_err());
        }

        #[test]
        fn rejects_whitespace_only_text() {
            assert!(Turn::assistant("  \n\t ").is_err());
        }

        #[test]
        fn preserves_text_verbatim() {
            let turn = Turn::assistant("  padded\n").unwrap();
            assert_eq!(turn.text(), "  padded\n");
        }

        #[test]
        fn assigns_distinct_ids() {
            let a = Turn::user("one").unwrap();
            let b = Turn::user("one").unwrap();
            assert_ne!(a.id(), b.id());
        }
    }
}
