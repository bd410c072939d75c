//! Conversation entity - the ordered, append-only turn history.

use serde::{Deserialize, Serialize};

use super::turn::{Speaker, Turn};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, Timestamp};

/// Conversation entity - the literal context sent to the completion service.
///
/// Turns are kept in chronological order and speakers strictly alternate,
/// starting with the user. Nothing is ever removed or rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    turns: Vec<Turn>,
    created_at: Timestamp,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self {
            id: ConversationId::new(),
            turns: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn last_assistant_turn(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.is_assistant())
    }

    pub fn assistant_turn_count(&self) -> usize {
        self.turns.iter().filter(|t| t.is_assistant()).count()
    }

    /// Speaker allowed to produce the next turn.
    pub fn expected_speaker(&self) -> Speaker {
        self.turns
            .last()
            .map(|t| t.speaker().next())
            .unwrap_or(Speaker::User)
    }

    // === Mutations ===

    /// Appends a turn, enforcing strict alternation.
    ///
    /// # Errors
    ///
    /// - `TurnOutOfOrder` if the turn's speaker is not the expected one
    pub fn append(&mut self, turn: Turn) -> Result<&Turn, DomainError> {
        let expected = self.expected_speaker();
        if turn.speaker() != expected {
            return Err(DomainError::new(
                ErrorCode::TurnOutOfOrder,
                format!("Expected a {:?} turn, got {:?}", expected, turn.speaker()),
            )
            .with_detail("conversation_id", self.id.to_string()));
        }

        self.turns.push(turn);
        Ok(&self.turns[self.turns.len() - 1])
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(conversation: &mut Conversation, user: &str, assistant: &str) {
        conversation.append(Turn::user(user).unwrap()).unwrap();
        conversation.append(Turn::assistant(assistant).unwrap()).unwrap();
    }

    #[test]
    fn new_conversation_is_empty_and_expects_user() {
        let conversation = Conversation::new();
        assert!(conversation.is_empty());
        assert_eq!(conversation.expected_speaker(), Speaker::User);
        assert!(conversation.last_assistant_turn().is_none());
    }

    #[test]
    fn appends_in_order() {
        let mut conversation = Conversation::new();
        exchange(&mut conversation, "Hi", "Hello! What are you saving for?");

        let texts: Vec<_> = conversation.turns().iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["Hi", "Hello! What are you saving for?"]);
        assert_eq!(conversation.expected_speaker(), Speaker::User);
    }

    #[test]
    fn rejects_assistant_first() {
        let mut conversation = Conversation::new();
        let err = conversation
            .append(Turn::assistant("Hello").unwrap())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TurnOutOfOrder);
        assert!(conversation.is_empty());
    }

    #[test]
    fn rejects_two_assistant_turns_in_a_row() {
        let mut conversation = Conversation::new();
        exchange(&mut conversation, "Hi", "Hello");

        assert!(conversation.append(Turn::assistant("Again").unwrap()).is_err());
        assert!(conversation.append(Turn::user("More").unwrap()).is_ok());
        assert!(conversation.append(Turn::user("Twice").unwrap()).is_err());
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn counts_assistant_turns() {
        let mut conversation = Conversation::new();
        exchange(&mut conversation, "a", "b");
        exchange(&mut conversation, "c", "d");
        conversation.append(Turn::user("e").unwrap()).unwrap();

        assert_eq!(conversation.assistant_turn_count(), 2);
        assert_eq!(conversation.last_assistant_turn().unwrap().text(), "d");
        assert_eq!(conversation.last_turn().unwrap().text(), "e");
    }

    #[test]
    fn serializes_to_json_transcript() {
        let mut conversation = Conversation::new();
        exchange(&mut conversation, "Hi", "Hello");

        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json["turns"][0]["speaker"], "user");
        assert_eq!(json["turns"][1]["text"], "Hello");
    }
}
