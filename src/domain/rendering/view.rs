//! Per-turn render projection.

use serde::Serialize;

use super::formatter::{format_turn, FormattedTurn};
use super::quick_replies::extract_quick_replies;
use crate::domain::conversation::{Speaker, Turn};

/// Everything the UI shell needs to draw one turn.
///
/// Derived from `Turn::text` on demand and never stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnView {
    pub speaker: Speaker,
    /// Turn text with any quick-reply option lines removed.
    pub display_text: String,
    /// One-tap choices; empty when the reply offers none.
    pub quick_replies: Vec<String>,
    /// The reply ends in a bare question with no options to pick from.
    pub awaiting_free_text: bool,
}

impl TurnView {
    /// Projects a stored turn into its render view.
    pub fn project(turn: &Turn) -> Self {
        let (display_text, quick_replies) = match turn.speaker() {
            Speaker::Assistant => match extract_quick_replies(turn.text()) {
                Some(replies) => (replies.remaining_text, replies.options),
                None => (turn.text().to_string(), Vec::new()),
            },
            Speaker::User => (turn.text().to_string(), Vec::new()),
        };

        let ends_with_question = format_turn(&display_text, turn.speaker()).ends_with_question;

        Self {
            speaker: turn.speaker(),
            awaiting_free_text: ends_with_question && quick_replies.is_empty(),
            display_text,
            quick_replies,
        }
    }

    /// Classified, link-rendered lines for drawing.
    pub fn formatted(&self) -> FormattedTurn<'_> {
        format_turn(&self.display_text, self.speaker)
    }

    pub fn has_quick_replies(&self) -> bool {
        !self.quick_replies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rendering::RenderLine;

    #[test]
    fn assistant_options_are_split_from_prose() {
        let turn = Turn::assistant("Which account are you considering?\n1. TFSA\n2. RRSP").unwrap();
        let view = TurnView::project(&turn);

        assert_eq!(view.quick_replies, vec!["TFSA", "RRSP"]);
        assert_eq!(view.display_text, "Which account are you considering?");
        assert!(!view.awaiting_free_text);
        assert!(matches!(
            view.formatted().lines[0],
            RenderLine::Paragraph { emphasized: true, .. }
        ));
    }

    #[test]
    fn bare_question_awaits_free_text() {
        let turn = Turn::assistant("How old are you?").unwrap();
        let view = TurnView::project(&turn);

        assert!(view.quick_replies.is_empty());
        assert!(view.awaiting_free_text);
    }

    #[test]
    fn rejected_options_stay_in_prose() {
        let text = "Try one:\n1. Save $X monthly\n2. Save nothing";
        let turn = Turn::assistant(text).unwrap();
        let view = TurnView::project(&turn);

        assert!(!view.has_quick_replies());
        assert_eq!(view.display_text, text);
        assert_eq!(view.formatted().lines.len(), 3);
    }

    #[test]
    fn user_turns_never_get_options() {
        let turn = Turn::user("1. TFSA\n2. RRSP").unwrap();
        let view = TurnView::project(&turn);

        assert!(view.quick_replies.is_empty());
        assert_eq!(view.display_text, "1. TFSA\n2. RRSP");
        assert!(!view.awaiting_free_text);
    }

    #[test]
    fn projection_is_repeatable() {
        let turn = Turn::assistant("⚠️ Mind the limit\nA) Yes  B) No").unwrap();
        assert_eq!(TurnView::project(&turn), TurnView::project(&turn));
    }
}
