//! End-of-conversation feedback prompt.
//!
//! `FeedbackTrigger` is a pure predicate over the conversation. `FeedbackState`
//! is the fire-once gate plus the user's one-shot selection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::conversation::Conversation;

/// Assistant turns required before the prompt may appear.
pub const MIN_ASSISTANT_TURNS: usize = 3;

/// Phrases and glyphs that suggest the assistant is wrapping up.
static WRAP_UP_SIGNALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)⚠|final call|good luck|hope (?:this|that) helps|any (?:other|more) question")
        .expect("wrap-up signal pattern is valid")
});

/// Decides whether the conversation looks finished enough to ask for feedback.
///
/// Best-effort: a missed wrap-up is acceptable, a premature prompt is not.
#[derive(Debug, Clone)]
pub struct FeedbackTrigger {
    min_assistant_turns: usize,
}

impl Default for FeedbackTrigger {
    fn default() -> Self {
        Self {
            min_assistant_turns: MIN_ASSISTANT_TURNS,
        }
    }
}

impl FeedbackTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the text carries any wrap-up signal.
    pub fn is_wrap_up(text: &str) -> bool {
        WRAP_UP_SIGNALS.is_match(text)
    }

    /// Pure predicate: enough assistant turns, the latest one wraps up,
    /// and the prompt has not been shown yet.
    pub fn should_show(&self, conversation: &Conversation, already_shown: bool) -> bool {
        if already_shown {
            return false;
        }
        if conversation.assistant_turn_count() < self.min_assistant_turns {
            return false;
        }
        conversation
            .last_assistant_turn()
            .is_some_and(|turn| Self::is_wrap_up(turn.text()))
    }
}

/// The closed set of feedback answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLabel {
    Helpful,
    SomewhatHelpful,
    NotHelpful,
}

impl FeedbackLabel {
    /// All labels in display order.
    pub const ALL: [FeedbackLabel; 3] = [
        FeedbackLabel::Helpful,
        FeedbackLabel::SomewhatHelpful,
        FeedbackLabel::NotHelpful,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackLabel::Helpful => "Helpful",
            FeedbackLabel::SomewhatHelpful => "Somewhat helpful",
            FeedbackLabel::NotHelpful => "Not helpful",
        }
    }
}

impl fmt::Display for FeedbackLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FeedbackLabel {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "1" | "helpful" => Ok(FeedbackLabel::Helpful),
            "2" | "somewhat helpful" | "somewhat" => Ok(FeedbackLabel::SomewhatHelpful),
            "3" | "not helpful" => Ok(FeedbackLabel::NotHelpful),
            _ => Err(FeedbackError::UnknownLabel(s.to_string())),
        }
    }
}

/// Errors from recording feedback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("Feedback has not been requested yet")]
    NotOffered,

    #[error("Feedback already recorded as '{0}'")]
    AlreadyRecorded(FeedbackLabel),

    #[error("Unknown feedback label: {0}")]
    UnknownLabel(String),
}

/// Per-conversation feedback state.
///
/// `shown` only ever goes from false to true; `selection` is set at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackState {
    shown: bool,
    selection: Option<FeedbackLabel>,
}

impl FeedbackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> bool {
        self.shown
    }

    pub fn selection(&self) -> Option<FeedbackLabel> {
        self.selection
    }

    /// Fire-once gate: returns true exactly on the first evaluation where the
    /// trigger matches, and false forever after.
    pub fn evaluate(&mut self, trigger: &FeedbackTrigger, conversation: &Conversation) -> bool {
        if trigger.should_show(conversation, self.shown) {
            self.shown = true;
            return true;
        }
        false
    }

    /// Records the user's one-shot answer.
    ///
    /// # Errors
    ///
    /// - `NotOffered` if the prompt has not fired
    /// - `AlreadyRecorded` if an answer exists
    pub fn select(&mut self, label: FeedbackLabel) -> Result<(), FeedbackError> {
        if !self.shown {
            return Err(FeedbackError::NotOffered);
        }
        if let Some(existing) = self.selection {
            return Err(FeedbackError::AlreadyRecorded(existing));
        }
        self.selection = Some(label);
        Ok(())
    }
}
