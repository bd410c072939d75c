//! ConversationController - owns one chat session.
//!
//! Appends the user's turn, asks the completion provider for a reply, appends
//! the reply (or a fixed substitute), and re-evaluates the feedback trigger.
//! At most one completion is outstanding at a time; submissions made while
//! one is in flight are dropped, not queued.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use super::preamble::ADVISOR_PREAMBLE;
use crate::domain::conversation::{
    Conversation, FeedbackError, FeedbackLabel, FeedbackState, FeedbackTrigger, Turn,
};
use crate::domain::foundation::{ConversationId, TurnId};
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata};

/// Turn appended when the collaborator fails.
pub const CONNECTION_ERROR_TEXT: &str = "Connection error. Please try again.";

/// Turn appended when the reply is empty or unreadable.
pub const FALLBACK_REPLY_TEXT: &str = "Sorry, I didn't catch that. Could you rephrase?";

/// Request settings applied to every completion.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub preamble: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            preamble: ADVISOR_PREAMBLE.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// What a call to [`ConversationController::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or a request was already in flight. Nothing changed.
    Ignored,
    /// The model's reply was appended.
    Replied { feedback_prompted: bool },
    /// The reply was empty or unparseable; the fallback turn was appended.
    Fallback { feedback_prompted: bool },
    /// The provider failed; the connection-error turn was appended.
    Failed,
}

impl SubmitOutcome {
    /// True when this submission made the feedback prompt appear.
    pub fn feedback_prompted(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::Replied {
                feedback_prompted: true
            } | SubmitOutcome::Fallback {
                feedback_prompted: true
            }
        )
    }
}

/// Everything left when a session ends.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub conversation: Conversation,
    pub feedback: FeedbackState,
}

impl SessionSummary {
    /// JSON transcript for export.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    conversation: Conversation,
    in_flight: bool,
    last_error: Option<String>,
    feedback: FeedbackState,
}

/// Owns the conversation, the in-flight flag, and the feedback state for one session.
pub struct ConversationController {
    provider: Arc<dyn AIProvider>,
    settings: ChatSettings,
    trigger: FeedbackTrigger,
    state: Mutex<SessionState>,
}

impl ConversationController {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self::with_settings(provider, ChatSettings::default())
    }

    pub fn with_settings(provider: Arc<dyn AIProvider>, settings: ChatSettings) -> Self {
        Self {
            provider,
            settings,
            trigger: FeedbackTrigger::default(),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Replaces the feedback trigger policy.
    pub fn with_trigger(mut self, trigger: FeedbackTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Submits user text and waits for the reply.
    ///
    /// Never fails: provider errors become a visible assistant turn and the
    /// user's turn is always kept.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Ignoring blank submission");
            return SubmitOutcome::Ignored;
        }

        let (request, user_turn_id) = {
            let mut state = self.lock();
            if state.in_flight {
                tracing::debug!("Ignoring submission while a reply is pending");
                return SubmitOutcome::Ignored;
            }

            let turn = match Turn::user(text) {
                Ok(turn) => turn,
                Err(err) => {
                    tracing::debug!(error = %err, "Rejected user turn");
                    return SubmitOutcome::Ignored;
                }
            };
            let user_turn_id = *turn.id();
            if let Err(err) = state.conversation.append(turn) {
                tracing::error!(error = %err, "Could not record user turn");
                return SubmitOutcome::Ignored;
            }

            state.in_flight = true;
            (self.build_request(&state.conversation, user_turn_id), user_turn_id)
        };

        let conversation_id = request.metadata.conversation_id;
        let pending = PendingReply {
            controller: self,
            user_turn_id,
        };
        let result = self.provider.complete(request).await;
        pending.disarm();

        let mut state = self.lock();
        let outcome = match result {
            Ok(response) if !response.content.trim().is_empty() => {
                tracing::info!(
                    %conversation_id,
                    %user_turn_id,
                    model = %response.model,
                    completion_tokens = response.usage.completion_tokens,
                    "Assistant replied"
                );
                state.last_error = None;
                append_assistant(&mut state, response.content);
                SubmitOutcome::Replied {
                    feedback_prompted: self.evaluate_feedback(&mut state),
                }
            }
            Ok(_) => {
                tracing::warn!(%conversation_id, %user_turn_id, "Empty reply from provider");
                state.last_error = None;
                append_assistant(&mut state, FALLBACK_REPLY_TEXT.to_string());
                SubmitOutcome::Fallback {
                    feedback_prompted: self.evaluate_feedback(&mut state),
                }
            }
            Err(err) if err.is_unparseable() => {
                tracing::warn!(%conversation_id, %user_turn_id, error = %err, "Unreadable reply from provider");
                state.last_error = Some(err.to_string());
                append_assistant(&mut state, FALLBACK_REPLY_TEXT.to_string());
                SubmitOutcome::Fallback {
                    feedback_prompted: self.evaluate_feedback(&mut state),
                }
            }
            Err(err) => {
                self.record_failure(&mut state, &err, conversation_id, user_turn_id);
                SubmitOutcome::Failed
            }
        };

        state.in_flight = false;
        outcome
    }

    /// Selecting a quick reply is the same as typing its label.
    pub async fn choose_option(&self, option: &str) -> SubmitOutcome {
        self.submit(option).await
    }

    /// Records the user's answer to the feedback prompt.
    ///
    /// # Errors
    ///
    /// - `NotOffered` before the prompt has appeared
    /// - `AlreadyRecorded` on a second answer
    pub fn record_feedback(&self, label: FeedbackLabel) -> Result<(), FeedbackError> {
        let mut state = self.lock();
        state.feedback.select(label)?;
        tracing::info!(
            conversation_id = %state.conversation.id(),
            feedback = %label,
            "Feedback recorded"
        );
        Ok(())
    }

    // === Observable state ===

    pub fn conversation_id(&self) -> ConversationId {
        self.lock().conversation.id()
    }

    /// Snapshot of the turns so far.
    pub fn turns(&self) -> Vec<Turn> {
        self.lock().conversation.turns().to_vec()
    }

    /// Snapshot of the whole conversation.
    pub fn conversation(&self) -> Conversation {
        self.lock().conversation.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    /// Message of the most recent provider failure, cleared by the next good reply.
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn feedback(&self) -> FeedbackState {
        self.lock().feedback.clone()
    }

    /// Ends the session, handing back the transcript and feedback.
    pub fn end(self) -> SessionSummary {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        tracing::info!(
            conversation_id = %state.conversation.id(),
            turns = state.conversation.len(),
            feedback = ?state.feedback.selection(),
            "Session ended"
        );

        SessionSummary {
            conversation: state.conversation,
            feedback: state.feedback,
        }
    }

    // === Internals ===

    fn build_request(&self, conversation: &Conversation, user_turn_id: TurnId) -> CompletionRequest {
        let metadata = RequestMetadata::new(conversation.id(), format!("turn-{}", user_turn_id));
        CompletionRequest::from_turns(metadata, conversation.turns())
            .with_system_prompt(&self.settings.preamble)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature)
    }

    fn evaluate_feedback(&self, state: &mut SessionState) -> bool {
        let SessionState {
            conversation,
            feedback,
            ..
        } = state;

        let fired = feedback.evaluate(&self.trigger, conversation);
        if fired {
            tracing::info!(conversation_id = %conversation.id(), "Feedback prompt shown");
        }
        fired
    }

    fn record_failure(
        &self,
        state: &mut SessionState,
        err: &AIError,
        conversation_id: ConversationId,
        user_turn_id: TurnId,
    ) {
        tracing::warn!(
            %conversation_id,
            %user_turn_id,
            error = %err,
            retryable = err.is_retryable(),
            "Completion failed"
        );
        state.last_error = Some(err.to_string());
        append_assistant(state, CONNECTION_ERROR_TEXT.to_string());
    }

    // State stays usable after a poisoning panic.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Closes out a submission whose future is dropped (or unwinds) before the
/// provider answers, so the session is left ready for the next one.
struct PendingReply<'a> {
    controller: &'a ConversationController,
    user_turn_id: TurnId,
}

impl PendingReply<'_> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        let mut state = self.controller.lock();
        tracing::warn!(
            conversation_id = %state.conversation.id(),
            user_turn_id = %self.user_turn_id,
            "Submission abandoned before the reply arrived"
        );
        state.last_error = Some("Reply abandoned before completion".to_string());
        append_assistant(&mut state, CONNECTION_ERROR_TEXT.to_string());
        state.in_flight = false;
    }
}

fn append_assistant(state: &mut SessionState, text: String) {
    let appended = Turn::assistant(text).and_then(|turn| state.conversation.append(turn).map(|_| ()));
    if let Err(err) = appended {
        tracing::error!(error = %err, "Could not record assistant turn");
    }
}
