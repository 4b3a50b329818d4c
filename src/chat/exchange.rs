//! One user-message-in, assistant-reply-out round trip, as pure updates.
//!
//! An exchange is split around the completion call:
//!
//! - [`begin`] validates the input buffer and, if it may proceed, records the
//!   user message, clears the buffer, and raises the loading flag.
//! - [`settle`] records the outcome of the call and lowers the loading flag.
//!
//! The caller performs the call in between.  Loading is therefore set exactly
//! while a call is outstanding.  A second `begin` while loading is refused and
//! leaves the state untouched.

use crate::binding::AssistantBinding;
use crate::error::Error;
use crate::markdown::render_markdown;

use super::state::{ChatState, Sender};

/// Error text used when a failure carries no message of its own.
pub const FALLBACK_ERROR: &str = "Failed to send message";

/// Why [`begin`] declined to start an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The input buffer is empty after trimming.
    EmptyInput,
    /// The class has no assistant binding.
    Unbound,
}

/// An exchange waiting on its completion call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingExchange {
    /// The text to send, exactly as it was typed.
    pub text: String,
}

/// Result of [`begin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Begin {
    /// Nothing happened.
    Skipped(SkipReason),
    /// Another exchange is in flight; nothing happened.
    Busy,
    /// The user message was recorded; the call should now be made.
    Started(PendingExchange),
}

/// Result of [`settle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settled {
    /// The assistant reply was appended; carries its HTML.
    Replied(String),
    /// The error slot was set; carries the displayed text.
    Failed(String),
}

/// Starts an exchange from the input buffer if allowed.
pub fn begin(state: &mut ChatState, binding: Option<&AssistantBinding>) -> Begin {
    if state.input().trim().is_empty() {
        return Begin::Skipped(SkipReason::EmptyInput);
    }
    if !binding.is_some_and(AssistantBinding::is_bound) {
        return Begin::Skipped(SkipReason::Unbound);
    }
    if state.is_loading() {
        return Begin::Busy;
    }
    let text = state.input().to_string();
    state.append_message(Sender::User, text.clone());
    state.clear_input();
    state.set_loading(true);
    Begin::Started(PendingExchange { text })
}

/// Records the outcome of the completion call started by [`begin`].
pub fn settle(state: &mut ChatState, outcome: Result<String, Error>) -> Settled {
    let settled = match outcome {
        Ok(reply) => {
            let html = render_markdown(&reply);
            state.append_message(Sender::Assistant, html.clone());
            Settled::Replied(html)
        }
        Err(err) => {
            let message = error_text(&err);
            state.set_error(Some(message.clone()));
            Settled::Failed(message)
        }
    };
    state.set_loading(false);
    settled
}

/// The user-visible text for a failed exchange.
///
/// The error's own message is kept verbatim; only a blank message is replaced.
pub fn error_text(err: &Error) -> String {
    let message = err.message();
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message.to_string()
    }
}
