//! Conversation state for a chat session.
//!
//! `ChatState` is a plain struct.  Every mutation goes through one of the
//! methods below; the exchange logic in [`super::exchange`] is written purely
//! in terms of them.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person typing.
    User,
    /// The remote assistant.
    Assistant,
}

/// One entry of the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub sender: Sender,
    /// Raw text for user messages, sanitized HTML for assistant messages.
    pub text: String,
    /// When the message was appended.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn now(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Transcript, input buffer, loading flag and error slot.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    messages: Vec<Message>,
    input: String,
    loading: bool,
    error: Option<String>,
}

impl ChatState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message stamped now.  The transcript is append-only.
    pub fn append_message(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(Message::now(sender, text));
    }

    /// Replaces the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Empties the input buffer.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Drops every message.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// The transcript in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut state = ChatState::new();
        state.append_message(Sender::User, "one");
        state.append_message(Sender::Assistant, "<p>two</p>");
        state.append_message(Sender::User, "three");
        let texts: Vec<&str> = state.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "<p>two</p>", "three"]);
        assert_eq!(state.messages()[1].sender, Sender::Assistant);
        assert!(state.messages()[0].timestamp <= state.messages()[2].timestamp);
    }

    #[test]
    fn reset_only_clears_messages() {
        let mut state = ChatState::new();
        state.append_message(Sender::User, "hello");
        state.set_input("draft");
        state.set_error(Some("boom".to_string()));
        state.reset();
        assert!(state.messages().is_empty());
        assert_eq!(state.input(), "draft");
        assert_eq!(state.error(), Some("boom"));
    }

    #[test]
    fn reset_on_empty_state() {
        let mut state = ChatState::new();
        state.reset();
        assert!(state.messages().is_empty());
    }

    #[test]
    fn input_buffer() {
        let mut state = ChatState::new();
        state.set_input("hello");
        assert_eq!(state.input(), "hello");
        state.clear_input();
        assert_eq!(state.input(), "");
    }

    #[test]
    fn flags() {
        let mut state = ChatState::new();
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        state.set_loading(true);
        state.set_error(Some("x".to_string()));
        assert!(state.is_loading());
        assert_eq!(state.error(), Some("x"));
        state.set_error(None);
        assert!(state.error().is_none());
    }

    #[test]
    fn message_serializes_timestamp_as_rfc3339() {
        let message = Message {
            sender: Sender::User,
            text: "hi".to_string(),
            timestamp: time::macros::datetime!(2024-05-01 12:00 UTC),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"sender":"user","text":"hi","timestamp":"2024-05-01T12:00:00Z"}"#
        );
    }
}
