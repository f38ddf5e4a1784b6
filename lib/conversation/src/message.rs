//! Message types for conversations.

use chrono::{DateTime, Utc};
use lendora_core::MessageId;
use serde::{Deserialize, Serialize};

/// The sender of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// User/human message.
    User,
    /// Assistant message.
    Assistant,
}

/// A single turn in the dialogue.
///
/// Messages are immutable once appended to a session; the log is
/// append-only for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Who sent the message.
    pub sender: Sender,
    /// Display text. Non-empty once committed; blank user input is rejected
    /// before a message is created.
    pub text: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_creation() {
        let msg = Message::user("Can I cancel a booking?");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "Can I cancel a booking?");
    }

    #[test]
    fn assistant_message_creation() {
        let msg = Message::assistant("You can cancel up to 24 hours before.");
        assert_eq!(msg.sender, Sender::Assistant);
    }

    #[test]
    fn messages_get_distinct_ids() {
        let a = Message::user("first");
        let b = Message::user("second");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = Message::assistant("Hi!");

        let json = serde_json::to_string(&msg).expect("serialize");
        let parsed: Message = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(msg.id, parsed.id);
        assert_eq!(msg.sender, parsed.sender);
        assert_eq!(msg.text, parsed.text);
    }

    #[test]
    fn sender_serializes_lowercase() {
        let json = serde_json::to_string(&Sender::Assistant).expect("serialize");
        assert_eq!(json, r#""assistant""#);
    }
}
