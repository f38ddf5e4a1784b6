//! Conversation session state.
//!
//! A session is the ordered message log plus the transient pending flag.
//! It is owned and mutated exclusively by the conversation controller;
//! rendering collaborators see it only through cloned [`StateSnapshot`]s.

use crate::message::Message;
use chrono::{DateTime, Utc};
use lendora_core::ConversationSessionId;
use serde::{Deserialize, Serialize};

/// The state of a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Session is active and accepting submissions.
    Active,
    /// Session has been closed; submissions are rejected and late replies
    /// are discarded.
    Closed,
}

impl SessionState {
    /// Returns true if the session can accept submissions.
    #[must_use]
    pub fn can_accept_messages(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns true if the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// A conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: ConversationSessionId,
    /// Session state.
    pub state: SessionState,
    /// Messages in this session, in conversation order. Append-only.
    pub messages: Vec<Message>,
    /// True while a remote call is outstanding. At most one submission is
    /// in flight at a time.
    pub pending: bool,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last active.
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new, empty session.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationSessionId::new(),
            state: SessionState::Active,
            messages: Vec::new(),
            pending: false,
            created_at: now,
            last_active_at: now,
        }
    }

    /// Appends a message to the session.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.last_active_at = Utc::now();
    }

    /// Sets the pending flag.
    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    /// Closes the session. A closed session is never reopened.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
        self.pending = false;
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the last message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns a read-only snapshot for rendering collaborators.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            messages: self.messages.clone(),
            pending: self.pending,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only view of the conversation handed to observers.
///
/// Snapshots are owned copies; mutating one has no effect on the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Messages in conversation order.
    pub messages: Vec<Message>,
    /// True while a remote call is outstanding.
    pub pending: bool,
}

impl StateSnapshot {
    /// Returns the last message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
