//! The conversation controller.
//!
//! Owns the session, drives the remote-call lifecycle, and guarantees that
//! every accepted submission terminates in an appended assistant reply:
//! the remote answer when the service delivers one, a fixed apology when it
//! delivers an empty one, and a keyword fallback when it fails.
//!
//! A submission moves through three states: idle, awaiting the remote
//! reply, resolved. The pending flag serializes submissions; while one is
//! awaiting, further submissions are rejected rather than interleaved so
//! replies can never attach to the wrong user turn.

use crate::message::Message;
use crate::session::{Session, StateSnapshot};
use lendora_core::ConversationSessionId;
use lendora_responder::{FallbackResolver, Responder};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

/// Assistant greeting appended when a session starts.
pub const GREETING: &str =
    "Hi there! \u{1F44B} I'm Lendora's rental assistant. How can I help you today?";

/// Reply substituted when the service answers successfully but with an
/// empty answer. A failed call takes the keyword fallback path instead.
pub const PROCESSING_APOLOGY: &str =
    "I'm sorry, I couldn't process your request at this time.";

/// The result of a submission. Submissions never fail; they are either
/// answered or rejected as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission ran to completion and an assistant reply was appended.
    Answered,
    /// The input was blank after trimming; nothing changed.
    RejectedEmpty,
    /// Another submission is awaiting its remote reply; nothing changed.
    RejectedBusy,
    /// The session is closed; nothing changed.
    RejectedClosed,
    /// The session was closed while the reply was outstanding; the reply
    /// was discarded.
    Discarded,
}

type Observer = Box<dyn Fn(&StateSnapshot) + Send + Sync>;

/// Orchestrates a single conversation session.
///
/// Generic over the responder so tests can substitute a fake without
/// touching global state. Methods take `&self`; the controller can be
/// shared behind an `Arc` by the rendering collaborator.
pub struct ConversationController<R: Responder> {
    responder: R,
    fallback: FallbackResolver,
    session: Mutex<Session>,
    observers: Mutex<Vec<Observer>>,
}

impl<R: Responder> ConversationController<R> {
    /// Creates a controller with the default greeting already appended.
    #[must_use]
    pub fn new(responder: R) -> Self {
        Self::with_greeting(responder, GREETING)
    }

    /// Creates a controller with a custom greeting.
    #[must_use]
    pub fn with_greeting(responder: R, greeting: impl Into<String>) -> Self {
        let mut session = Session::new();
        session.append(Message::assistant(greeting));

        Self {
            responder,
            fallback: FallbackResolver::new(),
            session: Mutex::new(session),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Creates a controller and replays an optional pre-chat suggestion as
    /// the first user turn.
    ///
    /// A seed runs through the ordinary submit path; it differs from a
    /// typed submission only in who initiates it.
    pub async fn open(responder: R, seed: Option<&str>) -> Self {
        let controller = Self::new(responder);
        if let Some(seed) = seed {
            controller.submit(seed).await;
        }
        controller
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> ConversationSessionId {
        self.lock_session().id
    }

    /// Returns true once the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock_session().state.is_closed()
    }

    /// Returns a read-only snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.lock_session().snapshot()
    }

    /// Subscribes to state updates. The callback runs after every message
    /// appension and every pending-flag change.
    pub fn on_state_change<F>(&self, callback: F)
    where
        F: Fn(&StateSnapshot) + Send + Sync + 'static,
    {
        self.lock_observers().push(Box::new(callback));
    }

    /// Submits a user utterance and resolves an assistant reply for it.
    ///
    /// Blank input, a closed session, and an already-outstanding submission
    /// are rejected without touching the message log. Remote failures never
    /// surface to the caller; they are absorbed into a locally resolved
    /// reply.
    #[instrument(skip_all, fields(session = %self.id()))]
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("ignoring blank submission");
            return SubmitOutcome::RejectedEmpty;
        }

        // Commit the user turn and mark the call in flight under one lock
        // acquisition, so two submissions cannot both pass the guard.
        let (after_append, after_pending) = {
            let mut session = self.lock_session();
            if session.state.is_closed() {
                debug!("session closed, rejecting submission");
                return SubmitOutcome::RejectedClosed;
            }
            if session.pending {
                debug!("submission already in flight, rejecting");
                return SubmitOutcome::RejectedBusy;
            }

            session.append(Message::user(trimmed));
            let after_append = session.snapshot();
            session.set_pending(true);
            let after_pending = session.snapshot();
            (after_append, after_pending)
        };
        self.emit(&after_append);
        self.emit(&after_pending);

        // The only suspension point. The lock is not held across it, so the
        // session can be closed while the call is outstanding.
        let reply = match self.responder.ask(trimmed).await {
            Ok(answer) if !answer.is_blank() => answer.text,
            Ok(_) => {
                debug!("remote answer was empty, substituting apology");
                PROCESSING_APOLOGY.to_string()
            }
            Err(error) => {
                warn!(%error, "remote responder failed, resolving fallback");
                self.fallback.resolve(trimmed).to_string()
            }
        };

        let (after_reply, after_resolved) = {
            let mut session = self.lock_session();
            if session.state.is_closed() {
                debug!("session closed while awaiting reply, discarding");
                return SubmitOutcome::Discarded;
            }

            session.append(Message::assistant(reply));
            let after_reply = session.snapshot();
            session.set_pending(false);
            let after_resolved = session.snapshot();
            (after_reply, after_resolved)
        };
        self.emit(&after_reply);
        self.emit(&after_resolved);

        SubmitOutcome::Answered
    }

    /// Closes the session. Subsequent submissions are rejected and a reply
    /// still in flight is discarded on arrival. Idempotent.
    pub fn close(&self) {
        let cleared_pending = {
            let mut session = self.lock_session();
            if session.state.is_closed() {
                return;
            }
            let was_pending = session.pending;
            session.close();
            was_pending.then(|| session.snapshot())
        };

        // Closing appends nothing; observers only hear about it when it
        // clears an outstanding pending flag.
        if let Some(snapshot) = cleared_pending {
            self.emit(&snapshot);
        }
        debug!("session closed");
    }

    fn emit(&self, snapshot: &StateSnapshot) {
        for observer in self.lock_observers().iter() {
            observer(snapshot);
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<Observer>> {
        self.observers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use async_trait::async_trait;
    use lendora_responder::{Answer, ResponderError};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Fake responder following a fixed script.
    enum Script {
        Answer(&'static str),
        EmptyAnswer,
        Fail,
    }

    struct ScriptedResponder {
        script: Script,
    }

    impl ScriptedResponder {
        fn answering(text: &'static str) -> Self {
            Self {
                script: Script::Answer(text),
            }
        }

        fn empty() -> Self {
            Self {
                script: Script::EmptyAnswer,
            }
        }

        fn failing() -> Self {
            Self {
                script: Script::Fail,
            }
        }
    }

    #[async_trait]
    impl Responder for ScriptedResponder {
        async fn ask(&self, _question: &str) -> Result<Answer, ResponderError> {
            match self.script {
                Script::Answer(text) => Ok(Answer::new(text)),
                Script::EmptyAnswer => Ok(Answer::new("")),
                Script::Fail => Err(ResponderError::Network {
                    reason: "connection refused".to_string(),
                }),
            }
        }
    }

    /// Fake responder that holds the reply until released.
    struct GatedResponder {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Responder for GatedResponder {
        async fn ask(&self, _question: &str) -> Result<Answer, ResponderError> {
            self.gate.notified().await;
            Ok(Answer::new("late reply"))
        }
    }

    #[tokio::test]
    async fn fresh_controller_has_only_greeting() {
        let controller = ConversationController::new(ScriptedResponder::answering("Hi!"));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].sender, Sender::Assistant);
        assert_eq!(snapshot.messages[0].text, GREETING);
        assert!(!snapshot.pending);
    }

    #[tokio::test]
    async fn remote_answer_is_appended() {
        let controller = ConversationController::new(ScriptedResponder::answering("Hi!"));

        let outcome = controller.submit("hello").await;

        assert_eq!(outcome, SubmitOutcome::Answered);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(snapshot.messages[1].sender, Sender::User);
        assert_eq!(snapshot.messages[1].text, "hello");
        assert_eq!(snapshot.last_message().unwrap().text, "Hi!");
        assert!(!snapshot.pending);
    }

    #[tokio::test]
    async fn remote_failure_resolves_keyword_fallback() {
        let controller = ConversationController::new(ScriptedResponder::failing());

        controller.submit("Can I cancel a booking?").await;

        let expected = FallbackResolver::new().resolve("Can I cancel a booking?");
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.last_message().unwrap().text, expected);
        assert!(!snapshot.pending);
    }

    #[tokio::test]
    async fn empty_remote_answer_gets_apology() {
        let controller = ConversationController::new(ScriptedResponder::empty());

        controller.submit("Can I cancel a booking?").await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.last_message().unwrap().text, PROCESSING_APOLOGY);
    }

    #[tokio::test]
    async fn seed_is_replayed_as_first_user_turn() {
        let controller =
            ConversationController::open(ScriptedResponder::failing(), Some("Give me ideas to rent"))
                .await;

        let expected = FallbackResolver::new().resolve("Give me ideas to rent");
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(snapshot.messages[0].text, GREETING);
        assert_eq!(snapshot.messages[1].sender, Sender::User);
        assert_eq!(snapshot.messages[1].text, "Give me ideas to rent");
        assert_eq!(snapshot.messages[2].sender, Sender::Assistant);
        assert_eq!(snapshot.messages[2].text, expected);
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let controller = ConversationController::new(ScriptedResponder::answering("Hi!"));

        assert_eq!(controller.submit("").await, SubmitOutcome::RejectedEmpty);
        assert_eq!(controller.submit("   ").await, SubmitOutcome::RejectedEmpty);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert!(!snapshot.pending);
    }

    #[tokio::test]
    async fn submissions_are_trimmed() {
        let controller = ConversationController::new(ScriptedResponder::answering("Hi!"));

        controller.submit("  hello  ").await;

        assert_eq!(controller.snapshot().messages[1].text, "hello");
    }

    #[tokio::test]
    async fn messages_alternate_user_assistant() {
        let controller = ConversationController::new(ScriptedResponder::answering("Sure!"));

        for question in ["one", "two", "three"] {
            controller.submit(question).await;
        }

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 1 + 2 * 3);
        for (index, message) in snapshot.messages.iter().enumerate().skip(1) {
            let expected = if index % 2 == 1 {
                Sender::User
            } else {
                Sender::Assistant
            };
            assert_eq!(message.sender, expected, "message {index}");
        }
    }

    #[tokio::test]
    async fn second_submission_rejected_while_pending() {
        let gate = Arc::new(Notify::new());
        let controller = Arc::new(ConversationController::new(GatedResponder {
            gate: Arc::clone(&gate),
        }));

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit("first").await })
        };
        while !controller.snapshot().pending {
            tokio::task::yield_now().await;
        }

        let second = controller.submit("second").await;
        assert_eq!(second, SubmitOutcome::RejectedBusy);
        assert_eq!(controller.snapshot().messages.len(), 2); // greeting + first user turn

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Answered);
        assert_eq!(controller.snapshot().messages.len(), 3);
    }

    #[tokio::test]
    async fn closed_controller_rejects_submissions() {
        let controller = ConversationController::new(ScriptedResponder::answering("Hi!"));
        controller.close();

        assert_eq!(
            controller.submit("hello").await,
            SubmitOutcome::RejectedClosed
        );
        assert!(controller.is_closed());
        assert_eq!(controller.snapshot().messages.len(), 1);
    }

    #[tokio::test]
    async fn reply_after_close_is_discarded() {
        let gate = Arc::new(Notify::new());
        let controller = Arc::new(ConversationController::new(GatedResponder {
            gate: Arc::clone(&gate),
        }));

        let submission = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit("hello").await })
        };
        while !controller.snapshot().pending {
            tokio::task::yield_now().await;
        }

        controller.close();
        gate.notify_one();

        assert_eq!(submission.await.unwrap(), SubmitOutcome::Discarded);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.last_message().unwrap().sender, Sender::User);
        assert!(!snapshot.pending);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let controller = ConversationController::new(ScriptedResponder::answering("Hi!"));
        controller.close();
        controller.close();
        assert!(controller.is_closed());
    }

    #[tokio::test]
    async fn observers_hear_every_mutation() {
        let controller = ConversationController::new(ScriptedResponder::answering("Hi!"));

        let seen: Arc<Mutex<Vec<(usize, bool)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.on_state_change(move |snapshot| {
            sink.lock()
                .unwrap()
                .push((snapshot.messages.len(), snapshot.pending));
        });

        controller.submit("hello").await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(2, false), (2, true), (3, true), (3, false)],
            "user append, pending set, assistant append, pending cleared"
        );
    }
}
