//! Conversation session core for the Lendora support chat.
//!
//! This crate provides:
//!
//! - **Messages**: the ordered user/assistant dialogue turns
//! - **Session**: the append-only message log and pending flag
//! - **Controller**: the submission state machine that drives the remote
//!   call and guarantees a reply is always produced
//!
//! Rendering is an external collaborator: it submits utterances, reads
//! snapshots, and subscribes to state changes. It never mutates state.

pub mod controller;
pub mod message;
pub mod session;

pub use controller::{ConversationController, SubmitOutcome, GREETING, PROCESSING_APOLOGY};
pub use message::{Message, Sender};
pub use session::{Session, SessionState, StateSnapshot};
