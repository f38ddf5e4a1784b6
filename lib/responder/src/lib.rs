//! Remote answering service client for the Lendora support chat.
//!
//! This crate provides the two answer sources the conversation core draws
//! from:
//!
//! - **Responder**: a single-call abstraction over the remote answering
//!   service, with an HTTP implementation
//! - **Fallback**: a deterministic keyword resolver used when the remote
//!   service cannot supply an answer
//!
//! Retry and fallback policy live in the conversation controller; a
//! responder performs exactly one round-trip per call and never falls back
//! on its own.

pub mod backend;
pub mod error;
pub mod fallback;
pub mod http;

pub use backend::{Answer, Responder, ResponderConfig};
pub use error::ResponderError;
pub use fallback::{FallbackResolver, FallbackRule};
pub use http::HttpResponder;
