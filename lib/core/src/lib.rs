//! Core domain types and utilities for the Lendora support chat.
//!
//! This crate provides the foundational types, error handling, and shared
//! utilities used throughout the support-chat session core.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ConversationSessionId, MessageId, ParseIdError};
