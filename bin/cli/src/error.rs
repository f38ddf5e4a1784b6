//! Error types for the terminal front-end.

use lendora_responder::ResponderError;
use std::fmt;

/// Errors from CLI startup and the input loop.
///
/// The conversation core itself has no fatal error path; everything here is
/// from the surrounding plumbing.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded.
    Config { reason: String },
    /// The responder could not be constructed.
    Responder(ResponderError),
    /// Reading or writing the terminal failed.
    Io { reason: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "failed to load configuration: {reason}"),
            Self::Responder(e) => write!(f, "failed to construct responder: {e}"),
            Self::Io { reason } => write!(f, "terminal i/o failed: {reason}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ResponderError> for CliError {
    fn from(e: ResponderError) -> Self {
        Self::Responder(e)
    }
}
