//! Remote answering backend abstraction.
//!
//! Provides a unified interface over the answering service so the
//! conversation controller can be exercised against fakes in tests and the
//! HTTP client in production.

use crate::error::ResponderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An answer returned by the remote answering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The response text.
    pub text: String,
}

impl Answer {
    /// Creates a new answer.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns true if the answer carries no usable text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Configuration for the remote answering service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Base URL of the answering service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ResponderConfig {
    /// Creates a configuration for the given base URL with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Trait for remote answering backends.
///
/// Implementations perform exactly one outbound request per call and do not
/// retry internally; failure recovery is the caller's responsibility.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Submits a question and returns the service's answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, replies with a
    /// non-success status, or replies with a body missing the answer field.
    async fn ask(&self, question: &str) -> Result<Answer, ResponderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_blank_detection() {
        assert!(Answer::new("").is_blank());
        assert!(Answer::new("   ").is_blank());
        assert!(!Answer::new("Hi!").is_blank());
    }

    #[test]
    fn config_has_correct_defaults() {
        let config = ResponderConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn config_builder() {
        let config = ResponderConfig::new("http://chat.internal:8080").with_timeout_seconds(5);
        assert_eq!(config.base_url, "http://chat.internal:8080");
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn config_serde_defaults_missing_fields() {
        let config: ResponderConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout_seconds, 30);
    }
}
