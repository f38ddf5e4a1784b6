//! Centralized CLI configuration.
//!
//! This module provides strongly-typed configuration for the terminal
//! front-end, loaded via the `config` crate from environment variables.

use lendora_responder::ResponderConfig;
use serde::Deserialize;

/// CLI configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct CliConfig {
    /// Remote answering service configuration.
    /// Environment: `RESPONDER__BASE_URL`, `RESPONDER__TIMEOUT_SECONDS`.
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Optional pre-chat suggestion submitted as the first user turn once
    /// the session opens. Environment: `SEED`.
    #[serde(default)]
    pub seed: Option<String>,
}

impl CliConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if present configuration values are invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
