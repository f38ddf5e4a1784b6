//! HTTP implementation of the answering backend.
//!
//! Wire contract: `POST {base_url}/api/chat` with body `{"question": ...}`;
//! a success reply carries `{"answer": ...}`. One round-trip per call, no
//! retries, no caching.

use crate::backend::{Answer, Responder, ResponderConfig};
use crate::error::ResponderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Request body for the chat endpoint.
#[derive(Debug, Serialize)]
struct AskRequestBody<'a> {
    question: &'a str,
}

/// Response body from the chat endpoint.
///
/// The answer field is optional so a 2xx body without it can be classified
/// as malformed rather than failing JSON decoding outright.
#[derive(Debug, Deserialize)]
struct AskResponseBody {
    answer: Option<String>,
}

/// HTTP client for the remote answering service.
#[derive(Debug, Clone)]
pub struct HttpResponder {
    client: reqwest::Client,
    ask_url: String,
}

impl HttpResponder {
    /// Creates a responder from configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the HTTP client cannot be constructed.
    pub fn new(config: &ResponderConfig) -> Result<Self, ResponderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ResponderError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            ask_url: format!("{}/api/chat", config.base_url.trim_end_matches('/')),
        })
    }

    /// Returns the endpoint this responder posts questions to.
    #[must_use]
    pub fn ask_url(&self) -> &str {
        &self.ask_url
    }
}

#[async_trait]
impl Responder for HttpResponder {
    #[instrument(skip(self, question), fields(url = %self.ask_url))]
    async fn ask(&self, question: &str) -> Result<Answer, ResponderError> {
        let response = self
            .client
            .post(&self.ask_url)
            .json(&AskRequestBody { question })
            .send()
            .await
            .map_err(|e| ResponderError::Network {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "answering service rejected request");
            return Err(ResponderError::Server {
                status: status.as_u16(),
            });
        }

        let body: AskResponseBody =
            response
                .json()
                .await
                .map_err(|e| ResponderError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let answer = body
            .answer
            .ok_or_else(|| ResponderError::MalformedResponse {
                reason: "response body missing 'answer' field".to_string(),
            })?;

        debug!(answer_len = answer.len(), "received answer");
        Ok(Answer::new(answer))
    }
}
