//! Chat bridge to the LLM completion service.
//!
//! The bridge composes a system prompt embedding a full JSON snapshot of
//! current application data, submits the conversation so far, and returns
//! the textual reply. It is the one place in the system where failures are
//! absorbed rather than raised: the owning store turns every [`ChatError`]
//! into a visible error turn in the conversation.
//!
//! # API Reference
//!
//! - Endpoint: `https://api.anthropic.com/v1/messages`
//! - Authentication: `x-api-key` header
//! - Versioning: `anthropic-version` header

pub mod prompt;
mod types;

pub use types::{ChatRequest, ChatResponse, ContentBlock, Message, Usage};

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::ChatConfig;

use types::ApiErrorResponse;

const MESSAGES_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Errors that can occur when interacting with the chat service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned an error response.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the service.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse the response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Chat completion service client.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<ChatClientInner>,
}

struct ChatClientInner {
    client: reqwest::Client,
    model: String,
}

impl ChatClient {
    /// Create a new chat client.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Parse`] if the API key contains characters that
    /// cannot appear in an HTTP header, or if the HTTP client fails to
    /// build.
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(config.api_key.expose_secret())
                .map_err(|e| ChatError::Parse(format!("invalid API key format: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(ChatClientInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    /// Submit a conversation and return the model's textual reply.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] on transport failure, service error, or an
    /// unparseable response. No retries.
    #[instrument(skip_all, fields(model = %self.inner.model, turns = messages.len()))]
    pub async fn complete(
        &self,
        system: String,
        messages: Vec<Message>,
    ) -> Result<String, ChatError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system: Some(system),
        };

        let response = self
            .inner
            .client
            .post(MESSAGES_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            let parsed: ChatResponse = serde_json::from_str(&body)
                .map_err(|e| ChatError::Parse(format!("failed to parse response: {e}")))?;
            Ok(parsed.text())
        } else {
            Err(Self::error_from_status(status, response).await)
        }
    }

    /// Classify an error status code.
    async fn error_from_status(status: reqwest::StatusCode, response: reqwest::Response) -> ChatError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ChatError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ChatError::Unauthorized("invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
                |_| ChatError::Api {
                    error_type: "unknown".to_string(),
                    message: body,
                },
                |envelope| ChatError::Api {
                    error_type: envelope.error.error_type,
                    message: envelope.error.message,
                },
            ),
            Err(e) => ChatError::Http(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_chat_client_builds_from_config() {
        let config = ChatConfig {
            api_key: SecretString::from("sk-ant-test"),
            model: "claude-sonnet-4-20250514".to_string(),
        };
        assert!(ChatClient::new(&config).is_ok());
    }

    #[test]
    fn test_chat_client_rejects_invalid_header_key() {
        let config = ChatConfig {
            api_key: SecretString::from("bad\nkey"),
            model: "claude-sonnet-4-20250514".to_string(),
        };
        assert!(matches!(ChatClient::new(&config), Err(ChatError::Parse(_))));
    }

    #[test]
    fn test_chat_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<ChatClient>();
        assert_send_sync::<ChatClient>();
    }

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = ChatError::Api {
            error_type: "invalid_request_error".to_string(),
            message: "bad request".to_string(),
        };
        assert_eq!(err.to_string(), "API error (invalid_request_error): bad request");
    }
}
