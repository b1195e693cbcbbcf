//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LABFLOW_API_URL` - Base URL of the backend API (e.g.,
//!   `https://lab.example.com/api`)
//!
//! ## Optional
//! - `CLAUDE_API_KEY` - Anthropic API key; without it the chat assistant is
//!   disabled and chat messages receive an error turn instead of a reply
//! - `CLAUDE_MODEL` - Model ID (default: claude-sonnet-4-20250514)

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// LabFlow client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base URL.
    pub api_url: Url,
    /// Chat assistant configuration (optional - chat is disabled without it).
    pub chat: Option<ChatConfig>,
}

/// Chat completion service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ChatConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-sonnet-4-20250514)
    pub model: String,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LABFLOW_API_URL` is missing or not a valid
    /// URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("LABFLOW_API_URL")?;
        let api_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("LABFLOW_API_URL".to_string(), e.to_string()))?;

        let chat = ChatConfig::from_env();
        if chat.is_none() {
            tracing::debug!("CLAUDE_API_KEY not set, chat assistant disabled");
        }

        Ok(Self { api_url, chat })
    }
}

impl ChatConfig {
    /// Load chat configuration from environment.
    ///
    /// Returns `None` if `CLAUDE_API_KEY` is not set (chat disabled).
    fn from_env() -> Option<Self> {
        let api_key = get_optional_env("CLAUDE_API_KEY")?;
        Some(Self {
            api_key: SecretString::from(api_key),
            model: get_env_or_default("CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_debug_redacts_api_key() {
        let config = ChatConfig {
            api_key: SecretString::from("sk-ant-super-secret-key"),
            model: DEFAULT_CLAUDE_MODEL.to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains(DEFAULT_CLAUDE_MODEL));
        assert!(!debug_output.contains("sk-ant-super-secret-key"));
    }

    #[test]
    fn test_default_claude_model() {
        assert_eq!(DEFAULT_CLAUDE_MODEL, "claude-sonnet-4-20250514");
    }
}
