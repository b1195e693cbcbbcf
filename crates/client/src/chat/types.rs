//! Wire types for the chat completion service.
//!
//! These match the Anthropic Messages API (non-streaming).

use serde::{Deserialize, Serialize};

/// A message in a conversation with the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender ("user" or "assistant").
    pub role: String,
    /// The text content of the message.
    pub content: String,
}

/// Request body for the Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// Response from the Messages API (non-streaming).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Unique response ID.
    pub id: String,
    /// Model that generated the response.
    pub model: String,
    /// Response content blocks.
    pub content: Vec<ContentBlock>,
    /// Token usage information.
    pub usage: Usage,
}

impl ChatResponse {
    /// All text content, joined in block order.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| {
                let ContentBlock::Text { text } = block;
                text.as_str()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A content block within a response.
///
/// Only text blocks occur here: we send no tool definitions, so the model
/// cannot answer with anything else.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

/// API error response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiErrorDetail,
}

/// Nested error details.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_blocks() {
        let json = r#"{
            "id": "msg_1",
            "model": "claude-sonnet-4-20250514",
            "content": [
                {"type": "text", "text": "Hay 12 órdenes."},
                {"type": "text", "text": "Tres vencen esta semana."}
            ],
            "usage": {"input_tokens": 100, "output_tokens": 20}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.text(), "Hay 12 órdenes.\nTres vencen esta semana.");
    }

    #[test]
    fn test_request_omits_missing_system_prompt() {
        let request = ChatRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            messages: Vec::new(),
            system: None,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_error_envelope_deserializes() {
        let json = r#"{
            "type": "error",
            "error": {"type": "invalid_request_error", "message": "max_tokens is too large"}
        }"#;
        let envelope: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(envelope.error.error_type, "invalid_request_error");
    }
}
