//! Chat conversation turns.

use serde::{Deserialize, Serialize};

use crate::types::ChatRole;

/// One turn in the assistant conversation.
///
/// The conversation is an append-only, session-scoped sequence; it is never
/// persisted server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// A turn authored by the operator.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// A turn authored by the model.
    #[must_use]
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}
