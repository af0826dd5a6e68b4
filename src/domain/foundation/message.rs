//! Conversation turn messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User input.
    User,
    /// Assistant (orchestrator/oracle) reply.
    Assistant,
}

/// A single message in a session's turn history.
///
/// History is append-only: messages are never edited or removed once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMessage {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
    /// When the message was appended.
    pub sent_at: DateTime<Utc>,
}

impl TurnMessage {
    /// Creates a new message stamped with the current time.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Returns true if this message came from the user.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
