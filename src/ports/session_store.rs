//! Session Store Port - Interface for persisting session state.
//!
//! The store is the sole owner of context state between turns. Saves are
//! atomic per session: history, both domain contexts, and the active
//! domain are replaced as one unit, never partially.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;

/// Port for loading and saving sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the session for `id`, creating an empty one if absent.
    ///
    /// A fresh session has empty history, no active domain, and default
    /// contexts for every supported domain.
    async fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError>;

    /// Replaces the full session state in one atomic unit.
    async fn save(&self, id: &SessionId, session: &Session) -> Result<(), SessionStoreError>;
}

/// Errors from the session store.
///
/// Store unavailability is the one external failure treated as fatal to
/// the request rather than recovered into a reply.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl SessionStoreError {
    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_displays_message() {
        let err = SessionStoreError::io("disk full");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn serialization_error_displays_reason() {
        let err = SessionStoreError::SerializationFailed("bad json".to_string());
        assert!(err.to_string().contains("serialize"));
    }
}
