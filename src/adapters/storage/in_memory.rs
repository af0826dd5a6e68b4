//! In-memory session store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// Session store backed by a shared in-process map.
///
/// Suitable for development and tests; all sessions are lost on restart.
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns true if no session is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionStoreError::io("session map lock poisoned"))?;

        match guard.get(id) {
            Some(session) => Ok(session.clone()),
            None => {
                debug!(session_id = %id, "creating new session");
                Ok(Session::new())
            }
        }
    }

    async fn save(&self, id: &SessionId, session: &Session) -> Result<(), SessionStoreError> {
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionStoreError::io("session map lock poisoned"))?;

        guard.insert(id.clone(), session.clone());
        Ok(())
    }
}
