//! File-backed session store.
//!
//! One JSON file per session under a data directory. Saves write to a
//! temporary file and rename it into place, so a crash mid-write never
//! leaves a truncated session on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// Session store persisting each session as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    data_dir: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at `data_dir`, creating the directory if needed.
    pub async fn new(data_dir: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| SessionStoreError::io(format!("create data dir: {}", e)))?;
        Ok(Self { data_dir })
    }

    /// Path of the session file for `id`.
    ///
    /// Session ids are caller-supplied opaque strings, so they are
    /// hex-encoded rather than used as filenames directly.
    fn session_path(&self, id: &SessionId) -> PathBuf {
        let encoded: String = id
            .as_str()
            .bytes()
            .map(|b| format!("{:02x}", b))
            .collect();
        self.data_dir.join(format!("{}.json", encoded))
    }

    async fn write_atomically(&self, path: &Path, contents: &[u8]) -> Result<(), SessionStoreError> {
        let tmp = self
            .data_dir
            .join(format!(".tmp-{}", Uuid::new_v4().simple()));

        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| SessionStoreError::io(format!("write session file: {}", e)))?;

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(SessionStoreError::io(format!("replace session file: {}", e)));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError> {
        let path = self.session_path(id);

        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(session_id = %id, "creating new session");
                return Ok(Session::new());
            }
            Err(e) => return Err(SessionStoreError::io(format!("read session file: {}", e))),
        };

        serde_json::from_slice(&contents)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
    }

    async fn save(&self, id: &SessionId, session: &Session) -> Result<(), SessionStoreError> {
        let contents = serde_json::to_vec_pretty(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        self.write_atomically(&self.session_path(id), &contents).await
    }
}
