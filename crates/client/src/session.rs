//! Persisted session: the `{token, user}` pair that survives restarts.
//!
//! This is the only client-side state that outlives the process. Entity
//! collections are never persisted; they are re-fetched from the backend on
//! every session restoration. One well-known file holds the serialized
//! [`AuthSession`]; its absence means "logged out".

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;
use tracing::warn;

use labflow_core::AuthSession;

const SESSION_FILE: &str = "session.json";

/// Errors that can occur while persisting the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No platform configuration directory is available.
    #[error("no configuration directory available for this platform")]
    NoConfigDir,

    /// Reading or writing the session file failed.
    #[error("session file I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the session failed.
    #[error("session serialization: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable storage for the authenticated session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store the session under the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoConfigDir`] when the platform offers no
    /// config directory (e.g., `$HOME` unset).
    pub fn from_project_dirs() -> Result<Self, SessionError> {
        let dirs = ProjectDirs::from("", "", "labflow").ok_or(SessionError::NoConfigDir)?;
        Ok(Self {
            path: dirs.config_dir().join(SESSION_FILE),
        })
    }

    /// Store the session at an explicit path (used by tests).
    #[must_use]
    pub const fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the persisted session, if any.
    ///
    /// A missing file is a normal logged-out state. A corrupt file is
    /// treated the same way (logged at warn) - the user simply logs in
    /// again.
    #[must_use]
    pub fn load(&self) -> Option<AuthSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return None,
            Err(error) => {
                warn!(%error, path = %self.path.display(), "failed to read session file");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(error) => {
                warn!(%error, path = %self.path.display(), "corrupt session file, ignoring");
                None
            }
        }
    }

    /// Persist the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] when the directory or file cannot be
    /// written.
    pub fn save(&self, session: &AuthSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Remove the persisted session. Removing an absent file is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] on any failure other than the file not
    /// existing.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labflow_core::{User, UserId, UserRole};

    fn sample_session() -> AuthSession {
        AuthSession {
            token: "tok-123".to_string(),
            user: User {
                id: UserId::new("u1"),
                email: "admin@admin.com".to_string(),
                role: UserRole::Admin,
            },
        }
    }

    fn temp_store(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::at_path(dir.path().join("nested").join(SESSION_FILE))
    }

    #[test]
    fn test_save_load_clear_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        assert!(store.load().is_none());

        store.save(&sample_session()).expect("save");
        let loaded = store.load().expect("session present");
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.user.email, "admin@admin.com");

        store.clear().expect("clear");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        store.clear().expect("first clear");
        store.clear().expect("second clear");
    }

    #[test]
    fn test_corrupt_file_treated_as_logged_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        fs::write(store.path(), "{not json").expect("write");

        assert!(store.load().is_none());
    }
}
