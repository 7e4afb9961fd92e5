//! Durable session store.
//!
//! Persists the access token and the signed-in user as two fixed-name entries
//! under the data directory. Both entries are always written and removed
//! together; callers never observe a half-cleared session. The store keeps an
//! in-memory copy behind a lock and only reads the disk on first access.
//!
//! The token is treated as opaque: no shape or expiry validation happens here.
//! An expired token is discovered reactively when an authorized call fails.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const TOKEN_ENTRY: &str = "auth_token";
const USER_ENTRY: &str = "auth_user.json";

/// Minimal record of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

/// The client's view of who is logged in.
///
/// `token` is `Some` iff a login or signup succeeded and no later logout or
/// authorization failure cleared it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
}

pub struct SessionStore {
    dir: PathBuf,
    state: Mutex<Option<Session>>,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state: Mutex::new(None),
        }
    }

    /// Current session, reconstructed from disk if not yet loaded.
    pub fn load(&self) -> Session {
        let mut state = self.state.lock();
        match &*state {
            Some(session) => session.clone(),
            None => {
                let session = self.read_disk();
                *state = Some(session.clone());
                session
            }
        }
    }

    /// Persist a new session. Both entries land on disk before the in-memory
    /// copy is replaced, so a failed write leaves the previous session intact.
    pub fn login(&self, token: &str, user: &SessionUser) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data dir: {}", self.dir.display()))?;

        let token_path = self.dir.join(TOKEN_ENTRY);
        std::fs::write(&token_path, token)
            .with_context(|| format!("Failed to write {}", token_path.display()))?;

        let user_path = self.dir.join(USER_ENTRY);
        let serialized = serde_json::to_string(user).context("Failed to serialize user record")?;
        std::fs::write(&user_path, serialized)
            .with_context(|| format!("Failed to write {}", user_path.display()))?;

        *self.state.lock() = Some(Session {
            token: Some(token.to_string()),
            user: Some(user.clone()),
        });
        debug!(email = %user.email, "Session persisted");
        Ok(())
    }

    /// Remove both entries from disk and memory. Attempts both removals even
    /// if the first fails, so the entries are never left half-cleared.
    pub fn logout(&self) -> Result<()> {
        let token_result = remove_entry(self.dir.join(TOKEN_ENTRY));
        let user_result = remove_entry(self.dir.join(USER_ENTRY));

        *self.state.lock() = Some(Session::default());
        debug!("Session cleared");

        token_result?;
        user_result
    }

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.load().token.map_or(false, |t| !t.is_empty())
    }

    pub fn token(&self) -> Option<String> {
        self.load().token.filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.load().user
    }

    fn read_disk(&self) -> Session {
        let token = std::fs::read_to_string(self.dir.join(TOKEN_ENTRY))
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let user = std::fs::read_to_string(self.dir.join(USER_ENTRY))
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok());

        Session { token, user }
    }
}

fn remove_entry(path: PathBuf) -> Result<()> {
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> SessionUser {
        SessionUser {
            id: "u-1".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    #[test]
    fn test_empty_store_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(!store.is_authenticated());
        assert_eq!(store.load(), Session::default());
    }

    #[test]
    fn test_login_then_logout() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.login("tok-123", &test_user()).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.user(), Some(test_user()));
        assert!(dir.path().join(TOKEN_ENTRY).exists());
        assert!(dir.path().join(USER_ENTRY).exists());

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert!(!dir.path().join(TOKEN_ENTRY).exists());
        assert!(!dir.path().join(USER_ENTRY).exists());
    }

    #[test]
    fn test_session_survives_new_store_over_same_dir() {
        let dir = tempfile::tempdir().unwrap();
        SessionStore::new(dir.path())
            .login("tok-456", &test_user())
            .unwrap();

        let reopened = SessionStore::new(dir.path());
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.token().as_deref(), Some("tok-456"));
        assert_eq!(reopened.user(), Some(test_user()));
    }

    #[test]
    fn test_logout_on_empty_store_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.logout().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_blank_token_file_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKEN_ENTRY), "  \n").unwrap();
        let store = SessionStore::new(dir.path());
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_corrupt_user_entry_keeps_token() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKEN_ENTRY), "tok-789").unwrap();
        std::fs::write(dir.path().join(USER_ENTRY), "not json").unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.is_authenticated());
        assert_eq!(store.user(), None);
    }
}
