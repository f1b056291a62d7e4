//! Session gate.
//!
//! The authenticated state is an explicit [`AuthState`] carried by a
//! [`Session`] that is handed to every view activation. It can be mirrored
//! to disk through a [`SessionStore`] so separate CLI invocations share it.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Key of the persisted flag.
pub const SESSION_KEY: &str = "isAuthenticated";

/// File name of the persisted session inside the state directory.
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated {
        username: String,
    },
}

/// What the user typed on the login screen.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// There is no server-side check: any non-blank pair is accepted.
    pub fn is_acceptable(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.trim().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    #[serde(rename = "isAuthenticated")]
    is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// JSON file holding the session flag.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as [`AuthState::Anonymous`].
    pub fn read(&self) -> Result<AuthState, SessionError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AuthState::Anonymous),
            Err(e) => return Err(e.into()),
        };
        let persisted: PersistedSession = serde_json::from_str(&text)?;
        Ok(if persisted.is_authenticated {
            AuthState::Authenticated {
                username: persisted.username.unwrap_or_default(),
            }
        } else {
            AuthState::Anonymous
        })
    }

    /// Anonymous removes the file, mirroring removal of the flag.
    pub fn write(&self, state: &AuthState) -> Result<(), SessionError> {
        match state {
            AuthState::Anonymous => match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
            AuthState::Authenticated { username } => {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let persisted = PersistedSession {
                    is_authenticated: true,
                    username: Some(username.clone()),
                };
                std::fs::write(&self.path, serde_json::to_string_pretty(&persisted)?)?;
                Ok(())
            }
        }
    }
}

/// The session context passed to view activations.
#[derive(Debug, Default)]
pub struct Session {
    state: AuthState,
    store: Option<SessionStore>,
}

impl Session {
    /// An in-memory session that starts anonymous.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn load(store: SessionStore) -> Result<Self, SessionError> {
        let state = store.read()?;
        debug!(path = %store.path().display(), ?state, "loaded session");
        Ok(Self {
            state,
            store: Some(store),
        })
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    /// Returns whether the credentials were accepted. A rejected attempt
    /// leaves the current state untouched.
    pub fn login(&mut self, credentials: &Credentials) -> Result<bool, SessionError> {
        if !credentials.is_acceptable() {
            debug!("login rejected: blank credentials");
            return Ok(false);
        }
        let state = AuthState::Authenticated {
            username: credentials.username.trim().to_string(),
        };
        if let Some(store) = &self.store {
            store.write(&state)?;
        }
        debug!(username = %credentials.username.trim(), "logged in");
        self.state = state;
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(store) = &self.store {
            store.write(&AuthState::Anonymous)?;
        }
        debug!("logged out");
        self.state = AuthState::Anonymous;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_accepts_any_non_blank_pair() {
        let mut session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.login(&Credentials::new("ada", "pw")).unwrap());
        assert_eq!(
            session.state(),
            &AuthState::Authenticated {
                username: "ada".into()
            }
        );
    }

    #[test]
    fn login_rejects_blank_fields() {
        let mut session = Session::anonymous();
        assert!(!session.login(&Credentials::new("", "pw")).unwrap());
        assert!(!session.login(&Credentials::new("ada", "   ")).unwrap());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_state() {
        let mut session = Session::anonymous();
        session.login(&Credentials::new("ada", "pw")).unwrap();
        session.logout().unwrap();
        assert_eq!(session.state(), &AuthState::Anonymous);
    }

    #[test]
    fn persisted_flag_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());

        let mut session = Session::load(store.clone()).unwrap();
        assert!(!session.is_authenticated());
        session.login(&Credentials::new("ada", "pw")).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json[SESSION_KEY], true);

        let reloaded = Session::load(store.clone()).unwrap();
        assert!(reloaded.is_authenticated());

        session.logout().unwrap();
        assert!(!store.path().exists());
        assert!(!Session::load(store).unwrap().is_authenticated());
    }

    #[test]
    fn flag_false_reads_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        std::fs::write(store.path(), r#"{"isAuthenticated": false}"#).unwrap();
        assert_eq!(store.read().unwrap(), AuthState::Anonymous);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.read(), Err(SessionError::Json(_))));
    }

    #[test]
    fn logout_without_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::load(SessionStore::in_dir(&dir.path().join("nested"))).unwrap();
        session.logout().unwrap();
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let debug = format!("{:?}", Credentials::new("ada", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
