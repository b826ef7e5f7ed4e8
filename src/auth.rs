//! Local credential check and a short-lived login session.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const BUNDLED_USERS: &str = include_str!("../assets/users.json");

/// How long a login stays valid. Sessions are not extended on activity.
pub const SESSION_TTL_SECS: i64 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Session expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: Vec<UserCredential>,
}

impl CredentialStore {
    pub fn new(users: Vec<UserCredential>) -> Self {
        Self { users }
    }

    pub fn bundled() -> Result<Self, anyhow::Error> {
        let users = serde_json::from_str(BUNDLED_USERS).context("bundled users.json is malformed")?;
        Ok(Self { users })
    }

    /// Reads `path` when it exists, otherwise falls back to the bundled list.
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        match path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
                let users: Vec<UserCredential> =
                    serde_json::from_str(&content).with_context(|| format!("parsing {}", p.display()))?;
                info!(path = %p.display(), count = users.len(), "loaded credentials");
                Ok(Self { users })
            }
            _ => Self::bundled(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users.iter().any(|u| u.username == username && u.password == password)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// Login state for the running app, optionally mirrored to a file so a
/// restart within the validity window stays logged in.
#[derive(Debug, Clone)]
pub struct Authenticator {
    store: CredentialStore,
    session: Option<AuthSession>,
    session_path: Option<PathBuf>,
}

impl Authenticator {
    pub fn new(store: CredentialStore, session_path: Option<PathBuf>) -> Self {
        let session = session_path.as_deref().and_then(read_session).filter(AuthSession::is_valid);
        if let Some(s) = &session {
            info!(user = %s.user, "restored login session");
        }
        Self { store, session, session_path }
    }

    pub fn default_session_path() -> Option<PathBuf> {
        crate::config::project_dirs().map(|p| p.data_dir().join("session.json"))
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<&AuthSession, AuthError> {
        self.login_at(username, password, Utc::now())
    }

    pub fn login_at(&mut self, username: &str, password: &str, now: DateTime<Utc>) -> Result<&AuthSession, AuthError> {
        if !self.store.verify(username.trim(), password) {
            warn!(user = %username.trim(), "rejected login");
            return Err(AuthError::InvalidCredentials);
        }
        let session = AuthSession {
            user: username.trim().to_string(),
            expires_at: now + Duration::seconds(SESSION_TTL_SECS),
        };
        self.write_session(&session);
        info!(user = %session.user, "logged in");
        Ok(self.session.insert(session))
    }

    /// Drops the session, both in memory and on disk.
    pub fn logout(&mut self) {
        if let Some(s) = self.session.take() {
            info!(user = %s.user, "logged out");
        }
        if let Some(path) = &self.session_path {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!(error = %e, "could not remove session file");
                }
            }
        }
    }

    /// The active session, if it has not expired by `now`. An expired
    /// session is purged.
    pub fn check_at(&mut self, now: DateTime<Utc>) -> Result<&AuthSession, AuthError> {
        match self.session.as_ref().map(|s| s.is_valid_at(now)) {
            Some(true) => self.session.as_ref().ok_or(AuthError::Expired),
            Some(false) => {
                self.logout();
                Err(AuthError::Expired)
            }
            None => Err(AuthError::Expired),
        }
    }

    pub fn check(&mut self) -> Result<&AuthSession, AuthError> {
        self.check_at(Utc::now())
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    fn write_session(&self, session: &AuthSession) {
        let Some(path) = &self.session_path else { return };
        let result = (|| -> Result<(), anyhow::Error> {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(path, serde_json::to_string(session)?)?;
            Ok(())
        })();
        if let Err(e) = result {
            warn!(error = %e, "could not persist session");
        }
    }
}

fn read_session(path: &Path) -> Option<AuthSession> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::new(vec![UserCredential { username: "demo".into(), password: "demo123".into() }])
    }

    #[test]
    fn test_bundled_users_parse() {
        assert!(!CredentialStore::bundled().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let mut auth = Authenticator::new(store(), None);
        let err = auth.login("demo", "nope").unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password");
        assert!(auth.session().is_none());
    }

    #[test]
    fn test_session_expires_after_five_minutes() {
        let mut auth = Authenticator::new(store(), None);
        let start = Utc::now();
        auth.login_at("demo", "demo123", start).unwrap();

        assert!(auth.check_at(start + Duration::seconds(299)).is_ok());
        assert_eq!(auth.check_at(start + Duration::seconds(300)), Err(AuthError::Expired));
        // Purged on expiry
        assert!(auth.session().is_none());
    }

    #[test]
    fn test_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut auth = Authenticator::new(store(), Some(path.clone()));
        auth.login("demo", "demo123").unwrap();

        let restored = Authenticator::new(store(), Some(path.clone()));
        assert_eq!(restored.session().map(|s| s.user.as_str()), Some("demo"));

        let mut auth = restored;
        auth.logout();
        assert!(!path.exists());
    }
}
