//! Session lifecycle: login, logout, token persistence, startup validation
//!
//! The token survives restarts in `<config_dir>/session.json`. On startup
//! [`SessionStore::bootstrap`] re-validates a persisted token against the
//! server and silently signs out when it no longer works; when no token is
//! on disk the server is not contacted at all.

use crate::client::ApiClient;
use crate::config;
use crate::error::CoreError;
use crate::event::{DataEvent, EventBus};
use crate::models::User;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

const SESSION_FILE: &str = "session.json";

/// Where the session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup validation has not settled yet
    Loading,
    SignedOut,
    SignedIn,
}

/// Persisted shape of the session file
#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

struct SessionInner {
    phase: SessionPhase,
    user: Option<User>,
}

/// Owns authentication state and the persisted token
pub struct SessionStore {
    client: Arc<ApiClient>,
    bus: EventBus,
    token_path: PathBuf,
    state: RwLock<SessionInner>,
}

impl SessionStore {
    pub fn new(client: Arc<ApiClient>, bus: EventBus) -> Result<Self, CoreError> {
        Ok(Self::with_config_dir(client, bus, config::config_dir()?))
    }

    /// Use an explicit config directory instead of the resolved default
    pub fn with_config_dir(
        client: Arc<ApiClient>,
        bus: EventBus,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            bus,
            token_path: dir.into().join(SESSION_FILE),
            state: RwLock::new(SessionInner {
                phase: SessionPhase::Loading,
                user: None,
            }),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().phase == SessionPhase::SignedIn
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// Name to show in the header, falling back past missing profile fields
    pub fn display_name(&self) -> String {
        self.state
            .read()
            .user
            .as_ref()
            .map(|u| u.display_name().to_string())
            .unwrap_or_else(|| "account".to_string())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Restore a persisted session, if any.
    ///
    /// Without a token on disk this settles to `SignedOut` without any
    /// network traffic. With one, the token is validated server-side; any
    /// failure discards it, matching a token that expired while the app was
    /// closed.
    pub async fn bootstrap(&self) -> SessionPhase {
        let token = match self.load_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("could not read session file: {e}");
                None
            }
        };

        let Some(token) = token else {
            return self.settle(SessionPhase::SignedOut, None);
        };

        self.client.set_token(Some(token));
        match self.client.validate().await {
            Ok(user) => self.settle(SessionPhase::SignedIn, Some(user)),
            Err(e) => {
                tracing::info!("persisted token rejected, signing out: {e}");
                self.client.set_token(None);
                if let Err(e) = self.remove_token_file() {
                    tracing::warn!("could not remove session file: {e}");
                }
                self.settle(SessionPhase::SignedOut, None)
            }
        }
    }

    /// Authenticate and persist the token.
    ///
    /// The in-memory session is signed in even if writing the session file
    /// fails; the error is still returned so the caller can surface it.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let response = self.client.login(email, password).await?;
        self.client.set_token(Some(response.token.clone()));
        let user = response.user;
        self.settle(SessionPhase::SignedIn, Some(user.clone()));
        self.save_token(&response.token)?;
        Ok(user)
    }

    /// Drop the session locally; no server call is involved
    pub fn logout(&self) -> Result<(), CoreError> {
        self.client.set_token(None);
        self.settle(SessionPhase::SignedOut, None);
        self.remove_token_file()
    }

    /// Force sign-out after the server rejected the stored token
    /// ([`DataEvent::SessionExpired`]). Same effect as [`Self::logout`] but
    /// never fails; a stuck session file is only logged.
    pub fn expire(&self) {
        self.client.set_token(None);
        self.settle(SessionPhase::SignedOut, None);
        if let Err(e) = self.remove_token_file() {
            tracing::warn!("could not remove session file: {e}");
        }
    }

    fn settle(&self, phase: SessionPhase, user: Option<User>) -> SessionPhase {
        {
            let mut state = self.state.write();
            state.phase = phase;
            state.user = user;
        }
        self.bus.publish(DataEvent::AuthChanged);
        phase
    }

    // ========================================================================
    // Token file
    // ========================================================================

    pub fn token_path(&self) -> &std::path::Path {
        &self.token_path
    }

    fn load_token(&self) -> Result<Option<String>, CoreError> {
        let content = match std::fs::read_to_string(&self.token_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CoreError::TokenRead {
                    path: self.token_path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<TokenFile>(&content) {
            Ok(file) if !file.token.is_empty() => Ok(Some(file.token)),
            // Unreadable or empty session files are treated as signed out
            _ => Ok(None),
        }
    }

    fn save_token(&self, token: &str) -> Result<(), CoreError> {
        if let Some(dir) = self.token_path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| CoreError::TokenWrite {
                path: self.token_path.clone(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(&TokenFile {
            token: token.to_string(),
        })
        .map_err(|e| CoreError::InvalidConfig {
            message: format!("could not serialize session file: {e}"),
        })?;
        std::fs::write(&self.token_path, content).map_err(|source| CoreError::TokenWrite {
            path: self.token_path.clone(),
            source,
        })
    }

    fn remove_token_file(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.token_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CoreError::TokenWrite {
                path: self.token_path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn store_in(dir: &std::path::Path) -> SessionStore {
        let client =
            Arc::new(ApiClient::new(ApiConfig::with_base_url("http://localhost:9/api")).unwrap());
        SessionStore::with_config_dir(client, EventBus::default(), dir)
    }

    #[test]
    fn test_token_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        assert_eq!(store.load_token().unwrap(), None);
        store.save_token("t1").unwrap();
        assert_eq!(store.load_token().unwrap(), Some("t1".to_string()));
        store.remove_token_file().unwrap();
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_corrupt_session_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(store.token_path(), "not json").unwrap();
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_empty_token_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::write(store.token_path(), r#"{ "token": "" }"#).unwrap();
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_remove_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.remove_token_file().is_ok());
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_stays_offline() {
        // Client points at a closed port: bootstrap must not touch it
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.bootstrap().await, SessionPhase::SignedOut);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_clears_state_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.save_token("t1").unwrap();
        store.client.set_token(Some("t1".to_string()));

        store.logout().unwrap();
        assert_eq!(store.phase(), SessionPhase::SignedOut);
        assert!(!store.client.has_token());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_expire_signs_out_even_without_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.client.set_token(Some("t1".to_string()));

        store.expire();
        assert_eq!(store.phase(), SessionPhase::SignedOut);
        assert!(!store.client.has_token());
    }
}
