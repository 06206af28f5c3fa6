//! Client-side authentication state.
//!
//! Holds the current session and keeps the API client's bearer token in
//! sync. Both collaborators are injected at construction so tests can point
//! them at a local server and a temp session file.

use crate::client::api::{ApiClient, ApiClientError};
use crate::client::session::{Session, SessionStore};
use crate::models::user::{Role, User};

/// Login state and session lifecycle.
pub struct AuthService {
    api: ApiClient,
    sessions: SessionStore,
    current: Option<Session>,
}

impl AuthService {
    pub fn new(api: ApiClient, sessions: SessionStore) -> Self {
        Self {
            api,
            sessions,
            current: None,
        }
    }

    /// Log in with a username or email. On success the session is persisted
    /// and the token attached to subsequent API calls.
    pub fn login(&mut self, username: &str, password: &str) -> Result<User, ApiClientError> {
        let response = self.api.login(username, password)?;

        let session = Session {
            token: response.token,
            user: response.user.clone(),
        };
        if let Err(e) = self.sessions.save(&session) {
            // A failed write only costs session restore on next launch.
            log::warn!("Failed to persist session: {:#}", e);
        }

        self.api.set_token(Some(session.token.clone()));
        self.current = Some(session);
        Ok(response.user)
    }

    /// Resume a persisted session, if one exists. The token may have expired
    /// since it was written; the first API call will surface that as a 403.
    pub fn restore_session(&mut self) -> bool {
        match self.sessions.load() {
            Some(session) => {
                self.api.set_token(Some(session.token.clone()));
                log::info!("Restored session for '{}'", session.user.username);
                self.current = Some(session);
                true
            }
            None => false,
        }
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            log::info!("User '{}' logged out", session.user.username);
        }
        self.api.set_token(None);
        self.sessions.clear();
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref().map(|session| &session.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_super_admin(&self) -> bool {
        self.current_user()
            .map(|user| user.role == Role::SuperAdmin)
            .unwrap_or(false)
    }

    /// A client carrying the current session's token.
    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_session(session: Option<Session>) -> AuthService {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        if let Some(ref session) = session {
            store.save(session).unwrap();
        }
        // Leak the tempdir so the path outlives the store in these tests.
        std::mem::forget(dir);
        AuthService::new(ApiClient::new("http://localhost:3001"), store)
    }

    fn sample_session(role: Role) -> Session {
        let mut user = User::new("alice", "alice@example.com", "Alice");
        user.id = Some(1);
        user.role = role;
        Session {
            token: "tok".to_string(),
            user,
        }
    }

    #[test]
    fn test_starts_unauthenticated() {
        let auth = service_with_session(None);
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
        assert!(!auth.is_super_admin());
    }

    #[test]
    fn test_restore_session_roundtrip() {
        let mut auth = service_with_session(Some(sample_session(Role::SuperAdmin)));
        assert!(auth.restore_session());
        assert!(auth.is_authenticated());
        assert!(auth.is_super_admin());
        assert!(auth.api().has_token());
    }

    #[test]
    fn test_restore_without_file() {
        let mut auth = service_with_session(None);
        assert!(!auth.restore_session());
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut auth = service_with_session(Some(sample_session(Role::User)));
        auth.restore_session();

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(!auth.api().has_token());
        // The persisted file is gone too.
        assert!(!auth.restore_session());
    }
}
