//! Session lifecycle and authorization.
//!
//! The session is an explicitly owned object injected into whatever
//! consumes it: ANONYMOUS until a sign-in path produces a token+user pair,
//! AUTHENTICATED until logout, locally detected expiry, or a backend
//! rejection. Credentials persist as an atomic pair, and validity is a
//! synchronous, side-effect-free read of the in-memory snapshot.

pub mod access;
pub mod token;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::User;
use crate::providers::backend::{
    AuthPayload, BackendClient, BackendError, GoogleMode, LoginRequest, RegisterRequest,
};
use crate::storage::{CredentialStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An authenticated session: the bearer token plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub struct SessionManager {
    store: CredentialStore,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(store: CredentialStore) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Restore a persisted session. A locally expired pair is discarded;
    /// otherwise the stored user is adopted and the session confirmed with
    /// the backend, which is authoritative: a 401/403 on verification logs
    /// the session out, while an unreachable backend keeps the locally
    /// valid session. Returns whether a session is active afterwards.
    pub async fn restore(&self, client: &BackendClient) -> Result<bool, StoreError> {
        let Some(stored) = self.store.load().await? else {
            return Ok(false);
        };

        if token::is_expired(&stored.token, token::now_ms()) {
            warn!("Stored token is expired, discarding the session");
            self.logout().await?;
            return Ok(false);
        }

        self.set_current(Some(Session {
            token: stored.token.clone(),
            user: stored.user,
        }));

        match client.verify_session(&stored.token).await {
            Ok(refreshed) => {
                if let Some(user) = refreshed {
                    self.store.save(&stored.token, &user).await?;
                    self.set_current(Some(Session {
                        token: stored.token,
                        user,
                    }));
                }
                Ok(true)
            }
            Err(err) if err.is_auth_rejection() => {
                warn!(error = %err, "Backend rejected the stored session, logging out");
                self.logout().await?;
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "Session verification unavailable, keeping the local session");
                Ok(true)
            }
        }
    }

    pub async fn login(
        &self,
        client: &BackendClient,
        request: &LoginRequest,
    ) -> Result<User, SessionError> {
        let payload = client.login(request).await?;
        self.establish(payload).await
    }

    pub async fn register(
        &self,
        client: &BackendClient,
        request: &RegisterRequest,
    ) -> Result<User, SessionError> {
        let payload = client.register(request).await?;
        self.establish(payload).await
    }

    pub async fn google_sign_in(
        &self,
        client: &BackendClient,
        credential: &str,
        mode: GoogleMode,
    ) -> Result<User, SessionError> {
        let payload = client.google_sign_in(credential, mode).await?;
        self.establish(payload).await
    }

    /// Adopt a token+user pair: persist first (both or neither), then
    /// expose it in memory.
    pub(crate) async fn establish(&self, payload: AuthPayload) -> Result<User, SessionError> {
        self.store.save(&payload.token, &payload.user).await?;
        self.set_current(Some(Session {
            token: payload.token,
            user: payload.user.clone(),
        }));
        info!(email = %payload.user.email, "Session established");
        Ok(payload.user)
    }

    /// Drop the session. Idempotent: logging out twice is safe.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        self.set_current(None);
        Ok(())
    }

    /// Interceptor rule: a backend authorization rejection on any in-flight
    /// request forces ANONYMOUS. Other errors leave the session alone.
    pub async fn handle_backend_error(&self, err: &BackendError) {
        if err.is_auth_rejection() {
            warn!(error = %err, "Backend rejected the session credentials, logging out");
            if let Err(store_err) = self.logout().await {
                warn!(error = %store_err, "Failed to clear stored credentials");
            }
        }
    }

    /// Current user record, if any.
    pub fn current_user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    /// Raw stored token, if any.
    pub fn stored_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// Token to attach to an outgoing request: only when present and not
    /// locally expired.
    pub fn auth_token(&self) -> Option<String> {
        let guard = self.read();
        let session = guard.as_ref()?;
        if token::is_expired(&session.token, token::now_ms()) {
            return None;
        }
        Some(session.token.clone())
    }

    /// Whether the session is locally usable: a token is present and not
    /// known to be expired. Read-only — querying validity never mutates
    /// state or storage, so it is safe to call from render paths.
    pub fn is_session_valid(&self) -> bool {
        match self.read().as_ref() {
            Some(session) => !token::is_expired(&session.token, token::now_ms()),
            None => false,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_session_valid()
    }

    pub fn has_access_to_view(&self, view: &str) -> bool {
        access::has_access_to_view(self.current_user().as_ref(), view)
    }

    pub fn allowed_views(&self) -> Vec<String> {
        access::allowed_views(self.current_user().as_ref())
    }

    pub fn is_admin(&self) -> bool {
        access::is_admin(self.current_user().as_ref())
    }

    pub fn role_name(&self) -> Option<String> {
        access::role_name(self.current_user().as_ref())
    }

    fn set_current(&self, session: Option<Session>) {
        *self.write() = session;
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}
