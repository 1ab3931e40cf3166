//! Session key lifecycle, tied to auth events.
//!
//! Exactly one [`SessionManager`] exists per client; it is the only place
//! that sets or clears the session key. Stores read the key through
//! [`SessionManager::current_key`] and must treat its absence as a locked
//! vault, never attempting a null-keyed operation.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::auth::{AuthChange, AuthProvider};
use crate::crypto::{derive_session_key, SessionKey};
use crate::error::Result;
use crate::models::Identity;

/// Authentication status of the client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    /// A sign-in or sign-up call is in flight.
    Authenticating,
    /// Identity and key both present; the vault is usable.
    Active,
    /// Identity known but no key in memory (e.g. a session restored from a
    /// persisted token without the user typing a secret).
    Locked,
}

#[derive(Default)]
struct SessionState {
    identity: Option<Identity>,
    key: Option<SessionKey>,
    status: SessionStatus,
}

/// Holds the in-memory session key for the active session.
///
/// The key is derived from the submitted login secret at sign-in/sign-up
/// time, cleared synchronously on sign-out or a session-ended notification,
/// and never persisted anywhere.
pub struct SessionManager {
    auth: Arc<dyn AuthProvider>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            auth,
            state: RwLock::new(SessionState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sign in and derive the session key from the submitted secret.
    pub async fn sign_in(&self, handle: &str, secret: &str) -> Result<Identity> {
        self.write().status = SessionStatus::Authenticating;

        match self.auth.sign_in(handle, secret).await {
            Ok(identity) => self.activate(identity, secret),
            Err(err) => {
                self.clear(SessionStatus::Unauthenticated);
                Err(err.into())
            }
        }
    }

    /// Register a new account and derive the session key from the secret.
    pub async fn sign_up(&self, handle: &str, secret: &str) -> Result<Identity> {
        self.write().status = SessionStatus::Authenticating;

        match self.auth.sign_up(handle, secret).await {
            Ok(identity) => self.activate(identity, secret),
            Err(err) => {
                self.clear(SessionStatus::Unauthenticated);
                Err(err.into())
            }
        }
    }

    /// Sign out.
    ///
    /// The key is cleared before the provider call, so no dependent can
    /// observe a signed-out session that still holds a key.
    pub async fn sign_out(&self) -> Result<()> {
        self.clear(SessionStatus::Unauthenticated);
        self.auth.sign_out().await?;
        Ok(())
    }

    /// Trigger email-based recovery for a handle. No session state changes.
    pub async fn request_recovery(&self, handle: &str) -> Result<()> {
        self.auth.request_recovery(handle).await?;
        Ok(())
    }

    /// Set a new secret for the signed-in identity and re-derive the key.
    ///
    /// Items encrypted under the previous secret will no longer decrypt and
    /// surface as undecryptable; they are not re-encrypted.
    pub async fn set_new_secret(&self, secret: &str) -> Result<()> {
        self.auth.set_new_secret(secret).await?;

        let identity = self.identity();
        if let Some(identity) = identity {
            let key = derive_session_key(secret, &identity.handle)?;
            let mut state = self.write();
            state.key = Some(key);
            state.status = SessionStatus::Active;
            warn!(
                handle = %identity.handle,
                "session secret changed; previously encrypted items will not decrypt"
            );
        }
        Ok(())
    }

    /// Apply an asynchronous auth state change from the provider.
    ///
    /// A restored session arrives without a secret, so the vault stays
    /// locked until the user signs in interactively again.
    pub fn apply_auth_change(&self, change: &AuthChange) {
        match change {
            AuthChange::SignedIn(identity) => {
                let mut state = self.write();
                let same_session = state
                    .identity
                    .as_ref()
                    .is_some_and(|current| current.id == identity.id)
                    && state.key.is_some();
                if same_session {
                    return;
                }
                debug!(handle = %identity.handle, "session restored without secret; vault locked");
                state.identity = Some(identity.clone());
                state.key = None;
                state.status = SessionStatus::Locked;
            }
            AuthChange::SignedOut => {
                self.clear(SessionStatus::Unauthenticated);
            }
        }
    }

    /// Forward auth changes from the provider's broadcast stream until it
    /// closes. Intended to be spawned alongside the UI event loop.
    pub async fn run_auth_listener(self: Arc<Self>, mut rx: broadcast::Receiver<AuthChange>) {
        loop {
            match rx.recv().await {
                Ok(change) => self.apply_auth_change(&change),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Missed events are safe to skip: the latest state wins,
                    // and a missed SignedOut still lands on the next recv.
                    warn!(missed, "auth listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Subscribe to the provider's auth change stream.
    pub fn auth_changes(&self) -> broadcast::Receiver<AuthChange> {
        self.auth.subscribe()
    }

    /// The session key, if a session is active. Absence means locked.
    pub fn current_key(&self) -> Option<SessionKey> {
        self.read().key.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.read().status
    }

    fn activate(&self, identity: Identity, secret: &str) -> Result<Identity> {
        let key = derive_session_key(secret, &identity.handle)?;
        let mut state = self.write();
        state.identity = Some(identity.clone());
        state.key = Some(key);
        state.status = SessionStatus::Active;
        debug!(handle = %identity.handle, "session active");
        Ok(identity)
    }

    fn clear(&self, status: SessionStatus) {
        let mut state = self.write();
        state.key = None;
        state.identity = None;
        state.status = status;
    }
}
