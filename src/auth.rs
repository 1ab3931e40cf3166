//! Interface to the external auth collaborator.
//!
//! Credential storage and verification live outside this crate. The core
//! consumes this capability trait and the [`AuthChange`] event stream; the
//! only things the confidentiality layer actually depends on are the raw
//! secret at sign-in/sign-up time and the sign-out/session-ended events.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::models::Identity;

/// Errors surfaced by the auth collaborator.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Handle already registered: {0}")]
    HandleTaken(String),

    #[error("No active session")]
    NotSignedIn,

    #[error("Auth service unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous auth state notifications.
///
/// `SignedIn` also fires when a persisted session is restored without the
/// user typing a secret; in that case the vault stays locked because no key
/// can be derived.
#[derive(Debug, Clone)]
pub enum AuthChange {
    SignedIn(Identity),
    SignedOut,
}

/// Capability interface to the auth collaborator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, handle: &str, secret: &str) -> Result<Identity, AuthError>;

    async fn sign_up(&self, handle: &str, secret: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Trigger email-based recovery for the given handle.
    async fn request_recovery(&self, handle: &str) -> Result<(), AuthError>;

    /// Set a new secret for the currently signed-in identity.
    async fn set_new_secret(&self, secret: &str) -> Result<(), AuthError>;

    async fn current_identity(&self) -> Option<Identity>;

    /// Subscribe to auth state changes.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
