//! Error types for the vault client core.

use thiserror::Error;

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// No session key in memory; all vault reads and writes are unavailable.
    #[error("Vault is locked - sign in to unlock")]
    Locked,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("Remote store error: {0}")]
    Remote(#[from] crate::remote::RemoteError),

    #[error("Authentication error: {0}")]
    Auth(#[from] crate::auth::AuthError),
}

pub type Result<T> = std::result::Result<T, VaultError>;
