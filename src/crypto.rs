//! Cryptographic operations for vault content using Argon2id and AES-256-GCM.
//!
//! The login secret is never used as a cipher key directly: [`derive_session_key`]
//! runs it through Argon2id with a per-user salt, and the resulting
//! [`SessionKey`] is what [`ContentCipher`] encrypts and decrypts with.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use argon2::{Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur during cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Invalid base64 encoding")]
    InvalidBase64,
    #[error("Key derivation failed")]
    KeyDerivationFailed,
}

/// Key length in bytes (256 bits, for AES-256).
const KEY_LEN: usize = 32;

/// Per-user salt length in bytes (128 bits).
const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes (96 bits, GCM standard).
const NONCE_LEN: usize = 12;

// Argon2id parameters, tuned for interactive sign-in (one derivation per
// session, not per item).
const ARGON2_TIME_COST: u32 = 2;
const ARGON2_MEMORY_COST: u32 = 65536; // 64 MB
const ARGON2_PARALLELISM: u32 = 1;

/// Domain-separation prefix for the per-user salt derivation.
const SALT_CONTEXT: &str = "pocketvault/user-salt:";

/// The in-memory symmetric key for an active session.
///
/// Automatically zeroed on drop. Created only by [`derive_session_key`];
/// held only by the session manager.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; KEY_LEN]);

impl SessionKey {
    /// Get a reference to the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.write_str("SessionKey(..)")
    }
}

/// Derive the deterministic per-user salt from an identity handle.
///
/// `SHA-256(context || lowercase handle)` truncated to 16 bytes. The same
/// user always gets the same salt, so key derivation needs no extra
/// server-side storage.
fn user_salt(handle: &str) -> [u8; SALT_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(SALT_CONTEXT.as_bytes());
    hasher.update(handle.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&digest[..SALT_LEN]);
    salt
}

/// Derive a session key from the login secret using Argon2id.
///
/// The same (handle, secret) pair always produces the same key, so content
/// encrypted in one session decrypts in the next. A changed secret yields a
/// different key and previously encrypted content becomes undecryptable.
pub fn derive_session_key(secret: &str, handle: &str) -> Result<SessionKey, CryptoError> {
    let params = Params::new(
        ARGON2_MEMORY_COST,
        ARGON2_TIME_COST,
        ARGON2_PARALLELISM,
        Some(KEY_LEN),
    )
    .map_err(|_| CryptoError::KeyDerivationFailed)?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let salt = user_salt(handle);
    let mut output = [0u8; KEY_LEN];
    argon2
        .hash_password_into(secret.as_bytes(), &salt, &mut output)
        .map_err(|_| CryptoError::KeyDerivationFailed)?;

    let key = SessionKey(output);
    output.zeroize();
    Ok(key)
}

/// Symmetric cipher for vault item content.
///
/// Stateless: every call takes the key explicitly. Output tokens are
/// self-contained (`base64(nonce || ciphertext)`) and safe to store as
/// opaque strings alongside item metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentCipher;

impl ContentCipher {
    pub fn new() -> Self {
        Self
    }

    /// Encrypt plaintext under the session key.
    ///
    /// Empty input returns `None` (the explicit empty-content marker); the
    /// cipher is never invoked on nothing.
    pub fn encrypt(
        &self,
        plaintext: &str,
        key: &SessionKey,
    ) -> Result<Option<String>, CryptoError> {
        if plaintext.is_empty() {
            return Ok(None);
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailed)?;

        // nonce || ciphertext (GCM appends the auth tag itself)
        let mut combined = Vec::with_capacity(nonce.len() + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);

        Ok(Some(STANDARD.encode(&combined)))
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails if the token was produced under a different key (GCM
    /// authentication), was tampered with, or does not decode to UTF-8.
    /// Failure is per-item recoverable; callers substitute a sentinel.
    pub fn decrypt(&self, token: &str, key: &SessionKey) -> Result<String, CryptoError> {
        let combined = STANDARD
            .decode(token)
            .map_err(|_| CryptoError::InvalidBase64)?;

        if combined.len() < NONCE_LEN {
            return Err(CryptoError::DecryptionFailed);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        let plaintext_bytes = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        String::from_utf8(plaintext_bytes).map_err(|_| CryptoError::DecryptionFailed)
    }
}
