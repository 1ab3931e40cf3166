//! Interface to the remote authoritative store.
//!
//! The remote store holds ciphertext rows plus metadata and is the single
//! source of truth. Every call is implicitly scoped to the authenticated
//! identity; the server rejects cross-owner access at its data layer, so
//! client-side filtering is a UX concern only.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Category;

/// Errors surfaced by the remote store.
///
/// A remote failure aborts the specific mutation; the local cache stays at
/// its last-known-good state and nothing is retried automatically.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Row not found: {0}")]
    NotFound(String),

    #[error("Access denied")]
    Denied,

    #[error("Remote store unavailable: {0}")]
    Unavailable(String),
}

/// A vault item row as stored remotely: ciphertext plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultItemRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub category: Category,
    /// Self-contained encrypted token, or `None` for empty content.
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields the client supplies when inserting a vault item; the server
/// assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVaultItemRow {
    pub owner_id: String,
    pub title: String,
    pub category: Category,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

/// A sticky note row; content is stored in the clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyNoteRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields the client supplies when inserting a sticky note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStickyNoteRow {
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
}

/// Remote CRUD over the two collections backing the vault.
///
/// Implementations wrap whatever structured store the product uses; tests
/// use an in-memory fake. `select_*` calls return rows for the given owner
/// only; the server is expected to enforce this independently.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn select_vault_items(&self, owner_id: &str) -> Result<Vec<VaultItemRow>, RemoteError>;

    /// Insert a row; the server assigns `id` and `created_at` and returns
    /// the created row.
    async fn insert_vault_item(&self, row: NewVaultItemRow) -> Result<VaultItemRow, RemoteError>;

    /// Field-only update of the completion flag; content is untouched.
    async fn update_item_completion(
        &self,
        id: &str,
        is_completed: bool,
    ) -> Result<(), RemoteError>;

    async fn delete_vault_item(&self, id: &str) -> Result<(), RemoteError>;

    async fn select_sticky_notes(&self, owner_id: &str) -> Result<Vec<StickyNoteRow>, RemoteError>;

    async fn insert_sticky_note(&self, row: NewStickyNoteRow)
        -> Result<StickyNoteRow, RemoteError>;

    /// Field-only update of the pin flag.
    async fn update_note_pin(&self, id: &str, is_pinned: bool) -> Result<(), RemoteError>;

    async fn delete_sticky_note(&self, id: &str) -> Result<(), RemoteError>;
}
