//! Optimistic local cache of vault items backed by the remote store.
//!
//! Every operation requires the session key: content is encrypted before it
//! leaves this module and decrypted on the way in. Mutations hit the remote
//! first and touch the cache only after the remote call succeeds, so the
//! cache is always at last-known-good state and a dropped future never
//! half-applies.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::crypto::{ContentCipher, SessionKey};
use crate::error::{Result, VaultError};
use crate::models::{CategoryFilter, ItemContent, ItemDraft, VaultItem};
use crate::remote::{NewVaultItemRow, RemoteStore, VaultItemRow};
use crate::session::SessionManager;

/// CRUD cache of vault items with decrypt-on-read and encrypt-on-write.
pub struct VaultItemStore {
    session: Arc<SessionManager>,
    remote: Arc<dyn RemoteStore>,
    cipher: ContentCipher,
    /// Sorted by `created_at` descending at all times.
    cache: RwLock<Vec<VaultItem>>,
}

impl VaultItemStore {
    pub fn new(session: Arc<SessionManager>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            session,
            remote,
            cipher: ContentCipher::new(),
            cache: RwLock::new(Vec::new()),
        }
    }

    /// The session key and owner id, or `Locked` if either is absent.
    fn unlock(&self) -> Result<(SessionKey, String)> {
        let key = self.session.current_key().ok_or(VaultError::Locked)?;
        let identity = self.session.identity().ok_or(VaultError::Locked)?;
        Ok((key, identity.id))
    }

    /// Fetch all items for the current owner, decrypting each one.
    ///
    /// A row whose content fails to decrypt keeps its metadata and carries
    /// [`ItemContent::Undecryptable`]; one bad row never aborts the listing.
    pub async fn refresh(&self) -> Result<()> {
        let (key, owner_id) = self.unlock()?;

        let rows = self.remote.select_vault_items(&owner_id).await?;
        let mut items: Vec<VaultItem> = rows
            .into_iter()
            .map(|row| self.decrypt_row(row, &key))
            .collect();
        sort_newest_first(&mut items);

        debug!(count = items.len(), "vault items refreshed");
        *self.write_cache() = items;
        Ok(())
    }

    /// Validate, encrypt, persist remotely, then prepend to the cache.
    ///
    /// The cached item carries the plaintext the user just typed rather
    /// than a re-decrypt of the stored ciphertext. On remote failure the
    /// cache is untouched.
    pub async fn create(&self, draft: ItemDraft) -> Result<VaultItem> {
        let (key, owner_id) = self.unlock()?;

        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(VaultError::Validation("title is required".into()));
        }
        if draft.content.trim().is_empty() {
            return Err(VaultError::Validation("content is required".into()));
        }

        let token = self.cipher.encrypt(&draft.content, &key)?;
        let row = self
            .remote
            .insert_vault_item(NewVaultItemRow {
                owner_id,
                title,
                category: draft.category,
                content: token,
                tags: draft.tags,
                due_date: draft.due_date,
            })
            .await?;

        let item = VaultItem {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            category: row.category,
            content: ItemContent::Plaintext(draft.content),
            tags: row.tags,
            due_date: row.due_date,
            is_completed: row.is_completed,
            created_at: row.created_at,
        };

        let mut cache = self.write_cache();
        cache.insert(0, item.clone());
        sort_newest_first(&mut cache);
        Ok(item)
    }

    /// Delete remotely, then drop from the cache only on remote success.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.unlock()?;

        self.remote.delete_vault_item(id).await?;
        self.write_cache().retain(|item| item.id != id);
        Ok(())
    }

    /// Flip the completion flag remotely (field-only update, content is
    /// neither touched nor re-encrypted), then mirror the flip locally.
    pub async fn toggle_completion(&self, id: &str, current: bool) -> Result<()> {
        self.unlock()?;

        self.remote.update_item_completion(id, !current).await?;

        let mut cache = self.write_cache();
        match cache.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.is_completed = !current;
                Ok(())
            }
            None => Err(VaultError::ItemNotFound(id.to_string())),
        }
    }

    /// Snapshot of the cache, newest first.
    pub fn items(&self) -> Vec<VaultItem> {
        self.read_cache().clone()
    }

    /// Pure filter over the cache: search text and category, never remote.
    pub fn filtered(&self, query: &str, category: CategoryFilter) -> Vec<VaultItem> {
        self.read_cache()
            .iter()
            .filter(|item| category.matches(item.category) && item.matches_query(query))
            .cloned()
            .collect()
    }

    fn decrypt_row(&self, row: VaultItemRow, key: &SessionKey) -> VaultItem {
        let content = match row.content.as_deref() {
            None => ItemContent::Empty,
            Some(token) => match self.cipher.decrypt(token, key) {
                Ok(plaintext) => ItemContent::Plaintext(plaintext),
                Err(err) => {
                    warn!(item = %row.id, %err, "item content did not decrypt");
                    ItemContent::Undecryptable
                }
            },
        };

        VaultItem {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            category: row.category,
            content,
            tags: row.tags,
            due_date: row.due_date,
            is_completed: row.is_completed,
            created_at: row.created_at,
        }
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Vec<VaultItem>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Vec<VaultItem>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sort by `created_at` descending, independent of fetch order.
fn sort_newest_first(items: &mut [VaultItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
