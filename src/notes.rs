//! Sticky note cache: like the vault item store, minus the encryption.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{Result, VaultError};
use crate::models::{NoteDraft, StickyNote};
use crate::remote::{NewStickyNoteRow, RemoteStore, StickyNoteRow};
use crate::session::SessionManager;

/// CRUD cache of unencrypted sticky notes.
///
/// Notes require a signed-in identity but no session key; they are stored
/// in the clear. Ordering is pinned-first then newest-first, recomputed
/// client-side after every mutation since a pin toggle invalidates whatever
/// order the remote last returned.
pub struct NoteStore {
    session: Arc<SessionManager>,
    remote: Arc<dyn RemoteStore>,
    cache: RwLock<Vec<StickyNote>>,
}

impl NoteStore {
    pub fn new(session: Arc<SessionManager>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            session,
            remote,
            cache: RwLock::new(Vec::new()),
        }
    }

    fn owner(&self) -> Result<String> {
        let identity = self.session.identity().ok_or(VaultError::Locked)?;
        Ok(identity.id)
    }

    /// Fetch all notes for the current owner.
    pub async fn refresh(&self) -> Result<()> {
        let owner_id = self.owner()?;

        let rows = self.remote.select_sticky_notes(&owner_id).await?;
        let mut notes: Vec<StickyNote> = rows.into_iter().map(note_from_row).collect();
        sort_pinned_first(&mut notes);

        debug!(count = notes.len(), "sticky notes refreshed");
        *self.write_cache() = notes;
        Ok(())
    }

    /// Persist a new note remotely, then add it to the cache.
    pub async fn create(&self, draft: NoteDraft) -> Result<StickyNote> {
        let owner_id = self.owner()?;

        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(VaultError::Validation("title is required".into()));
        }

        let row = self
            .remote
            .insert_sticky_note(NewStickyNoteRow {
                owner_id,
                title,
                content: draft.content,
                is_pinned: false,
            })
            .await?;

        let note = note_from_row(row);
        let mut cache = self.write_cache();
        cache.insert(0, note.clone());
        sort_pinned_first(&mut cache);
        Ok(note)
    }

    /// Delete remotely, then drop from the cache only on remote success.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.owner()?;

        self.remote.delete_sticky_note(id).await?;
        self.write_cache().retain(|note| note.id != id);
        Ok(())
    }

    /// Flip the pin flag remotely, mirror it locally, and re-sort.
    pub async fn toggle_pin(&self, id: &str, current: bool) -> Result<()> {
        self.owner()?;

        self.remote.update_note_pin(id, !current).await?;

        let mut cache = self.write_cache();
        let Some(note) = cache.iter_mut().find(|note| note.id == id) else {
            return Err(VaultError::ItemNotFound(id.to_string()));
        };
        note.is_pinned = !current;
        sort_pinned_first(&mut cache);
        Ok(())
    }

    /// Snapshot of the cache: pinned first, then newest first.
    pub fn notes(&self) -> Vec<StickyNote> {
        self.read_cache().clone()
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Vec<StickyNote>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Vec<StickyNote>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn note_from_row(row: StickyNoteRow) -> StickyNote {
    StickyNote {
        id: row.id,
        owner_id: row.owner_id,
        title: row.title,
        content: row.content,
        is_pinned: row.is_pinned,
        created_at: row.created_at,
    }
}

/// Pinned notes first, then `created_at` descending within each group.
fn sort_pinned_first(notes: &mut [StickyNote]) {
    notes.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then(b.created_at.cmp(&a.created_at))
    });
}
