//! Shared in-memory fakes for the remote store and auth collaborator.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::broadcast;

use pocketvault::auth::{AuthError, AuthProvider};
use pocketvault::remote::{
    NewStickyNoteRow, NewVaultItemRow, RemoteError, RemoteStore, StickyNoteRow, VaultItemRow,
};
use pocketvault::{AuthChange, Identity, SessionManager};

/// In-memory remote store with call counting and a failure switch.
///
/// Rows get sequential ids and strictly increasing `created_at` timestamps
/// so newest-first ordering is deterministic in tests.
#[derive(Default)]
pub struct MemoryRemote {
    items: Mutex<Vec<VaultItemRow>>,
    notes: Mutex<Vec<StickyNoteRow>>,
    seq: AtomicUsize,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total remote calls made, across both collections.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with `RemoteError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Raw stored rows, for asserting on persisted ciphertext.
    pub fn raw_items(&self) -> Vec<VaultItemRow> {
        self.items.lock().unwrap().clone()
    }

    /// Overwrite the stored rows, bypassing the trait (row tampering).
    pub fn replace_items(&self, rows: Vec<VaultItemRow>) {
        *self.items.lock().unwrap() = rows;
    }

    fn gate(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("injected failure".into()))
        } else {
            Ok(())
        }
    }

    fn next_seq(&self) -> usize {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn select_vault_items(&self, owner_id: &str) -> Result<Vec<VaultItemRow>, RemoteError> {
        self.gate()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_vault_item(&self, row: NewVaultItemRow) -> Result<VaultItemRow, RemoteError> {
        self.gate()?;
        let seq = self.next_seq();
        let created = VaultItemRow {
            id: format!("item-{seq}"),
            owner_id: row.owner_id,
            title: row.title,
            category: row.category,
            content: row.content,
            tags: row.tags,
            due_date: row.due_date,
            is_completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(seq as i64),
        };
        self.items.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_item_completion(
        &self,
        id: &str,
        is_completed: bool,
    ) -> Result<(), RemoteError> {
        self.gate()?;
        let mut items = self.items.lock().unwrap();
        let row = items
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        row.is_completed = is_completed;
        Ok(())
    }

    async fn delete_vault_item(&self, id: &str) -> Result<(), RemoteError> {
        self.gate()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|row| row.id != id);
        if items.len() == before {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn select_sticky_notes(&self, owner_id: &str) -> Result<Vec<StickyNoteRow>, RemoteError> {
        self.gate()?;
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_sticky_note(
        &self,
        row: NewStickyNoteRow,
    ) -> Result<StickyNoteRow, RemoteError> {
        self.gate()?;
        let seq = self.next_seq();
        let created = StickyNoteRow {
            id: format!("note-{seq}"),
            owner_id: row.owner_id,
            title: row.title,
            content: row.content,
            is_pinned: row.is_pinned,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(seq as i64),
        };
        self.notes.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_note_pin(&self, id: &str, is_pinned: bool) -> Result<(), RemoteError> {
        self.gate()?;
        let mut notes = self.notes.lock().unwrap();
        let row = notes
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        row.is_pinned = is_pinned;
        Ok(())
    }

    async fn delete_sticky_note(&self, id: &str) -> Result<(), RemoteError> {
        self.gate()?;
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|row| row.id != id);
        if notes.len() == before {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// In-memory auth collaborator: sign-up registers an account, sign-in
/// verifies it, state changes go out over a broadcast channel.
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, (String, String)>>,
    current: Mutex<Option<Identity>>,
    tx: broadcast::Sender<AuthChange>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
            tx,
        }
    }

    /// Pre-register an account, or change its secret if the handle exists.
    /// The subject id is stable across secret changes.
    pub fn register(&self, handle: &str, secret: &str) {
        let mut accounts = self.accounts.lock().unwrap();
        let id = accounts
            .get(handle)
            .map(|(id, _)| id.clone())
            .unwrap_or_else(|| format!("user-{}", accounts.len() + 1));
        accounts.insert(handle.to_string(), (id, secret.to_string()));
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, handle: &str, secret: &str) -> Result<Identity, AuthError> {
        let accounts = self.accounts.lock().unwrap();
        let (id, stored) = accounts
            .get(handle)
            .ok_or(AuthError::InvalidCredentials)?
            .clone();
        if stored != secret {
            return Err(AuthError::InvalidCredentials);
        }
        drop(accounts);

        let identity = Identity::new(id, handle);
        *self.current.lock().unwrap() = Some(identity.clone());
        let _ = self.tx.send(AuthChange::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, handle: &str, secret: &str) -> Result<Identity, AuthError> {
        if self.accounts.lock().unwrap().contains_key(handle) {
            return Err(AuthError::HandleTaken(handle.to_string()));
        }
        self.register(handle, secret);
        self.sign_in(handle, secret).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.current.lock().unwrap() = None;
        let _ = self.tx.send(AuthChange::SignedOut);
        Ok(())
    }

    async fn request_recovery(&self, handle: &str) -> Result<(), AuthError> {
        if self.accounts.lock().unwrap().contains_key(handle) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn set_new_secret(&self, secret: &str) -> Result<(), AuthError> {
        let current = self.current.lock().unwrap().clone();
        let identity = current.ok_or(AuthError::NotSignedIn)?;
        let mut accounts = self.accounts.lock().unwrap();
        let entry = accounts
            .get_mut(&identity.handle)
            .ok_or(AuthError::NotSignedIn)?;
        entry.1 = secret.to_string();
        Ok(())
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.current.lock().unwrap().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.tx.subscribe()
    }
}

/// A signed-in session over fresh fakes, ready for store tests.
pub async fn signed_in_session(
    handle: &str,
    secret: &str,
) -> (Arc<SessionManager>, Arc<MemoryRemote>) {
    let auth = Arc::new(MemoryAuth::new());
    auth.register(handle, secret);

    let session = Arc::new(SessionManager::new(auth));
    session.sign_in(handle, secret).await.unwrap();

    (session, Arc::new(MemoryRemote::new()))
}
