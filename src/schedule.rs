//! Schedule projection over the vault item cache.
//!
//! Purely derived, never persisted: items that carry a due date, ordered by
//! due date ascending with pending entries ahead of completed ones,
//! independent of whatever order the cache holds.

use crate::models::VaultItem;

/// Entries shown in the bounded preview window.
const PREVIEW_LEN: usize = 5;

/// Read-only projection of due-dated vault items.
#[derive(Debug, Clone, Default)]
pub struct ScheduleView {
    entries: Vec<VaultItem>,
}

impl ScheduleView {
    /// Build the projection from a cache snapshot.
    pub fn from_items(items: &[VaultItem]) -> Self {
        let mut entries: Vec<VaultItem> = items
            .iter()
            .filter(|item| item.due_date.is_some())
            .cloned()
            .collect();

        entries.sort_by(|a, b| {
            a.is_completed
                .cmp(&b.is_completed)
                .then(a.due_date.cmp(&b.due_date))
        });

        Self { entries }
    }

    /// A small fixed window for the dashboard card.
    pub fn preview(&self) -> &[VaultItem] {
        &self.entries[..self.entries.len().min(PREVIEW_LEN)]
    }

    /// The full schedule, pending before completed, due date ascending.
    pub fn all(&self) -> &[VaultItem] {
        &self.entries
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|item| !item.is_completed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
