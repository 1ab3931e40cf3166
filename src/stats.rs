//! Dashboard counters, derived from the two caches.

use crate::models::{Category, StickyNote, VaultItem};
use crate::schedule::ScheduleView;

/// Aggregate counts shown on the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_items: usize,
    pub password_count: usize,
    pub note_count: usize,
    pub pending_schedule: usize,
}

impl DashboardStats {
    /// Pure function of the current cache snapshots.
    pub fn compute(items: &[VaultItem], notes: &[StickyNote]) -> Self {
        Self {
            total_items: items.len(),
            password_count: items
                .iter()
                .filter(|item| item.category == Category::Password)
                .count(),
            note_count: notes.len(),
            pending_schedule: ScheduleView::from_items(items).pending_count(),
        }
    }
}
