//! pocketvault: the client-side confidentiality core of a personal vault.
//!
//! Item content is encrypted before it leaves the client with a key derived
//! from the login secret, held in memory only for the lifetime of the
//! session. Stores keep an optimistic local cache consistent with a remote
//! authoritative store; schedule and counter views are pure projections of
//! that cache. Auth and the remote store are consumed as trait seams.

pub mod auth;
pub mod crypto;
pub mod error;
pub mod models;
pub mod notes;
pub mod remote;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use auth::{AuthChange, AuthProvider};
pub use error::{Result, VaultError};
pub use models::{
    Category, CategoryFilter, Identity, ItemContent, ItemDraft, NoteDraft, StickyNote, VaultItem,
};
pub use notes::NoteStore;
pub use remote::RemoteStore;
pub use schedule::ScheduleView;
pub use session::{SessionManager, SessionStatus};
pub use stats::DashboardStats;
pub use store::VaultItemStore;
