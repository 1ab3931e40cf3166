//! Data models for the vault client core.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated identity, as issued by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque subject id assigned by the auth collaborator.
    pub id: String,
    /// Email-like handle the user signs in with.
    pub handle: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
        }
    }

    /// Display name derived from the handle, e.g. `alice@example.com` -> `Alice`.
    pub fn display_name(&self) -> String {
        let local = self.handle.split('@').next().unwrap_or("user");
        let mut chars = local.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => "User".to_string(),
        }
    }
}

/// Category of a vault item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Password,
    Exam,
    Work,
    Notes,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Password => "password",
            Category::Exam => "exam",
            Category::Work => "work",
            Category::Notes => "notes",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(Category::Password),
            "exam" => Ok(Category::Exam),
            "work" => Ok(Category::Work),
            "notes" => Ok(Category::Notes),
            "other" => Ok(Category::Other),
            _ => Err(format!("unknown category: {s}")),
        }
    }
}

/// Category filter for listing: everything, or one category exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

/// Per-item decrypt result for vault item content.
///
/// Decryption failures are tagged, not thrown: an item whose content cannot
/// be recovered keeps its metadata visible and carries the sentinel variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemContent {
    Plaintext(String),
    /// The item was stored with no content.
    Empty,
    /// Content exists remotely but did not decrypt under the current key.
    Undecryptable,
}

impl ItemContent {
    /// The recovered plaintext, if any.
    pub fn plaintext(&self) -> Option<&str> {
        match self {
            ItemContent::Plaintext(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_undecryptable(&self) -> bool {
        matches!(self, ItemContent::Undecryptable)
    }
}

/// A decrypted vault item as held in the local cache.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultItem {
    /// Server-assigned opaque id.
    pub id: String,
    /// Owning identity; immutable, enforced server-side.
    pub owner_id: String,
    pub title: String,
    pub category: Category,
    pub content: ItemContent,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    /// Meaningful only when `due_date` is set.
    pub is_completed: bool,
    /// Server-assigned creation timestamp; immutable.
    pub created_at: DateTime<Utc>,
}

impl VaultItem {
    /// Case-insensitive match against title, content plaintext, or any tag.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        if self.title.to_lowercase().contains(&needle) {
            return true;
        }
        if let Some(text) = self.content.plaintext() {
            if text.to_lowercase().contains(&needle) {
                return true;
            }
        }
        self.tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// User-submitted fields for a new vault item.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub title: String,
    pub category: Category,
    pub content: String,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

/// An unencrypted sticky note.
#[derive(Debug, Clone, PartialEq)]
pub struct StickyNote {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// Plaintext; sticky notes are never encrypted.
    pub content: String,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

/// User-submitted fields for a new sticky note.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

/// Parse a comma-separated tag string: split, trim, drop empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
