use chrono::{DateTime, Utc};

pub const DEFAULT_FOLDER_NAME: &str = "New Folder";
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Identity of the caller as established by the upstream auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// `None` means the note lives at the root.
    pub folder_id: Option<i64>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// A folder with its notes loaded eagerly, as the sidebar renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderWithNotes {
    pub folder: Folder,
    pub notes: Vec<Note>,
}
