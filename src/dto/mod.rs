use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{FolderWithNotes, Note};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note body as markdown
    pub content: String,
    /// Parent folder ID, absent for root notes
    pub folder_id: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            folder_id: note.folder_id,
            created_at: note.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FolderResponse {
    /// Folder ID
    pub id: i64,
    /// Folder name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Notes contained in the folder
    pub notes: Vec<NoteResponse>,
}

impl From<FolderWithNotes> for FolderResponse {
    fn from(entry: FolderWithNotes) -> Self {
        Self {
            id: entry.folder.id,
            name: entry.folder.name,
            created_at: entry.folder.created_at,
            notes: entry.notes.into_iter().map(NoteResponse::from).collect(),
        }
    }
}

/// Everything the sidebar needs to render, fetched in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TreeResponse {
    /// Revision of the store this snapshot was taken at
    pub revision: u64,
    pub folders: Vec<FolderResponse>,
    pub root_notes: Vec<NoteResponse>,
}

impl TreeResponse {
    /// Every note in the tree, root notes first.
    pub fn all_notes(&self) -> impl Iterator<Item = &NoteResponse> {
        self.root_notes
            .iter()
            .chain(self.folders.iter().flat_map(|folder| folder.notes.iter()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RevisionResponse {
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct RevisionQuery {
    /// Last revision the caller has seen
    pub since: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Folder to create the note in, absent for root
    pub folder_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTitleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateContentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoveNoteRequest {
    /// Target folder, `null` moves the note to the root
    pub folder_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenameFolderRequest {
    pub name: String,
}

/// Body returned by every mutation endpoint: `{}` on success,
/// `{"id": n}` after a create, `{"error": "..."}` on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationResponse {
    pub const fn ok() -> Self {
        Self {
            id: None,
            error: None,
        }
    }

    pub const fn created(id: i64) -> Self {
        Self {
            id: Some(id),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            id: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub folders: Vec<FolderSummary>,
    pub notes: Vec<NoteSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FolderSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteSummary {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}
