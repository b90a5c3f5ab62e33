//! Mutation vocabulary shared by the server and the client-side views.

use std::future::Future;

use crate::error::NotebookError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateFolder,
    CreateNote { folder_id: Option<i64> },
    UpdateNoteTitle { id: i64, title: String },
    UpdateNoteContent { id: i64, content: String },
    /// `folder_id: None` moves the note to the root.
    MoveNote { id: i64, folder_id: Option<i64> },
    DeleteNote { id: i64 },
    DeleteFolder { id: i64 },
    RenameFolder { id: i64, name: String },
}

impl Mutation {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateFolder => "create-folder",
            Self::CreateNote { .. } => "create-note",
            Self::UpdateNoteTitle { .. } => "update-note-title",
            Self::UpdateNoteContent { .. } => "update-note-content",
            Self::MoveNote { .. } => "move-note",
            Self::DeleteNote { .. } => "delete-note",
            Self::DeleteFolder { .. } => "delete-folder",
            Self::RenameFolder { .. } => "rename-folder",
        }
    }

    /// Generic message shown when the store rejects this mutation.
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::CreateFolder => "Failed to create folder",
            Self::CreateNote { .. } => "Failed to create note",
            Self::UpdateNoteTitle { .. } | Self::UpdateNoteContent { .. } => {
                "Failed to update note"
            }
            Self::MoveNote { .. } => "Failed to move note",
            Self::DeleteNote { .. } => "Failed to delete note",
            Self::DeleteFolder { .. } => "Failed to delete folder",
            Self::RenameFolder { .. } => "Failed to rename folder",
        }
    }

    /// What kind of row the mutation addresses, for "not found" reporting.
    pub const fn target(&self) -> &'static str {
        match self {
            Self::CreateFolder | Self::DeleteFolder { .. } | Self::RenameFolder { .. } => "Folder",
            _ => "Note",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Done,
    /// A row was inserted; carries its id.
    Created(i64),
}

/// Anything that can carry a mutation to the store: the in-process service,
/// or the HTTP client.
pub trait MutationSink {
    fn apply(
        &self,
        mutation: Mutation,
    ) -> impl Future<Output = Result<Applied, NotebookError>> + Send;
}
