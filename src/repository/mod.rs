mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::models::{Folder, FolderWithNotes, Note, UserId};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("store unavailable: {0}")]
    Unavailable(&'static str),
}

/// Storage backend. Every read and write is scoped to the owning user; the
/// row-level id alone never grants access to another user's data.
pub enum Repository {
    Postgres(PgRepository),
    Memory(MemoryRepository),
}

impl Repository {
    pub async fn connect(database_dsn: &str) -> Result<Self, RepositoryError> {
        Ok(Self::Postgres(PgRepository::new(database_dsn).await?))
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryRepository::default())
    }

    pub async fn migrate(&mut self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.migrate().await,
            Self::Memory(_) => {
                tracing::info!("In-memory store selected, no migrations to run");
                Ok(())
            }
        }
    }

    pub async fn create_folder(
        &mut self,
        user: &UserId,
        name: &str,
    ) -> Result<Folder, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.create_folder(user, name).await,
            Self::Memory(repo) => repo.create_folder(user, name),
        }
    }

    /// Returns `None` when `folder_id` names a folder the user does not own.
    pub async fn create_note(
        &mut self,
        user: &UserId,
        folder_id: Option<i64>,
        title: &str,
    ) -> Result<Option<Note>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.create_note(user, folder_id, title).await,
            Self::Memory(repo) => repo.create_note(user, folder_id, title),
        }
    }

    pub async fn update_note_title(
        &mut self,
        user: &UserId,
        id: i64,
        title: &str,
    ) -> Result<bool, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.update_note_title(user, id, title).await,
            Self::Memory(repo) => repo.update_note_title(user, id, title),
        }
    }

    pub async fn update_note_content(
        &mut self,
        user: &UserId,
        id: i64,
        content: &str,
    ) -> Result<bool, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.update_note_content(user, id, content).await,
            Self::Memory(repo) => repo.update_note_content(user, id, content),
        }
    }

    /// Sets the note's parent folder; `None` moves it to the root.
    pub async fn move_note(
        &mut self,
        user: &UserId,
        id: i64,
        folder_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.move_note(user, id, folder_id).await,
            Self::Memory(repo) => repo.move_note(user, id, folder_id),
        }
    }

    pub async fn delete_note(&mut self, user: &UserId, id: i64) -> Result<bool, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.delete_note(user, id).await,
            Self::Memory(repo) => repo.delete_note(user, id),
        }
    }

    /// Notes inside the folder follow the store's `ON DELETE CASCADE` rule.
    pub async fn delete_folder(&mut self, user: &UserId, id: i64) -> Result<bool, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.delete_folder(user, id).await,
            Self::Memory(repo) => repo.delete_folder(user, id),
        }
    }

    pub async fn rename_folder(
        &mut self,
        user: &UserId,
        id: i64,
        name: &str,
    ) -> Result<bool, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.rename_folder(user, id, name).await,
            Self::Memory(repo) => repo.rename_folder(user, id, name),
        }
    }

    pub async fn get_note(
        &mut self,
        user: &UserId,
        id: i64,
    ) -> Result<Option<Note>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.get_note(user, id).await,
            Self::Memory(repo) => repo.get_note(user, id),
        }
    }

    /// Folders ordered by creation time, each with its notes.
    pub async fn folders_with_notes(
        &mut self,
        user: &UserId,
    ) -> Result<Vec<FolderWithNotes>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.folders_with_notes(user).await,
            Self::Memory(repo) => repo.folders_with_notes(user),
        }
    }

    /// Notes without a folder, ordered by creation time.
    pub async fn root_notes(&mut self, user: &UserId) -> Result<Vec<Note>, RepositoryError> {
        match self {
            Self::Postgres(repo) => repo.root_notes(user).await,
            Self::Memory(repo) => repo.root_notes(user),
        }
    }
}
