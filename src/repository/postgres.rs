use std::collections::HashMap;

use tokio_postgres::{Client, NoTls, Row};

use super::{RepositoryError, embedded::migrations};
use crate::models::{Folder, FolderWithNotes, Note, UserId};

const NOTE_COLUMNS: &str = "id, title, content, folder_id, user_id, created_at";

pub struct PgRepository {
    client: Client,
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        folder_id: row.get("folder_id"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    }
}

fn folder_from_row(row: &Row) -> Folder {
    Folder {
        id: row.get("id"),
        name: row.get("name"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    }
}

impl PgRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), RepositoryError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    pub async fn create_folder(
        &self,
        user: &UserId,
        name: &str,
    ) -> Result<Folder, RepositoryError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO folders (name, user_id) VALUES ($1, $2) \
                 RETURNING id, name, user_id, created_at",
                &[&name, &user.as_str()],
            )
            .await?;

        Ok(folder_from_row(&row))
    }

    pub async fn create_note(
        &self,
        user: &UserId,
        folder_id: Option<i64>,
        title: &str,
    ) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "INSERT INTO notes (title, content, folder_id, user_id) \
                     SELECT $1, '', $2, $3 \
                     WHERE $2::BIGINT IS NULL \
                        OR EXISTS (SELECT 1 FROM folders WHERE id = $2 AND user_id = $3) \
                     RETURNING {NOTE_COLUMNS}"
                ),
                &[&title, &folder_id, &user.as_str()],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    pub async fn update_note_title(
        &self,
        user: &UserId,
        id: i64,
        title: &str,
    ) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "UPDATE notes SET title = $1 WHERE id = $2 AND user_id = $3",
                &[&title, &id, &user.as_str()],
            )
            .await?;

        Ok(rows == 1)
    }

    pub async fn update_note_content(
        &self,
        user: &UserId,
        id: i64,
        content: &str,
    ) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "UPDATE notes SET content = $1 WHERE id = $2 AND user_id = $3",
                &[&content, &id, &user.as_str()],
            )
            .await?;

        Ok(rows == 1)
    }

    pub async fn move_note(
        &self,
        user: &UserId,
        id: i64,
        folder_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "UPDATE notes SET folder_id = $1 \
                 WHERE id = $2 AND user_id = $3 \
                   AND ($1::BIGINT IS NULL \
                        OR EXISTS (SELECT 1 FROM folders WHERE id = $1 AND user_id = $3))",
                &[&folder_id, &id, &user.as_str()],
            )
            .await?;

        Ok(rows == 1)
    }

    pub async fn delete_note(&self, user: &UserId, id: i64) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "DELETE FROM notes WHERE id = $1 AND user_id = $2",
                &[&id, &user.as_str()],
            )
            .await?;

        Ok(rows == 1)
    }

    pub async fn delete_folder(&self, user: &UserId, id: i64) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "DELETE FROM folders WHERE id = $1 AND user_id = $2",
                &[&id, &user.as_str()],
            )
            .await?;

        Ok(rows == 1)
    }

    pub async fn rename_folder(
        &self,
        user: &UserId,
        id: i64,
        name: &str,
    ) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "UPDATE folders SET name = $1 WHERE id = $2 AND user_id = $3",
                &[&name, &id, &user.as_str()],
            )
            .await?;

        Ok(rows == 1)
    }

    pub async fn get_note(&self, user: &UserId, id: i64) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND user_id = $2"),
                &[&id, &user.as_str()],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    pub async fn folders_with_notes(
        &self,
        user: &UserId,
    ) -> Result<Vec<FolderWithNotes>, RepositoryError> {
        let folder_rows = self
            .client
            .query(
                "SELECT id, name, user_id, created_at FROM folders \
                 WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
                &[&user.as_str()],
            )
            .await?;

        let note_rows = self
            .client
            .query(
                &format!(
                    "SELECT {NOTE_COLUMNS} FROM notes \
                     WHERE user_id = $1 AND folder_id IS NOT NULL \
                     ORDER BY created_at ASC, id ASC"
                ),
                &[&user.as_str()],
            )
            .await?;

        let mut by_folder: HashMap<i64, Vec<Note>> = HashMap::new();
        for row in &note_rows {
            let note = note_from_row(row);
            if let Some(folder_id) = note.folder_id {
                by_folder.entry(folder_id).or_default().push(note);
            }
        }

        Ok(folder_rows
            .iter()
            .map(|row| {
                let folder = folder_from_row(row);
                let notes = by_folder.remove(&folder.id).unwrap_or_default();
                FolderWithNotes { folder, notes }
            })
            .collect())
    }

    pub async fn root_notes(&self, user: &UserId) -> Result<Vec<Note>, RepositoryError> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {NOTE_COLUMNS} FROM notes \
                     WHERE user_id = $1 AND folder_id IS NULL \
                     ORDER BY created_at ASC, id ASC"
                ),
                &[&user.as_str()],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }
}
