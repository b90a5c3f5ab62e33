use chrono::Utc;

use super::RepositoryError;
use crate::models::{Folder, FolderWithNotes, Note, UserId};

/// Process-local store used for development and tests. Mirrors the schema's
/// rules: ids are assigned sequentially, notes follow their folder on delete.
#[derive(Default)]
pub struct MemoryRepository {
    folders: Vec<Folder>,
    notes: Vec<Note>,
    last_folder_id: i64,
    last_note_id: i64,
    offline: bool,
}

impl MemoryRepository {
    /// Simulates a lost connection: every call fails until switched back.
    pub const fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline {
            return Err(RepositoryError::Unavailable("in-memory store is offline"));
        }
        Ok(())
    }

    fn owns_folder(&self, user: &UserId, folder_id: i64) -> bool {
        self.folders
            .iter()
            .any(|f| f.id == folder_id && f.user_id == user.as_str())
    }

    fn note_mut(&mut self, user: &UserId, id: i64) -> Option<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user.as_str())
    }

    fn folder_mut(&mut self, user: &UserId, id: i64) -> Option<&mut Folder> {
        self.folders
            .iter_mut()
            .find(|f| f.id == id && f.user_id == user.as_str())
    }

    pub fn create_folder(&mut self, user: &UserId, name: &str) -> Result<Folder, RepositoryError> {
        self.check_online()?;

        self.last_folder_id += 1;
        let folder = Folder {
            id: self.last_folder_id,
            name: name.to_owned(),
            user_id: user.0.clone(),
            created_at: Utc::now(),
        };
        self.folders.push(folder.clone());

        Ok(folder)
    }

    pub fn create_note(
        &mut self,
        user: &UserId,
        folder_id: Option<i64>,
        title: &str,
    ) -> Result<Option<Note>, RepositoryError> {
        self.check_online()?;

        if let Some(folder_id) = folder_id
            && !self.owns_folder(user, folder_id)
        {
            return Ok(None);
        }

        self.last_note_id += 1;
        let note = Note {
            id: self.last_note_id,
            title: title.to_owned(),
            content: String::new(),
            folder_id,
            user_id: user.0.clone(),
            created_at: Utc::now(),
        };
        self.notes.push(note.clone());

        Ok(Some(note))
    }

    pub fn update_note_title(
        &mut self,
        user: &UserId,
        id: i64,
        title: &str,
    ) -> Result<bool, RepositoryError> {
        self.check_online()?;

        Ok(self
            .note_mut(user, id)
            .map(|note| note.title = title.to_owned())
            .is_some())
    }

    pub fn update_note_content(
        &mut self,
        user: &UserId,
        id: i64,
        content: &str,
    ) -> Result<bool, RepositoryError> {
        self.check_online()?;

        Ok(self
            .note_mut(user, id)
            .map(|note| note.content = content.to_owned())
            .is_some())
    }

    pub fn move_note(
        &mut self,
        user: &UserId,
        id: i64,
        folder_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        self.check_online()?;

        if let Some(folder_id) = folder_id
            && !self.owns_folder(user, folder_id)
        {
            return Ok(false);
        }

        Ok(self
            .note_mut(user, id)
            .map(|note| note.folder_id = folder_id)
            .is_some())
    }

    pub fn delete_note(&mut self, user: &UserId, id: i64) -> Result<bool, RepositoryError> {
        self.check_online()?;

        let before = self.notes.len();
        self.notes
            .retain(|n| !(n.id == id && n.user_id == user.as_str()));

        Ok(self.notes.len() < before)
    }

    pub fn delete_folder(&mut self, user: &UserId, id: i64) -> Result<bool, RepositoryError> {
        self.check_online()?;

        if !self.owns_folder(user, id) {
            return Ok(false);
        }

        self.folders.retain(|f| f.id != id);
        // ON DELETE CASCADE
        self.notes.retain(|n| n.folder_id != Some(id));

        Ok(true)
    }

    pub fn rename_folder(
        &mut self,
        user: &UserId,
        id: i64,
        name: &str,
    ) -> Result<bool, RepositoryError> {
        self.check_online()?;

        Ok(self
            .folder_mut(user, id)
            .map(|folder| folder.name = name.to_owned())
            .is_some())
    }

    pub fn get_note(&self, user: &UserId, id: i64) -> Result<Option<Note>, RepositoryError> {
        self.check_online()?;

        Ok(self
            .notes
            .iter()
            .find(|n| n.id == id && n.user_id == user.as_str())
            .cloned())
    }

    pub fn folders_with_notes(&self, user: &UserId) -> Result<Vec<FolderWithNotes>, RepositoryError> {
        self.check_online()?;

        let mut folders: Vec<Folder> = self
            .folders
            .iter()
            .filter(|f| f.user_id == user.as_str())
            .cloned()
            .collect();
        folders.sort_by_key(|f| (f.created_at, f.id));

        Ok(folders
            .into_iter()
            .map(|folder| {
                let mut notes: Vec<Note> = self
                    .notes
                    .iter()
                    .filter(|n| n.folder_id == Some(folder.id))
                    .cloned()
                    .collect();
                notes.sort_by_key(|n| (n.created_at, n.id));
                FolderWithNotes { folder, notes }
            })
            .collect())
    }

    pub fn root_notes(&self, user: &UserId) -> Result<Vec<Note>, RepositoryError> {
        self.check_online()?;

        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.user_id == user.as_str() && n.folder_id.is_none())
            .cloned()
            .collect();
        notes.sort_by_key(|n| (n.created_at, n.id));

        Ok(notes)
    }
}
