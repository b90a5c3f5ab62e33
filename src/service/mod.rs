use std::{sync::Arc, time::Duration};

use crate::{
    dto::{FolderResponse, NoteResponse, SearchResponse, TagsResponse, TreeResponse},
    error::NotebookError,
    invalidation::Invalidator,
    models::{DEFAULT_FOLDER_NAME, DEFAULT_NOTE_TITLE, UserId},
    mutation::{Applied, Mutation, MutationSink},
    repository::{Repository, RepositoryError},
    search,
};

/// Upper bound for a single revision long-poll.
pub const DEFAULT_REVISION_WAIT: Duration = Duration::from_secs(25);

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
    invalidator: Arc<Invalidator>,
    revision_wait: Duration,
}

fn rejected(message: &'static str) -> impl FnOnce(RepositoryError) -> NotebookError {
    move |source| NotebookError::StoreRejected { message, source }
}

impl NoteService {
    pub fn new(repo: Arc<tokio::sync::Mutex<Repository>>) -> Self {
        Self {
            repo,
            invalidator: Arc::new(Invalidator::new()),
            revision_wait: DEFAULT_REVISION_WAIT,
        }
    }

    #[must_use]
    pub fn with_revision_wait(mut self, revision_wait: Duration) -> Self {
        self.revision_wait = revision_wait;
        self
    }

    pub fn invalidator(&self) -> &Invalidator {
        &self.invalidator
    }

    /// Runs one mutation: authenticate, perform a single-row write, then
    /// signal views to refetch. Failures are logged here with their cause.
    pub async fn apply(
        &self,
        user: Option<&UserId>,
        mutation: Mutation,
    ) -> Result<Applied, NotebookError> {
        let name = mutation.name();

        let result = match user {
            Some(user) => self.write(user, mutation).await,
            None => Err(NotebookError::Unauthenticated),
        };

        match &result {
            Ok(_) => {
                self.invalidator.invalidate(name);
            }
            Err(NotebookError::Unauthenticated) => {
                tracing::warn!("Rejected unauthenticated {} request", name);
            }
            Err(e) => {
                tracing::error!("{} failed: {}", name, e);
            }
        }

        result
    }

    async fn write(&self, user: &UserId, mutation: Mutation) -> Result<Applied, NotebookError> {
        let message = mutation.failure_message();
        let target = mutation.target();
        let mut repo = self.repo.lock().await;

        let found = match mutation {
            Mutation::CreateFolder => {
                let folder = repo
                    .create_folder(user, DEFAULT_FOLDER_NAME)
                    .await
                    .map_err(rejected(message))?;
                return Ok(Applied::Created(folder.id));
            }
            Mutation::CreateNote { folder_id } => {
                let note = repo
                    .create_note(user, folder_id, DEFAULT_NOTE_TITLE)
                    .await
                    .map_err(rejected(message))?;
                return note
                    .map(|note| Applied::Created(note.id))
                    .ok_or(NotebookError::NotFound("Folder"));
            }
            Mutation::UpdateNoteTitle { id, title } => {
                repo.update_note_title(user, id, &title).await
            }
            Mutation::UpdateNoteContent { id, content } => {
                repo.update_note_content(user, id, &content).await
            }
            Mutation::MoveNote { id, folder_id } => repo.move_note(user, id, folder_id).await,
            Mutation::DeleteNote { id } => repo.delete_note(user, id).await,
            Mutation::DeleteFolder { id } => repo.delete_folder(user, id).await,
            Mutation::RenameFolder { id, name } => repo.rename_folder(user, id, &name).await,
        }
        .map_err(rejected(message))?;

        if found {
            Ok(Applied::Done)
        } else {
            Err(NotebookError::NotFound(target))
        }
    }

    /// Sidebar snapshot: folders with their notes plus root notes.
    pub async fn tree(&self, user: Option<&UserId>) -> Result<TreeResponse, NotebookError> {
        let user = user.ok_or(NotebookError::Unauthenticated)?;
        let message = "Failed to load notes";

        // Read the revision before the rows so a concurrent write can only
        // make the snapshot look older than it is.
        let revision = self.invalidator.revision();
        let mut repo = self.repo.lock().await;
        let folders = repo
            .folders_with_notes(user)
            .await
            .map_err(rejected(message))?;
        let root_notes = repo.root_notes(user).await.map_err(rejected(message))?;

        Ok(TreeResponse {
            revision,
            folders: folders.into_iter().map(FolderResponse::from).collect(),
            root_notes: root_notes.into_iter().map(NoteResponse::from).collect(),
        })
    }

    pub async fn get_note(
        &self,
        user: Option<&UserId>,
        id: i64,
    ) -> Result<NoteResponse, NotebookError> {
        let user = user.ok_or(NotebookError::Unauthenticated)?;

        self.repo
            .lock()
            .await
            .get_note(user, id)
            .await
            .map_err(rejected("Failed to get note"))?
            .map(NoteResponse::from)
            .ok_or(NotebookError::NotFound("Note"))
    }

    pub async fn search(
        &self,
        user: Option<&UserId>,
        query: &str,
    ) -> Result<SearchResponse, NotebookError> {
        let tree = self.tree(user).await?;
        Ok(search::search(&tree, query))
    }

    pub async fn tags(&self, user: Option<&UserId>) -> Result<TagsResponse, NotebookError> {
        let tree = self.tree(user).await?;
        Ok(TagsResponse {
            tags: search::extract_tags(tree.all_notes().map(|note| note.content.as_str())),
        })
    }

    /// Long-poll used by views to learn they must refetch the tree. Without
    /// `since` the current revision is returned at once.
    pub async fn wait_for_revision(
        &self,
        user: Option<&UserId>,
        since: Option<u64>,
    ) -> Result<u64, NotebookError> {
        user.ok_or(NotebookError::Unauthenticated)?;

        Ok(match since {
            Some(since) => self.invalidator.wait_past(since, self.revision_wait).await,
            None => self.invalidator.revision(),
        })
    }
}

/// A service bound to one caller, usable wherever a [`MutationSink`] is.
#[derive(Clone)]
pub struct Session {
    service: NoteService,
    user: Option<UserId>,
}

impl Session {
    pub const fn new(service: NoteService, user: Option<UserId>) -> Self {
        Self { service, user }
    }
}

impl MutationSink for Session {
    async fn apply(&self, mutation: Mutation) -> Result<Applied, NotebookError> {
        self.service.apply(self.user.as_ref(), mutation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> NoteService {
        NoteService::new(Arc::new(tokio::sync::Mutex::new(Repository::in_memory())))
    }

    fn alice() -> UserId {
        UserId("alice".to_string())
    }

    async fn created(service: &NoteService, mutation: Mutation) -> i64 {
        match service.apply(Some(&alice()), mutation).await {
            Ok(Applied::Created(id)) => id,
            other => panic!("expected a created row, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthenticated_callers_are_rejected_without_writing() {
        let service = service();

        let result = service.apply(None, Mutation::CreateFolder).await;

        assert!(matches!(result, Err(NotebookError::Unauthenticated)));
        assert_eq!(service.invalidator().revision(), 0);
        let tree = service.tree(Some(&alice())).await.unwrap();
        assert!(tree.folders.is_empty());
    }

    #[tokio::test]
    async fn create_uses_defaults_and_bumps_revision() {
        let service = service();

        let folder_id = created(&service, Mutation::CreateFolder).await;
        let note_id = created(
            &service,
            Mutation::CreateNote {
                folder_id: Some(folder_id),
            },
        )
        .await;

        let tree = service.tree(Some(&alice())).await.unwrap();
        assert_eq!(tree.revision, 2);
        assert_eq!(tree.folders[0].name, "New Folder");
        assert_eq!(tree.folders[0].notes[0].id, note_id);
        assert_eq!(tree.folders[0].notes[0].title, "Untitled Note");
        assert!(tree.root_notes.is_empty());
    }

    #[tokio::test]
    async fn move_note_to_root_and_back() {
        let service = service();
        let folder_id = created(&service, Mutation::CreateFolder).await;
        let note_id = created(&service, Mutation::CreateNote { folder_id: None }).await;

        service
            .apply(
                Some(&alice()),
                Mutation::MoveNote {
                    id: note_id,
                    folder_id: Some(folder_id),
                },
            )
            .await
            .unwrap();
        let note = service.get_note(Some(&alice()), note_id).await.unwrap();
        assert_eq!(note.folder_id, Some(folder_id));

        service
            .apply(
                Some(&alice()),
                Mutation::MoveNote {
                    id: note_id,
                    folder_id: None,
                },
            )
            .await
            .unwrap();
        let note = service.get_note(Some(&alice()), note_id).await.unwrap();
        assert_eq!(note.folder_id, None);
    }

    #[tokio::test]
    async fn missing_rows_are_reported_not_found() {
        let service = service();

        let result = service
            .apply(Some(&alice()), Mutation::RenameFolder { id: 42, name: "x".into() })
            .await;

        match result {
            Err(e @ NotebookError::NotFound(_)) => {
                assert_eq!(e.client_message(), "Folder not found");
            }
            other => panic!("expected not found, got {other:?}"),
        }
        assert_eq!(service.invalidator().revision(), 0);
    }

    #[tokio::test]
    async fn store_failures_become_generic_messages() {
        let repo = Arc::new(tokio::sync::Mutex::new(Repository::in_memory()));
        if let Repository::Memory(memory) = &mut *repo.lock().await {
            memory.set_offline(true);
        }
        let service = NoteService::new(repo);

        let err = service
            .apply(Some(&alice()), Mutation::DeleteNote { id: 1 })
            .await
            .unwrap_err();

        assert_eq!(err.client_message(), "Failed to delete note");
    }

    #[tokio::test]
    async fn tags_and_search_cover_every_note() {
        let service = service();
        let note_id = created(&service, Mutation::CreateNote { folder_id: None }).await;
        service
            .apply(
                Some(&alice()),
                Mutation::UpdateNoteContent {
                    id: note_id,
                    content: "Buy milk #errand".into(),
                },
            )
            .await
            .unwrap();

        let tags = service.tags(Some(&alice())).await.unwrap();
        let found = service.search(Some(&alice()), "errand").await.unwrap();

        assert_eq!(tags.tags, vec!["#errand".to_string()]);
        assert_eq!(found.notes.len(), 1);
        assert_eq!(found.notes[0].id, note_id);
    }

    #[tokio::test]
    async fn revision_wait_needs_a_caller() {
        let service = service();
        created(&service, Mutation::CreateFolder).await;

        let anonymous = service.wait_for_revision(None, Some(0)).await;
        let current = service.wait_for_revision(Some(&alice()), None).await;
        let woken = service.wait_for_revision(Some(&alice()), Some(0)).await;

        assert!(matches!(anonymous, Err(NotebookError::Unauthenticated)));
        assert_eq!(current.unwrap(), 1);
        assert_eq!(woken.unwrap(), 1);
    }
}
