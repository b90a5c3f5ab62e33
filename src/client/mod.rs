//! Typed HTTP client for the REST surface, used by views that run outside
//! the server process.

use reqwest::{Method, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    dto::{
        CreateNoteRequest, MoveNoteRequest, MutationResponse, NoteResponse, RenameFolderRequest,
        RevisionResponse, SearchResponse, TagsResponse, TreeResponse, UpdateContentRequest,
        UpdateTitleRequest,
    },
    error::NotebookError,
    handlers::auth::USER_HEADER,
    models::UserId,
    mutation::{Applied, Mutation, MutationSink},
};

#[derive(Clone)]
pub struct NotebookClient {
    http: reqwest::Client,
    base_url: String,
    user: Option<UserId>,
}

impl NotebookClient {
    /// `base_url` points at the REST root, e.g. `http://localhost:8000/rest`.
    pub fn new(base_url: impl Into<String>, user: Option<UserId>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.user {
            Some(user) => builder.header(USER_HEADER, user.as_str()),
            None => builder,
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, NotebookError> {
        if response.status().is_success() {
            return Ok(response.json().await?);
        }
        Err(Self::failure(response).await)
    }

    async fn failure(response: Response) -> NotebookError {
        let status = response.status();
        let message = response
            .json::<MutationResponse>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| status.to_string());

        match status {
            reqwest::StatusCode::UNAUTHORIZED => NotebookError::Unauthenticated,
            _ => NotebookError::Remote(message),
        }
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Applied, NotebookError> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response: MutationResponse = Self::read(builder.send().await?).await?;
        Ok(response.id.map_or(Applied::Done, Applied::Created))
    }

    pub async fn tree(&self) -> Result<TreeResponse, NotebookError> {
        Self::read(self.request(Method::GET, "/tree").send().await?).await
    }

    pub async fn note(&self, id: i64) -> Result<NoteResponse, NotebookError> {
        Self::read(
            self.request(Method::GET, &format!("/notes/{id}"))
                .send()
                .await?,
        )
        .await
    }

    /// Blocks until the store moves past `since` (or the server's wait
    /// bound elapses) and returns the revision then current.
    pub async fn wait_revision(&self, since: u64) -> Result<u64, NotebookError> {
        let response: RevisionResponse = Self::read(
            self.request(Method::GET, "/revision")
                .query(&[("since", since)])
                .send()
                .await?,
        )
        .await?;
        Ok(response.revision)
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, NotebookError> {
        Self::read(
            self.request(Method::GET, "/search")
                .query(&[("q", query)])
                .send()
                .await?,
        )
        .await
    }

    pub async fn tags(&self) -> Result<TagsResponse, NotebookError> {
        Self::read(self.request(Method::GET, "/tags").send().await?).await
    }
}

impl MutationSink for NotebookClient {
    async fn apply(&self, mutation: Mutation) -> Result<Applied, NotebookError> {
        match mutation {
            Mutation::CreateFolder => self.send::<()>(Method::POST, "/folders", None).await,
            Mutation::CreateNote { folder_id } => {
                self.send(Method::POST, "/notes", Some(&CreateNoteRequest { folder_id }))
                    .await
            }
            Mutation::UpdateNoteTitle { id, title } => {
                self.send(
                    Method::PUT,
                    &format!("/notes/{id}/title"),
                    Some(&UpdateTitleRequest { title }),
                )
                .await
            }
            Mutation::UpdateNoteContent { id, content } => {
                self.send(
                    Method::PUT,
                    &format!("/notes/{id}/content"),
                    Some(&UpdateContentRequest { content }),
                )
                .await
            }
            Mutation::MoveNote { id, folder_id } => {
                self.send(
                    Method::PUT,
                    &format!("/notes/{id}/folder"),
                    Some(&MoveNoteRequest { folder_id }),
                )
                .await
            }
            Mutation::DeleteNote { id } => {
                self.send::<()>(Method::DELETE, &format!("/notes/{id}"), None)
                    .await
            }
            Mutation::DeleteFolder { id } => {
                self.send::<()>(Method::DELETE, &format!("/folders/{id}"), None)
                    .await
            }
            Mutation::RenameFolder { id, name } => {
                self.send(
                    Method::PUT,
                    &format!("/folders/{id}"),
                    Some(&RenameFolderRequest { name }),
                )
                .await
            }
        }
    }
}
