use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        CreateNoteRequest, FolderResponse, FolderSummary, MoveNoteRequest, MutationResponse,
        NoteResponse, NoteSummary, RenameFolderRequest, RevisionQuery, RevisionResponse,
        SearchQuery, SearchResponse, TagsResponse, TreeResponse, UpdateContentRequest,
        UpdateTitleRequest,
    },
    error::NotebookError,
    handlers::{
        auth::CurrentUser,
        extract::{ApiJson, ApiPath, ApiQuery, OptionalJson},
    },
    mutation::{Applied, Mutation},
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        get_tree,
        wait_revision,
        get_note,
        create_folder,
        rename_folder,
        delete_folder,
        create_note,
        update_note_title,
        update_note_content,
        move_note,
        delete_note,
        search,
        tags
    ),
    components(schemas(
        TreeResponse,
        FolderResponse,
        NoteResponse,
        RevisionResponse,
        CreateNoteRequest,
        UpdateTitleRequest,
        UpdateContentRequest,
        MoveNoteRequest,
        RenameFolderRequest,
        MutationResponse,
        SearchResponse,
        FolderSummary,
        NoteSummary,
        TagsResponse
    )),
    tags(
        (name = "tree", description = "Sidebar read model"),
        (name = "folders", description = "Folder mutations"),
        (name = "notes", description = "Note reads and mutations"),
        (name = "search", description = "Search pane")
    )
)]
pub struct ApiDoc;

const fn status_for(e: &NotebookError) -> StatusCode {
    match e {
        NotebookError::Unauthenticated => StatusCode::UNAUTHORIZED,
        NotebookError::NotFound(_) => StatusCode::NOT_FOUND,
        NotebookError::StoreRejected { .. }
        | NotebookError::Remote(_)
        | NotebookError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(e: &NotebookError) -> Response {
    (
        status_for(e),
        Json(MutationResponse::failed(e.client_message())),
    )
        .into_response()
}

fn read_failed(what: &str, e: &NotebookError) -> Response {
    if !matches!(e, NotebookError::Unauthenticated | NotebookError::NotFound(_)) {
        tracing::error!("failed to get {}: {}", what, e);
    }
    error_response(e)
}

async fn mutate(service: &NoteService, user: &CurrentUser, mutation: Mutation) -> Response {
    // The service logs failures with their cause.
    match service.apply(user.id(), mutation).await {
        Ok(Applied::Created(id)) => {
            (StatusCode::CREATED, Json(MutationResponse::created(id))).into_response()
        }
        Ok(Applied::Done) => (StatusCode::OK, Json(MutationResponse::ok())).into_response(),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/tree",
    responses(
        (status = 200, description = "Folders with their notes, plus root notes", body = TreeResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "tree"
)]
#[debug_handler]
pub async fn get_tree(State(service): State<Arc<NoteService>>, user: CurrentUser) -> Response {
    match service.tree(user.id()).await {
        Ok(tree) => (StatusCode::OK, Json(tree)).into_response(),
        Err(e) => read_failed("tree", &e),
    }
}

#[utoipa::path(
    get,
    path = "/revision",
    params(
        ("since" = Option<u64>, Query, description = "Last revision the caller rendered")
    ),
    responses(
        (status = 200, description = "Current revision, returned once it moves past `since` or the wait times out", body = RevisionResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse)
    ),
    tag = "tree"
)]
#[debug_handler]
pub async fn wait_revision(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<RevisionQuery>,
) -> Response {
    match service.wait_for_revision(user.id(), query.since).await {
        Ok(revision) => (StatusCode::OK, Json(RevisionResponse { revision })).into_response(),
        Err(e) => read_failed("revision", &e),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Note not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_note(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Response {
    match service.get_note(user.id(), id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => read_failed("note", &e),
    }
}

#[utoipa::path(
    post,
    path = "/folders",
    responses(
        (status = 201, description = "Folder created", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn create_folder(State(service): State<Arc<NoteService>>, user: CurrentUser) -> Response {
    mutate(&service, &user, Mutation::CreateFolder).await
}

#[utoipa::path(
    put,
    path = "/folders/{id}",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    request_body = RenameFolderRequest,
    responses(
        (status = 200, description = "Folder renamed", body = MutationResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Folder not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn rename_folder(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<RenameFolderRequest>,
) -> Response {
    mutate(
        &service,
        &user,
        Mutation::RenameFolder {
            id,
            name: payload.name,
        },
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/folders/{id}",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder deleted, contained notes follow the store's cascade rule", body = MutationResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Folder not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "folders"
)]
#[debug_handler]
pub async fn delete_folder(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Response {
    mutate(&service, &user, Mutation::DeleteFolder { id }).await
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created, body carries its id", body = MutationResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Parent folder not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    OptionalJson(payload): OptionalJson<CreateNoteRequest>,
) -> Response {
    mutate(
        &service,
        &user,
        Mutation::CreateNote {
            folder_id: payload.folder_id,
        },
    )
    .await
}

#[utoipa::path(
    put,
    path = "/notes/{id}/title",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateTitleRequest,
    responses(
        (status = 200, description = "Title saved", body = MutationResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Note not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note_title(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateTitleRequest>,
) -> Response {
    mutate(
        &service,
        &user,
        Mutation::UpdateNoteTitle {
            id,
            title: payload.title,
        },
    )
    .await
}

#[utoipa::path(
    put,
    path = "/notes/{id}/content",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Body saved", body = MutationResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Note not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note_content(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateContentRequest>,
) -> Response {
    mutate(
        &service,
        &user,
        Mutation::UpdateNoteContent {
            id,
            content: payload.content,
        },
    )
    .await
}

#[utoipa::path(
    put,
    path = "/notes/{id}/folder",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = MoveNoteRequest,
    responses(
        (status = 200, description = "Note moved", body = MutationResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Note or target folder not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn move_note(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<MoveNoteRequest>,
) -> Response {
    mutate(
        &service,
        &user,
        Mutation::MoveNote {
            id,
            folder_id: payload.folder_id,
        },
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted", body = MutationResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 404, description = "Note not found", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Response {
    mutate(&service, &user, Mutation::DeleteNote { id }).await
}

#[utoipa::path(
    get,
    path = "/search",
    params(
        ("q" = String, Query, description = "Case-insensitive substring")
    ),
    responses(
        (status = 200, description = "Matching folders and notes", body = SearchResponse),
        (status = 400, description = "Malformed request", body = MutationResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "search"
)]
#[debug_handler]
pub async fn search(
    State(service): State<Arc<NoteService>>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Response {
    match service.search(user.id(), &query.q).await {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => read_failed("search results", &e),
    }
}

#[utoipa::path(
    get,
    path = "/tags",
    responses(
        (status = 200, description = "Every #tag in note bodies, sorted", body = TagsResponse),
        (status = 401, description = "Unauthorized", body = MutationResponse),
        (status = 500, description = "Internal server error", body = MutationResponse)
    ),
    tag = "search"
)]
#[debug_handler]
pub async fn tags(State(service): State<Arc<NoteService>>, user: CurrentUser) -> Response {
    match service.tags(user.id()).await {
        Ok(tags) => (StatusCode::OK, Json(tags)).into_response(),
        Err(e) => read_failed("tags", &e),
    }
}
