use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get, post, put},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::{any::Any, sync::Arc};

use crate::{dto::MutationResponse, handlers::rest, service::NoteService};

async fn root() -> Response {
    (StatusCode::OK, "Hello world!").into_response()
}

/// Turns a panicking handler into the same `{error}` body as any other
/// failure.
fn unexpected(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MutationResponse::failed("Unexpected error")),
    )
        .into_response()
}

pub fn build(service: Arc<NoteService>) -> Router {
    let rest_router = Router::new()
        .route("/tree", get(rest::get_tree))
        .route("/revision", get(rest::wait_revision))
        .route("/folders", post(rest::create_folder))
        .route(
            "/folders/{id}",
            put(rest::rename_folder).delete(rest::delete_folder),
        )
        .route("/notes", post(rest::create_note))
        .route("/notes/{id}", get(rest::get_note).delete(rest::delete_note))
        .route("/notes/{id}/title", put(rest::update_note_title))
        .route("/notes/{id}/content", put(rest::update_note_content))
        .route("/notes/{id}/folder", put(rest::move_note))
        .route("/search", get(rest::search))
        .route("/tags", get(rest::tags))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .config(utoipa_swagger_ui::Config::new([
                    "/rest/api-doc/openapi.json",
                ]))
                .url("/api-doc/openapi.json", rest::ApiDoc::openapi()),
        )
        .with_state(service)
        .layer(CatchPanicLayer::custom(unexpected))
        .layer(TraceLayer::new_for_http());

    Router::new()
        .route("/", any(root))
        .nest("/rest", rest_router)
}
