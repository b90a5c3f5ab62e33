//! Extractors whose rejections use the same `{"error": ...}` body as every
//! other failure on the REST surface.

use axum::{
    Json,
    body::Bytes,
    extract::{
        FromRequest, Request,
        rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::dto::MutationResponse;

/// A request that never reached the service: bad path, query or body.
#[derive(Debug)]
pub struct ApiRejection {
    message: &'static str,
    detail: String,
}

impl ApiRejection {
    fn body(detail: impl ToString) -> Self {
        Self {
            message: "Invalid request body",
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        tracing::warn!("Rejected malformed request: {}", self.detail);

        (
            StatusCode::BAD_REQUEST,
            Json(MutationResponse::failed(self.message)),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::body(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiRejection {
    fn from(rejection: BytesRejection) -> Self {
        Self::body(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiRejection {
    fn from(e: serde_json::Error) -> Self {
        Self::body(e)
    }
}

impl From<PathRejection> for ApiRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            message: "Invalid path",
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiRejection {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            message: "Invalid query",
            detail: rejection.body_text(),
        }
    }
}

#[derive(axum_macros::FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub struct ApiJson<T>(pub T);

#[derive(axum_macros::FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiRejection))]
pub struct ApiPath<T>(pub T);

#[derive(axum_macros::FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiRejection))]
pub struct ApiQuery<T>(pub T);

/// JSON body that may be left out entirely; an empty body reads as
/// `T::default()`. A body that is present must still be valid JSON.
pub struct OptionalJson<T>(pub T);

impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.trim_ascii().is_empty() {
            return Ok(Self(T::default()));
        }

        Ok(Self(serde_json::from_slice(&bytes)?))
    }
}
