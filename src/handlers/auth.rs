use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::models::UserId;

/// Header carrying the caller identity, set by the upstream auth layer.
pub const USER_HEADER: &str = "x-user-id";

/// Caller identity, if any. Handlers hand it to the service, which decides
/// what an anonymous caller may do.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<UserId>);

impl CurrentUser {
    pub const fn id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_string()));

        Ok(Self(user))
    }
}
