///! Authentication middleware
///!
///! The portal sits behind an SSO proxy which authenticates the user and
///! forwards the login in the `X-Remote-User` header.

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use async_trait::async_trait;
use selfservice_common::{messages, ApiResponse};

pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// Authentication error response
pub struct AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let json = Json(ApiResponse::new(messages::NOT_AUTHENTICATED));
        (StatusCode::UNAUTHORIZED, json).into_response()
    }
}

/// Extracted user information from authentication
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

/// Rejects requests without a remote user and stores the user in the
/// request extensions
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AuthError> {
    let username = request
        .headers()
        .get(REMOTE_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(AuthError)?;

    tracing::debug!(user = %username, path = %request.uri().path(), "Authenticated request");
    request.extensions_mut().insert(AuthUser { username });
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or(AuthError)
    }
}
