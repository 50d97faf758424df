//! Session identity
//!
//! Sessions are established upstream; requests arrive carrying the signed-in
//! user's id in the `X-User-Id` header. [`session_layer`] turns that header
//! into an [`AuthenticatedUser`] request extension, which handlers read via
//! the [`CurrentUser`] extractor and the activity logger reads directly.
//!
//! # Trust boundary
//!
//! The header is not authenticated here. Any client that sends `X-User-Id`
//! is treated as that user. The server must only be reachable through a
//! trusted proxy that authenticates the session and strips any incoming
//! `X-User-Id` before setting its own. Exposing it directly lets anyone act
//! as any user.

mod password;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};

use crate::api::response::AppError;

pub use password::{BcryptHasher, PasswordHashError, PasswordHasher};

/// Header carrying the signed-in user's id
pub static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Extension that holds the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
}

/// Attach an [`AuthenticatedUser`] when the request names a valid user id.
///
/// Requests without one pass through anonymously; rejecting them is left to
/// the handlers that require a session.
pub async fn session_layer(mut request: Request, next: Next) -> Response {
    if let Some(user) = user_from_headers(request.headers()) {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

fn user_from_headers(headers: &HeaderMap) -> Option<AuthenticatedUser> {
    let id = headers
        .get(&USER_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    (id > 0).then_some(AuthenticatedUser { id })
}

/// Extractor for handlers that need a signed-in user
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
