//! Request authentication for both surfaces.
//!
//! - The JSON API identifies the caller by the `api-key` query parameter
//!   ([`ApiKey`]); the services verify it against the users table.
//! - The browser routes identify the caller by the `session` cookie
//!   ([`require_session`]), which injects a [`CurrentUser`] into the request.

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    db::DbPool, error::AppError, models::user::User, services::session_service,
};

/// Name of the browser session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Raw API key taken from the `api-key` query parameter.
///
/// Extraction only checks that a key is present; ownership is checked by the
/// service the handler calls.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

#[derive(Deserialize)]
struct ApiKeyQuery {
    #[serde(rename = "api-key")]
    api_key: Option<String>,
}

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ApiKeyQuery>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::InvalidApiKey)?;

        query
            .api_key
            .filter(|key| !key.is_empty())
            .map(ApiKey)
            .ok_or(AppError::InvalidApiKey)
    }
}

/// The logged-in user, attached to requests by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Session middleware for the browser routes.
///
/// # Flow
///
/// 1. Read the `session` cookie
/// 2. Resolve it to a user through the session store
/// 3. If found: inject `CurrentUser` into the request, call next handler
/// 4. If not found: redirect to `/login`
pub async fn require_session(
    State(pool): State<DbPool>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_owned()) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let Some(user) = session_service::resolve_session(&pool, &token).await? else {
        tracing::debug!("stale session cookie, redirecting to login");
        return Ok(Redirect::to("/login").into_response());
    };

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
