//! Browser account handlers.
//!
//! - GET/POST /signup - Register, then go to the login page
//! - GET/POST /login - Start a session cookie, then go to the dashboard
//! - GET /logout - End the session

use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    AppState,
    db::DbPool,
    error::AppError,
    handlers::{FlashParams, FormPage, redirect_with},
    middleware::auth::SESSION_COOKIE,
    models::user::{LoginForm, SignupForm},
    services::{account_service, session_service},
};

/// Shown for both unknown emails and wrong passwords.
const LOGIN_FAILED: &str = "Incorrect email or password. Please try again";

pub async fn signup_page(Query(flash): Query<FlashParams>) -> Json<FormPage> {
    Json(FormPage::new("signup", flash))
}

/// Register a new account from the signup form.
///
/// An already registered email is sent to the login page with a hint.
pub async fn signup(
    State(pool): State<DbPool>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;

    match account_service::register(&pool, form.into()).await {
        Ok(_) => Ok(Redirect::to("/login")),
        Err(AppError::DuplicateEmail) => {
            let message = AppError::DuplicateEmail.to_string();
            Ok(redirect_with("/login", &[("error", message.as_str())]))
        }
        Err(e) if e.is_client_error() => {
            let message = e.to_string();
            Ok(redirect_with("/signup", &[("error", message.as_str())]))
        }
        Err(e) => Err(e),
    }
}

pub async fn login_page(Query(flash): Query<FlashParams>) -> Json<FormPage> {
    Json(FormPage::new("login", flash))
}

/// Check the credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<(CookieJar, Redirect), AppError> {
    let Form(form) = form?;

    let user = match account_service::authenticate(&state.pool, &form.email, &form.pass).await {
        Ok(user) => user,
        Err(e @ (AppError::UnknownEmail | AppError::BadPassword)) => {
            tracing::warn!(reason = %e, "login rejected");
            return Ok((jar, redirect_with("/login", &[("error", LOGIN_FAILED)])));
        }
        Err(e) => return Err(e),
    };

    let token = session_service::create_session(&state.pool, user.id).await?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure);

    tracing::info!(user_id = user.id, "user logged in");
    Ok((jar.add(cookie), Redirect::to("/dashboard")))
}

pub async fn logout(
    State(pool): State<DbPool>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        session_service::destroy_session(&pool, cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to("/login")))
}
