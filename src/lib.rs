//! Order management server.
//!
//! Account holders sign up, receive an API key, register businesses under it
//! and manage the customer orders of those businesses, either through
//! session-based browser routes or through a JSON API keyed by `api-key`.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum
//! - **Database**: SQLite with sqlx (async queries, embedded migrations)
//! - **Authentication**: API key match for the JSON API, hashed session
//!   tokens in an HttpOnly cookie for the browser
//! - **Passwords**: Argon2id

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod text;

use axum::{
    Router,
    extract::FromRef,
    middleware as axum_middleware,
    response::Redirect,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::{config::Config, db::DbPool};

/// State shared with every handler.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: DbPool,

    /// Whether the session cookie is marked `Secure`
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            cookie_secure: config.session_cookie_secure,
        }
    }
}

/// Build the HTTP router for both surfaces.
pub fn app(state: AppState) -> Router {
    // Browser pages that need a logged-in user
    let session_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route(
            "/business_setup",
            get(handlers::dashboard::business_setup_page).post(handlers::dashboard::business_setup),
        )
        .route("/listings", get(handlers::dashboard::listings))
        .route("/del_order", get(handlers::dashboard::del_order))
        .route("/del_business", get(handlers::dashboard::del_business))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    // Public browser pages
    let browser_routes = Router::new()
        .route(
            "/signup",
            get(handlers::accounts::signup_page).post(handlers::accounts::signup),
        )
        .route(
            "/login",
            get(handlers::accounts::login_page).post(handlers::accounts::login),
        )
        .route("/logout", get(handlers::accounts::logout))
        .route(
            "/order",
            get(handlers::order_form::order_page).post(handlers::order_form::place_order),
        );

    // JSON API, authenticated per request by the `api-key` query parameter
    let api_routes = Router::new()
        .route(
            "/all_orders",
            get(handlers::orders::all_orders).post(handlers::orders::all_orders),
        )
        .route(
            "/all_businesses",
            get(handlers::businesses::all_businesses).post(handlers::businesses::all_businesses),
        )
        .route(
            "/add_business",
            get(handlers::businesses::add_business).post(handlers::businesses::add_business),
        )
        .route(
            "/add_order",
            get(handlers::orders::add_order).post(handlers::orders::add_order),
        )
        .route(
            "/delete_order",
            get(handlers::orders::delete_order).delete(handlers::orders::delete_order),
        )
        .route(
            "/delete_business",
            get(handlers::businesses::delete_business)
                .delete(handlers::businesses::delete_business),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/", get(|| async { Redirect::to("/login") }))
        .merge(session_routes)
        .merge(browser_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
