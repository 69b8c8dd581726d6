#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use order_management_server::{
    AppState, app,
    db::DbPool,
    models::user::NewUser,
    services::account_service,
};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// `name=value` pair of the session cookie set by this response.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

pub fn router(pool: DbPool) -> Router {
    app(AppState {
        pool,
        cookie_secure: false,
    })
}

/// Encode query or form pairs.
pub fn encode(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn call(app: &Router, method: Method, path: &str, pairs: &[(&str, &str)]) -> TestResponse {
    let uri = format!("{path}?{}", encode(pairs));
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_form(
    app: &Router,
    uri: &str,
    pairs: &[(&str, &str)],
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(encode(pairs))).unwrap()).await
}

/// Register an account directly through the service and return its API key.
pub async fn register(pool: &DbPool, email: &str) -> String {
    let user = account_service::register(
        pool,
        NewUser {
            name: "ada lovelace".into(),
            email: email.into(),
            password: "correct horse".into(),
            plan: "basic".into(),
        },
    )
    .await
    .unwrap();

    user.api_key
}
