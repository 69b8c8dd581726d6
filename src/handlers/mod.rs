//! HTTP request handlers (route handlers).
//!
//! Two surfaces share the same services:
//! - JSON API keyed by the `api-key` query parameter (`businesses`, `orders`)
//! - Browser routes driven by form posts and redirects (`accounts`,
//!   `dashboard`, `order_form`); pages are returned as JSON view models for
//!   the front end to render

use axum::response::Redirect;
use serde::{Deserialize, Serialize};

/// Signup, login and logout
pub mod accounts;
/// JSON API for businesses
pub mod businesses;
/// Logged-in browser pages
pub mod dashboard;
/// Service health probe
pub mod health;
/// Public customer order form
pub mod order_form;
/// JSON API for orders
pub mod orders;

/// Body of a successful JSON API mutation: `{"Success": "..."}`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    #[serde(rename = "Success")]
    pub message: &'static str,
}

impl SuccessResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Flash messages carried across a redirect in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// A bare form page: which form to show and any flash message.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub page: &'static str,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl FormPage {
    pub fn new(page: &'static str, flash: FlashParams) -> Self {
        Self {
            page,
            error: flash.error,
            message: flash.message,
        }
    }
}

/// Build a 303 redirect to `path` with URL-encoded query parameters.
pub(crate) fn redirect_with(path: &str, params: &[(&str, &str)]) -> Redirect {
    if params.is_empty() {
        return Redirect::to(path);
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();

    Redirect::to(&format!("{path}?{query}"))
}
