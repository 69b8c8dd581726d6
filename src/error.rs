//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Identity Errors**: duplicate or unknown emails, bad passwords, unknown API keys
/// - **Ownership Errors**: business names clashing or missing under an API key
/// - **Order Errors**: orders missing or filed under another business
/// - **Infrastructure Errors**: database, credential store, key allocation
///
/// The `Display` text of the domain variants doubles as the user-facing
/// message, on both the JSON API and the browser redirects.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Signup with an email that already belongs to a user.
    #[error("That email address is already used. Log in instead?")]
    DuplicateEmail,

    /// Login with an email no user has.
    #[error("That email address does not exist. Please try again")]
    UnknownEmail,

    /// Login with the wrong password for a known email.
    #[error("Incorrect password. Please try again")]
    BadPassword,

    /// API key is missing or matches no user.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// A business with the same (title-cased) name already exists under the key.
    #[error("You already have a business with this name")]
    DuplicateBusinessName,

    /// Order placed for a business the key does not own.
    #[error("You don't have any business with that name")]
    UnknownBusiness,

    /// The order exists but is filed under a different business.
    #[error("Incorrect business name")]
    BusinessMismatch,

    /// No order with the given id under the key.
    #[error("Your business doesn't have an order with that id")]
    OrderNotFound,

    /// No business matched the given id or name under the key.
    #[error("You don't have any business with the given business name")]
    NotFound,

    /// Request parameters are missing or malformed.
    #[error("{0}")]
    InvalidRequest(String),

    /// Every generated API key collided with an existing one.
    #[error("Could not allocate a unique API key")]
    ApiKeyExhausted,

    /// Password hashing failed or its worker task died.
    #[error("Credential store error: {0}")]
    Credential(String),
}

impl AppError {
    /// Whether this error is caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AppError::Database(_) | AppError::ApiKeyExhausted | AppError::Credential(_)
        )
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail | AppError::DuplicateBusinessName => StatusCode::CONFLICT,
            AppError::UnknownEmail | AppError::BadPassword | AppError::InvalidApiKey => {
                StatusCode::UNAUTHORIZED
            }
            AppError::UnknownBusiness | AppError::OrderNotFound | AppError::NotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::BusinessMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::ApiKeyExhausted | AppError::Credential(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Whether a database error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// Errors keep the flat shape existing API clients parse:
/// ```json
/// { "error": "Invalid API key" }
/// ```
///
/// Server-side failures are logged and answered with a generic message so
/// database details never reach the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
