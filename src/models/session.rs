//! Browser session model.
//!
//! The cookie carries an opaque random token; the database only keeps its
//! SHA-256 digest, the same way API credentials are kept out of storage in
//! plaintext.

use chrono::{DateTime, Utc};

/// Represents a session record from the database.
///
/// # Database Table
///
/// Maps to the `sessions` table with columns:
/// - `token_hash`: SHA-256 hex digest of the cookie token
/// - `user_id`: the logged-in user
/// - `created_at`: login time
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub token_hash: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
