//! Session service - server-side login state for the browser surface.
//!
//! A login issues a random token that travels only in the session cookie.
//! The database stores the token's SHA-256 digest, so a leaked table cannot
//! be replayed as cookies.

use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{
    db::DbPool,
    error::AppError,
    models::{session::Session, user::User},
    services::account_service,
};

const TOKEN_LEN: usize = 32;

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Start a session for `user_id` and return the cookie token.
pub async fn create_session(pool: &DbPool, user_id: i64) -> Result<String, AppError> {
    let token = generate_token();

    sqlx::query("INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?, ?, ?)")
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolve a cookie token to its user, if the session still exists.
pub async fn resolve_session(pool: &DbPool, token: &str) -> Result<Option<User>, AppError> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT token_hash, user_id, created_at FROM sessions WHERE token_hash = ?",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    match session {
        Some(session) => account_service::find_user(pool, session.user_id).await,
        None => Ok(None),
    }
}

/// End a session. Unknown tokens are ignored.
pub async fn destroy_session(pool: &DbPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(hash_token(token))
        .execute(pool)
        .await?;

    Ok(())
}
