//! Account service - registration, login and API key verification.
//!
//! This service handles:
//! - Creating users with a unique, randomly generated API key
//! - Authenticating browser logins by email and password
//! - Resolving a raw API key to the user that owns it

use rand::{Rng, distr::Alphanumeric};
use sqlx::{SqliteConnection, SqliteExecutor};

use crate::{
    db::{DbPool, begin_write},
    error::{AppError, is_unique_violation},
    models::user::{NewUser, User},
    services::credentials,
    text::title_case,
};

/// Length of generated API keys.
pub const API_KEY_LEN: usize = 18;

/// Collisions tolerated before registration gives up.
const MAX_API_KEY_ATTEMPTS: usize = 8;

const USER_COLUMNS: &str = "id, name, email, password_hash, api_key, plan";

/// Generate a random alphanumeric API key.
pub fn generate_api_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(API_KEY_LEN)
        .map(char::from)
        .collect()
}

/// Register a new user.
///
/// # Process
///
/// 1. Reject emails that are already registered
/// 2. Hash the password off the async executor
/// 3. Draw API keys until one is unused, then insert the user
///
/// # Errors
///
/// - `DuplicateEmail`: Email already registered (also when a concurrent
///   signup with the same email commits first)
/// - `ApiKeyExhausted`: Every generated key collided
/// - `Credential`/`Database`: Infrastructure failures
pub async fn register(pool: &DbPool, new_user: NewUser) -> Result<User, AppError> {
    register_with_keys(pool, new_user, generate_api_key).await
}

/// Register a user drawing API keys from `next_key`.
pub(crate) async fn register_with_keys<F>(
    pool: &DbPool,
    new_user: NewUser,
    mut next_key: F,
) -> Result<User, AppError>
where
    F: FnMut() -> String + Send,
{
    if find_by_email(pool, &new_user.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = credentials::hash_password_blocking(new_user.password).await?;
    let name = title_case(&new_user.name);
    let plan = title_case(&new_user.plan);

    let mut tx = begin_write(pool).await?;

    for attempt in 1..=MAX_API_KEY_ATTEMPTS {
        let api_key = next_key();

        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE api_key = ?)")
                .bind(&api_key)
                .fetch_one(&mut *tx)
                .await?;

        if taken {
            tracing::debug!(attempt, "generated API key already in use, regenerating");
            continue;
        }

        let inserted = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, api_key, plan)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(&api_key)
        .bind(&plan)
        .fetch_one(&mut *tx)
        .await;

        return match inserted {
            Ok(user) => {
                tx.commit().await?;
                tracing::info!(user_id = user.id, "registered new user");
                Ok(user)
            }
            // The key was checked inside this transaction, so the email lost a race
            Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateEmail),
            Err(e) => Err(e.into()),
        };
    }

    tracing::error!(
        attempts = MAX_API_KEY_ATTEMPTS,
        "could not generate an unused API key"
    );
    Err(AppError::ApiKeyExhausted)
}

/// Authenticate a browser login.
///
/// # Errors
///
/// - `UnknownEmail`: No user has this email
/// - `BadPassword`: Password does not match the stored hash
pub async fn authenticate(pool: &DbPool, email: &str, password: &str) -> Result<User, AppError> {
    let user = find_by_email(pool, email)
        .await?
        .ok_or(AppError::UnknownEmail)?;

    let valid =
        credentials::verify_password_blocking(user.password_hash.clone(), password.to_string())
            .await?;

    if valid {
        Ok(user)
    } else {
        Err(AppError::BadPassword)
    }
}

/// Look up the user owning `raw_key` (exact, case-sensitive match).
///
/// Accepts the pool or a connection, so callers can check the key inside
/// their own transaction.
pub async fn verify_key<'c, E>(executor: E, raw_key: &str) -> Result<Option<User>, AppError>
where
    E: SqliteExecutor<'c>,
{
    if raw_key.is_empty() {
        return Ok(None);
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE api_key = ?"
    ))
    .bind(raw_key)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn find_user(pool: &DbPool, user_id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// The user owning `api_key`, or `InvalidApiKey`.
pub(crate) async fn require_known_key(
    conn: &mut SqliteConnection,
    api_key: &str,
) -> Result<User, AppError> {
    verify_key(&mut *conn, api_key)
        .await?
        .ok_or(AppError::InvalidApiKey)
}
