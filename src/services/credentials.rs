//! Password hashing and verification.
//!
//! Passwords are stored as Argon2id PHC strings with a per-password random
//! salt. Hashing is CPU-bound, so async callers go through
//! [`hash_password_blocking`] / [`verify_password_blocking`].

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task::spawn_blocking;

use crate::error::AppError;

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Credential(e.to_string()))
}

/// Check a plaintext password against a stored PHC string.
///
/// A stored hash that cannot be parsed never verifies.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Credential(e.to_string()))?
}

pub async fn verify_password_blocking(stored_hash: String, password: String) -> Result<bool, AppError> {
    spawn_blocking(move || verify_password(&stored_hash, &password))
        .await
        .map_err(|e| AppError::Credential(e.to_string()))
}
