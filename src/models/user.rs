//! User (account holder) model and signup/login request types.

use serde::{Deserialize, Serialize};

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Each user:
/// - Has a unique email used to log in through the browser surface
/// - Owns exactly one API key, which every business and order refers to
///
/// Users are never updated or deleted once created.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Display name, title-cased at signup
    pub name: String,

    pub email: String,

    /// Argon2 PHC string; the plaintext password is never stored
    pub password_hash: String,

    /// Opaque tenant key (18 alphanumeric characters)
    ///
    /// Businesses and orders reference this value directly, and the JSON
    /// API authenticates by exact match against it.
    pub api_key: String,

    /// Subscription plan label, title-cased at signup
    pub plan: String,
}

/// Input for registering a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub plan: String,
}

/// Signup form posted by the browser.
///
/// Field names follow the HTML form (`pass` for the password).
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub plan: String,
    pub pass: String,
}

impl From<SignupForm> for NewUser {
    fn from(form: SignupForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            password: form.pass,
            plan: form.plan,
        }
    }
}

/// Login form posted by the browser.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub pass: String,
}

/// Account summary shown on the dashboard.
///
/// Unlike the JSON API, the dashboard is the place a user reads their own
/// API key, so it is included here.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub plan: String,
    pub api_key: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            plan: user.plan,
            api_key: user.api_key,
        }
    }
}
