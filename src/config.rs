//! Application configuration management.
//!
//! Configuration is read from environment variables (optionally seeded from a
//! `.env` file) and deserialized with `envy`.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to `sqlite://orders.db`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `SESSION_COOKIE_SECURE` (optional): mark the session cookie `Secure`, defaults to false
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default)]
    pub session_cookie_secure: bool,
}

fn default_database_url() -> String {
    "sqlite://orders.db".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed into its
    /// expected type (e.g. a non-numeric `SERVER_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
