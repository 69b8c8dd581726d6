//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating the SQLite connection pool
//! - Opening write transactions
//! - Running the embedded schema migrations

use std::{str::FromStr, time::Duration};

use sqlx::{
    Pool, Sqlite, Transaction,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::config::Config;

/// Type alias for the SQLite connection pool shared by every handler.
pub type DbPool = Pool<Sqlite>;

/// Schema migrations, embedded at compile time from ./migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// How long a connection waits for another writer before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a new SQLite connection pool.
///
/// The database file is created when it does not exist yet, and foreign key
/// enforcement is switched on for every connection: ownership between users,
/// businesses and orders relies on it. The file runs in WAL mode so readers
/// do not block the single writer.
///
/// # Errors
///
/// Returns an error if:
/// - The connection string is invalid
/// - The database file cannot be opened or created
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(options)
        .await
}

/// Begin a transaction that takes the write lock up front.
///
/// A deferred transaction that reads before it writes cannot wait for a
/// concurrent writer and fails with `SQLITE_BUSY`. Taking the lock at `BEGIN`
/// makes concurrent writers queue on the busy timeout instead.
pub async fn begin_write(pool: &DbPool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Run database migrations from the `migrations/` directory.
///
/// Applied migrations are tracked in the `_sqlx_migrations` table, so each
/// migration runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Number of migrations shipped with this build.
pub fn known_migrations() -> i64 {
    MIGRATOR.iter().filter(|m| !m.migration_type.is_down_migration()).count() as i64
}

/// Number of migrations successfully applied to the database.
pub async fn applied_migrations(pool: &DbPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
}
