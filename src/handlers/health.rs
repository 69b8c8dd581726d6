//! Health check endpoint for service monitoring.

use crate::{db, db::DbPool, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` while migrations are missing
    pub status: &'static str,
    pub database: &'static str,
    pub migrations: MigrationStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MigrationStatus {
    pub applied: i64,
    pub pending: i64,
}

/// Health check handler.
///
/// Counts the applied schema migrations against the ones built into the
/// binary, so a database the server cannot serve from shows up as degraded
/// and an unreachable one as a 500.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "migrations": { "applied": 4, "pending": 0 },
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
pub async fn health_check(State(pool): State<DbPool>) -> Result<Json<HealthResponse>, AppError> {
    let applied = db::applied_migrations(&pool).await?;
    let pending = (db::known_migrations() - applied).max(0);

    if pending > 0 {
        tracing::warn!(applied, pending, "database schema is behind");
    }

    Ok(Json(HealthResponse {
        status: if pending == 0 { "healthy" } else { "degraded" },
        database: "connected",
        migrations: MigrationStatus { applied, pending },
        timestamp: Utc::now(),
    }))
}
