// ABOUTME: SQLite store for identities and the session → workout → set → reps ownership tree
// ABOUTME: Owns the connection pool, schema migration and shared row helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! One [`Database`] per process, cloned cheaply into request handlers. Foreign
//! keys are switched on for every pooled connection so that deleting an identity
//! or a session removes its whole subtree.

mod sessions;
/// Unit-of-work guard and transient-error retry
pub mod transactions;
mod users;

pub use sessions::{assemble_sessions, JoinedRow, SessionColumns, SetColumns, WorkoutColumns};
pub use transactions::{retry_transaction, TransactionGuard};

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::config::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};

/// Row counts per table, used by diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    /// Registered identities
    pub users: i64,
    /// Stored sessions
    pub sessions: i64,
    /// Stored workouts
    pub workouts: i64,
    /// Stored sets
    pub sets: i64,
    /// Stored reps
    pub reps: i64,
}

/// Database manager for identities and sessions
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect, create the schema if needed and return the store
    ///
    /// # Errors
    ///
    /// Returns a database error if the connection or migration fails
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.url.to_connection_string())?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);

        match &config.url {
            // Every in-memory connection is a separate database: keep exactly one alive
            DatabaseUrl::Memory => {
                pool_options = pool_options
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None);
            }
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                options = options.filename(path);
            }
        }

        let pool = pool_options.connect_with(options).await?;
        let db = Self { pool };
        db.migrate().await?;

        info!(database = %config.url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns a database error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_sessions().await?;
        Ok(())
    }

    /// Cheap liveness probe
    ///
    /// # Errors
    ///
    /// Returns a database error if the store cannot be queried
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Count rows in every table
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn entity_counts(&self) -> AppResult<EntityCounts> {
        let row = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM sessions) AS sessions,
                (SELECT COUNT(*) FROM workouts) AS workouts,
                (SELECT COUNT(*) FROM sets) AS sets,
                (SELECT COUNT(*) FROM reps) AS reps
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(EntityCounts {
            users: row.try_get("users")?,
            sessions: row.try_get("sessions")?,
            workouts: row.try_get("workouts")?,
            sets: row.try_get("sets")?,
            reps: row.try_get("reps")?,
        })
    }
}

/// Storage format for timestamps: fixed-width RFC 3339 in UTC, so text order is time order
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Corrupt stored timestamp '{raw}': {e}")))
}
