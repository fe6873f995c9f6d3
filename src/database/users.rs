// ABOUTME: Identity store operations: schema, creation with conflict detection, lookup, deletion
// ABOUTME: Usernames and emails are unique case-insensitively at the schema level too
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;

use super::{format_timestamp, parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User};

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE COLLATE NOCASE,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new identity
    ///
    /// Username conflicts are reported before email conflicts. A concurrent
    /// insert that wins the race is caught by the unique constraints and reported
    /// the same way.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` naming the conflicting field, or a
    /// database error
    pub async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(AppError::conflict("username"));
        }
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("email"));
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        let id = result.last_insert_rowid();
        info!(user.id = id, "Identity created");

        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::internal("Created identity could not be reloaded"))
    }

    /// Look up an identity by username, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row_to_user(&row))
        .transpose()
    }

    /// Look up an identity by email, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row_to_user(&row))
        .transpose()
    }

    /// Look up an identity by id
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        sqlx::query("SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row_to_user(&row))
            .transpose()
    }

    /// Delete an identity and, by cascade, every session it owns
    ///
    /// # Errors
    ///
    /// Returns a database error if the statement fails
    pub async fn delete_user(&self, user_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(user.id = user_id, "Identity deleted with all owned sessions");
        }
        Ok(deleted)
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let created_at: String = row.try_get("created_at")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Translate a lost uniqueness race into the same conflict the pre-check reports
fn map_unique_violation(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            let message = db_error.message();
            if message.contains("users.username") {
                return AppError::conflict("username");
            }
            if message.contains("users.email") {
                return AppError::conflict("email");
            }
        }
    }
    AppError::from(error)
}
