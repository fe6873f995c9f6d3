// ABOUTME: Unit-of-work guard that rolls back unless committed, plus transient-error retry
// ABOUTME: Retries re-run the whole unit only for SQLite busy/locked and pool timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction management
//!
//! - [`TransactionGuard`]: the scoped unit of work. `commit` or `rollback`
//!   consumes it; dropping it unconsumed lets `SQLx` roll the transaction back.
//! - [`retry_transaction`]: re-runs a complete unit of work with exponential
//!   backoff when the store reports a transient lock. Validation, constraint and
//!   authorization failures are returned immediately.

use std::future::Future;
use std::time::Duration;

use sqlx::{Sqlite, Transaction};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::errors::{AppError, AppResult, ErrorCode};

/// `SQLITE_BUSY`
const SQLITE_BUSY: i64 = 5;
/// `SQLITE_LOCKED`
const SQLITE_LOCKED: i64 = 6;

/// Run `f` until it succeeds, fails permanently, or `max_attempts` is reached
///
/// Backoff doubles from 20ms.
///
/// # Errors
///
/// Returns the last error when attempts run out, or the first non-transient error
pub async fn retry_transaction<F, Fut, T>(mut f: F, max_attempts: u32) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempts = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;
                if !is_transient(&e) {
                    return Err(e);
                }
                if attempts >= max_attempts {
                    error!(attempts, error = %e, "Unit of work still locked after max attempts");
                    return Err(e);
                }

                let backoff_ms = 10 * (1_u64 << attempts);
                warn!(
                    attempt = attempts,
                    max_attempts,
                    backoff_ms,
                    "Store busy, retrying unit of work after backoff"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// Whether an error is a lock or pool contention that a fresh attempt may clear
#[must_use]
pub fn is_transient(error: &AppError) -> bool {
    if error.code != ErrorCode::DatabaseError {
        return false;
    }

    if let Some(sqlx_error) = error
        .source
        .as_deref()
        .and_then(|source| source.downcast_ref::<sqlx::Error>())
    {
        return match sqlx_error {
            sqlx::Error::PoolTimedOut => true,
            sqlx::Error::Database(db_error) => db_error
                .code()
                .and_then(|code| code.parse::<i64>().ok())
                // Extended result codes keep the primary code in the low byte
                .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)),
            _ => false,
        };
    }

    let message = error.message.to_lowercase();
    message.contains("database is locked") || message.contains("database is busy")
}

/// Scoped unit of work over one `SQLite` transaction
pub struct TransactionGuard<'c> {
    transaction: Option<Transaction<'c, Sqlite>>,
}

impl<'c> TransactionGuard<'c> {
    /// Wrap a transaction obtained from `pool.begin()`
    #[must_use]
    pub fn new(transaction: Transaction<'c, Sqlite>) -> Self {
        Self {
            transaction: Some(transaction),
        }
    }

    /// Commit and consume the guard
    ///
    /// # Errors
    ///
    /// Returns a database error if the commit fails; the transaction is then
    /// rolled back by the store
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        tx.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Roll back explicitly and consume the guard
    ///
    /// # Errors
    ///
    /// Returns a database error if the rollback fails
    pub async fn rollback(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot roll back"))?;
        tx.rollback().await?;
        debug!("Unit of work rolled back");
        Ok(())
    }

    /// Connection to execute statements on inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an internal error if the guard was already consumed
    pub fn executor(&mut self) -> AppResult<&mut sqlx::SqliteConnection> {
        self.transaction
            .as_deref_mut()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            warn!("Unit of work dropped without commit - rolling back");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_only_database_errors_are_transient() {
        assert!(!is_transient(&AppError::invalid_field("bad count")));
        assert!(!is_transient(&AppError::database("UNIQUE constraint failed")));
        assert!(is_transient(&AppError::database("database is locked")));
        assert!(is_transient(
            &AppError::database("pool").with_source(sqlx::Error::PoolTimedOut)
        ));
        assert!(!is_transient(
            &AppError::database("row").with_source(sqlx::Error::RowNotFound)
        ));
    }

    #[tokio::test]
    async fn test_retry_stops_on_permanent_error() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = retry_transaction(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::invalid_field("nope")) }
            },
            3,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_lock() {
        let calls = AtomicU32::new(0);
        let result = retry_transaction(
            || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        Err(AppError::database("database is locked"))
                    } else {
                        Ok(attempt)
                    }
                }
            },
            3,
        )
        .await
        .unwrap();
        assert_eq!(result, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
