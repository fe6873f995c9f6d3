// ABOUTME: bcrypt password hashing and verification on the blocking thread pool
// ABOUTME: Keeps the async executor free while the work factor runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};

/// Hash a plaintext password with the given bcrypt cost
///
/// # Errors
///
/// Returns an internal error if the blocking task or bcrypt fails
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))
}

/// Check a plaintext password against a stored digest
///
/// A malformed digest counts as a mismatch.
///
/// # Errors
///
/// Returns an internal error if the blocking task fails
pub async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
}
