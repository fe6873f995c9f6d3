// ABOUTME: User identity models, registration/login payloads and token responses
// ABOUTME: Password hashes live only on the internal User type and are never serialized
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored identity including its credential digest
#[derive(Debug, Clone)]
pub struct User {
    /// Assigned identifier
    pub id: i64,
    /// Canonical (lowercase) username
    pub username: String,
    /// Canonical (lowercase) email
    pub email: String,
    /// bcrypt digest
    pub password_hash: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public view of this identity
    #[must_use]
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Identity as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Assigned identifier
    pub id: i64,
    /// Canonical (lowercase) username
    pub username: String,
    /// Canonical (lowercase) email
    pub email: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Identity ready for insertion
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Canonical (lowercase) username
    pub username: String,
    /// Canonical (lowercase) email
    pub email: String,
    /// bcrypt digest
    pub password_hash: String,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Requested username
    pub username: String,
    /// Contact email
    pub email: String,
    /// Plaintext password; hashed before storage
    pub password: String,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username, matched case-insensitively
    pub username: String,
    /// Plaintext password
    pub password: String,
}

/// Refresh payload
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// Previously issued refresh token
    pub refresh_token: String,
}

/// Access/refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived token for resource access
    pub access_token: String,
    /// Long-lived token accepted only by the refresh operation
    pub refresh_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// Successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Issued tokens
    #[serde(flatten)]
    pub tokens: TokenPair,
    /// Identity summary
    pub user: UserRecord,
}
