// ABOUTME: Authentication and authorization: tokens, credentials and ownership binding
// ABOUTME: Resolves bearer access tokens to the calling identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Ownership checks for session writes and reads
pub mod binder;
/// bcrypt hashing on the blocking pool
pub mod password;
/// HS256 token issuance and verification
pub mod tokens;

pub use binder::{authorize_owner_read, bind_session_owner};
pub use password::{hash_password, verify_password};
pub use tokens::{
    generate_session_marker, Claims, TokenError, TokenKind, TokenManager, VerifiedToken,
};

use crate::constants::error_messages::INVALID_TOKEN;
use crate::errors::{AppError, AppResult};

/// Identity resolved from a valid access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identity identifier
    pub user_id: i64,
    /// Canonical username
    pub username: String,
    /// Login session marker carried by the token
    pub session_marker: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// # Errors
///
/// Returns `AUTH_INVALID` for a missing scheme or empty token
pub fn extract_bearer_token(header_value: &str) -> AppResult<&str> {
    let (scheme, token) = header_value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AppError::auth_invalid(INVALID_TOKEN))?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AppError::auth_invalid(INVALID_TOKEN));
    }
    Ok(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert_eq!(extract_bearer_token("bearer  abc ").unwrap(), "abc");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer").is_err());
        assert!(extract_bearer_token("Bearer   ").is_err());
    }
}
