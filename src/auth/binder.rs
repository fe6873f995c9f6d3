// ABOUTME: Authorization binder tying session payloads and read requests to the caller
// ABOUTME: Mismatched owners fail with one generic PERMISSION_DENIED error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::warn;

use super::AuthenticatedUser;
use crate::constants::error_messages::NOT_AUTHORIZED;
use crate::errors::{AppError, AppResult};

/// Resolve the owner of an inbound session
///
/// An absent declared owner binds to the caller. A declared owner that differs
/// from the caller is rejected; ownership is never reassigned.
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` on mismatch
pub fn bind_session_owner(caller: &AuthenticatedUser, declared_owner: Option<i64>) -> AppResult<i64> {
    match declared_owner {
        Some(owner) if owner != caller.user_id => {
            warn!(
                user.id = caller.user_id,
                declared_owner = owner,
                "Session payload declares a different owner"
            );
            Err(AppError::forbidden(NOT_AUTHORIZED))
        }
        _ => Ok(caller.user_id),
    }
}

/// Check that a read targets the caller's own identity
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` on mismatch
pub fn authorize_owner_read(caller: &AuthenticatedUser, requested_owner: i64) -> AppResult<()> {
    if requested_owner != caller.user_id {
        warn!(
            user.id = caller.user_id,
            requested_owner, "Read of another identity's sessions refused"
        );
        return Err(AppError::forbidden(NOT_AUTHORIZED));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn caller(user_id: i64) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            username: "alice".into(),
            session_marker: "marker".into(),
        }
    }

    #[test]
    fn test_bind_defaults_and_matches() {
        assert_eq!(bind_session_owner(&caller(1), None).unwrap(), 1);
        assert_eq!(bind_session_owner(&caller(1), Some(1)).unwrap(), 1);
        let err = bind_session_owner(&caller(1), Some(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_read_scope() {
        assert!(authorize_owner_read(&caller(5), 5).is_ok());
        let err = authorize_owner_read(&caller(5), 6).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
