// ABOUTME: Loads a session file for offline import and binds it to an existing user
// ABOUTME: The file is decoded and validated before any identity lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::auth::{generate_session_marker, AuthenticatedUser};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{SessionEnvelope, SessionRequest};
use crate::validation::validate_session_request;

/// A decoded session file and the identity it will be stored under
#[derive(Debug, Clone)]
pub struct SessionImport {
    /// Owner, acting as the caller for the ingestion pipeline
    pub owner: AuthenticatedUser,
    /// Payload from the file envelope
    pub session: SessionRequest,
}

/// Decode a `{"session": {...}}` envelope
///
/// # Errors
///
/// Returns `MALFORMED_INPUT` when the text is not a session envelope
pub fn parse_session_envelope(raw: &str) -> AppResult<SessionRequest> {
    serde_json::from_str::<SessionEnvelope>(raw)
        .map(|envelope| envelope.session)
        .map_err(|e| AppError::malformed(format!("Session file is not a valid session envelope: {e}")))
}

/// Read, decode and validate a session file, then resolve its owner by username
///
/// # Errors
///
/// Returns an internal error if the file cannot be read, `MALFORMED_INPUT` for
/// an undecodable file, the first validation failure, or `RESOURCE_NOT_FOUND`
/// for an unknown username
pub async fn load_session_import(
    database: &Database,
    path: &Path,
    username: &str,
    now: DateTime<Utc>,
) -> AppResult<SessionImport> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::internal(format!("Failed to read {}", path.display())).with_source(e)
    })?;

    let session = parse_session_envelope(&raw)?;
    validate_session_request(&session, now)?;

    let username = username.trim().to_lowercase();
    let user = database
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    debug!(user.id = user.id, file = %path.display(), "Session file bound to owner");

    Ok(SessionImport {
        owner: AuthenticatedUser {
            user_id: user.id,
            username: user.username,
            session_marker: generate_session_marker(),
        },
        session,
    })
}
