// ABOUTME: Session service running the ingestion pipeline and owner-scoped reads and deletes
// ABOUTME: Logs every pipeline stage and the terminal Persisted or Aborted state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::auth::{authorize_owner_read, bind_session_owner, AuthenticatedUser};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::ingest::{build_session_graph, IngestStage};
use crate::models::{SessionRequest, SessionRecord};
use crate::validation::{validate_session_fields, validate_session_structure};

/// Tracks one submission through the pipeline
struct IngestRun {
    user_id: i64,
    stage: IngestStage,
}

impl IngestRun {
    fn start(user_id: i64) -> Self {
        debug!(user.id = user_id, stage = %IngestStage::Received, "Session submission received");
        Self {
            user_id,
            stage: IngestStage::Received,
        }
    }

    /// Move to `reached`, which must be the stage directly after the current one
    fn advance(&mut self, reached: IngestStage) -> AppResult<()> {
        if self.stage.is_terminal() {
            return Err(AppError::internal(format!(
                "Ingest run already {}, cannot reach {reached}",
                self.stage
            )));
        }
        if self.stage.next() != Some(reached) {
            error!(user.id = self.user_id, from = %self.stage, to = %reached, "Ingest stage skipped");
            return Err(AppError::internal(format!(
                "Ingest stage {reached} cannot follow {}",
                self.stage
            )));
        }

        debug!(user.id = self.user_id, from = %self.stage, to = %reached, "Ingest stage reached");
        self.stage = reached;
        Ok(())
    }

    fn abort(&mut self, error: &AppError) {
        warn!(
            user.id = self.user_id,
            stage = %IngestStage::Aborted,
            failed_after = %self.stage,
            code = ?error.code,
            reason = %error.message,
            "Session submission aborted, nothing persisted"
        );
        self.stage = IngestStage::Aborted;
    }
}

/// Session ingestion and owner-scoped access
#[derive(Clone)]
pub struct SessionService {
    database: Database,
}

impl SessionService {
    /// Create the service over the shared store
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Validate, bind, build and persist a session for the caller
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FIELD`, `LIMIT_EXCEEDED`, `PERMISSION_DENIED` or a
    /// database error; in every case nothing is persisted
    pub async fn submit(
        &self,
        caller: &AuthenticatedUser,
        request: &SessionRequest,
    ) -> AppResult<SessionRecord> {
        self.submit_at(caller, request, Utc::now()).await
    }

    /// [`Self::submit`] with an explicit reference time for the timestamp window
    ///
    /// # Errors
    ///
    /// See [`Self::submit`]
    pub async fn submit_at(
        &self,
        caller: &AuthenticatedUser,
        request: &SessionRequest,
        now: DateTime<Utc>,
    ) -> AppResult<SessionRecord> {
        let mut run = IngestRun::start(caller.user_id);

        match self.run_pipeline(&mut run, caller, request, now).await {
            Ok(record) => {
                info!(
                    user.id = caller.user_id,
                    session.id = record.id,
                    stage = %IngestStage::Persisted,
                    "Session submission persisted"
                );
                Ok(record)
            }
            Err(error) => {
                run.abort(&error);
                Err(error)
            }
        }
    }

    async fn run_pipeline(
        &self,
        run: &mut IngestRun,
        caller: &AuthenticatedUser,
        request: &SessionRequest,
        now: DateTime<Utc>,
    ) -> AppResult<SessionRecord> {
        validate_session_fields(request, now)?;
        run.advance(IngestStage::FieldValidated)?;

        validate_session_structure(request)?;
        run.advance(IngestStage::StructureValidated)?;

        let owner_id = bind_session_owner(caller, request.user_id)?;
        run.advance(IngestStage::AuthorizedBinding)?;

        let graph = build_session_graph(request, owner_id, now)?;
        run.advance(IngestStage::GraphBuilt)?;

        let record = self.database.persist_session_graph(&graph).await?;
        run.advance(IngestStage::Persisted)?;
        Ok(record)
    }

    /// Every session the caller owns
    ///
    /// # Errors
    ///
    /// Returns a database error if the read fails
    pub async fn list_for_caller(&self, caller: &AuthenticatedUser) -> AppResult<Vec<SessionRecord>> {
        self.database.list_sessions_for_user(caller.user_id).await
    }

    /// Sessions of an explicitly named owner, which must be the caller
    ///
    /// # Errors
    ///
    /// Returns `PERMISSION_DENIED` before any read when `owner_id` is not the caller
    pub async fn list_for_owner(
        &self,
        caller: &AuthenticatedUser,
        owner_id: i64,
    ) -> AppResult<Vec<SessionRecord>> {
        authorize_owner_read(caller, owner_id)?;
        self.database.list_sessions_for_user(owner_id).await
    }

    /// One of the caller's sessions
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` whether the session is missing or owned by
    /// someone else
    pub async fn get(&self, caller: &AuthenticatedUser, session_id: i64) -> AppResult<SessionRecord> {
        self.database
            .get_session(session_id, caller.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session"))
    }

    /// Delete one of the caller's sessions with its subtree
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` whether the session is missing or owned by
    /// someone else
    pub async fn delete(&self, caller: &AuthenticatedUser, session_id: i64) -> AppResult<()> {
        if !self.database.delete_session(session_id, caller.user_id).await? {
            return Err(AppError::not_found("Session"));
        }
        info!(user.id = caller.user_id, session.id = session_id, "Session deleted");
        Ok(())
    }
}
