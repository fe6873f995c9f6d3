// ABOUTME: Session route handlers: submit, list own, list by owner, fetch and delete one
// ABOUTME: Sessions owned by another identity are reported as not found on item routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{authenticate, malformed_body, malformed_path};
use crate::errors::AppError;
use crate::models::SessionRequest;
use crate::resources::ServerResources;

/// Session routes
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/sessions",
                get(Self::handle_list_own).post(Self::handle_submit),
            )
            .route("/sessions/:user_id", get(Self::handle_list_for_owner))
            .route(
                "/sessions/item/:session_id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<SessionRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let caller = authenticate(&headers, &resources).await?;
        let Json(request) = payload.map_err(|e| malformed_body(&e))?;

        let session = resources.sessions.submit(&caller, &request).await?;
        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    async fn handle_list_own(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let caller = authenticate(&headers, &resources).await?;
        let sessions = resources.sessions.list_for_caller(&caller).await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    async fn handle_list_for_owner(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let caller = authenticate(&headers, &resources).await?;
        let Path(owner_id) = path.map_err(|e| malformed_path(&e))?;

        let sessions = resources.sessions.list_for_owner(&caller, owner_id).await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let caller = authenticate(&headers, &resources).await?;
        let Path(session_id) = path.map_err(|e| malformed_path(&e))?;

        let session = resources.sessions.get(&caller, session_id).await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let caller = authenticate(&headers, &resources).await?;
        let Path(session_id) = path.map_err(|e| malformed_path(&e))?;

        resources.sessions.delete(&caller, session_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
