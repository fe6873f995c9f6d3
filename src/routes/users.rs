// ABOUTME: Identity route handlers: register, login, refresh, current user and account deletion
// ABOUTME: Delegates to IdentityService; bodies failing JSON extraction become MALFORMED_INPUT
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::{authenticate, malformed_body};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, LoginRequest, RefreshRequest};
use crate::resources::ServerResources;

/// Identity routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all identity routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/users", post(Self::handle_register))
            .route("/users/login", post(Self::handle_login))
            .route("/users/refresh", post(Self::handle_refresh))
            .route(
                "/users/me",
                get(Self::handle_me).delete(Self::handle_delete_me),
            )
            .with_state(resources)
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<CreateUserRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload.map_err(|e| malformed_body(&e))?;
        let user = resources.identity.register(&request).await?;
        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<LoginRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload.map_err(|e| malformed_body(&e))?;
        let response = resources.identity.login(&request).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RefreshRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload.map_err(|e| malformed_body(&e))?;
        let tokens = resources.identity.refresh(&request).await?;
        Ok((StatusCode::OK, Json(tokens)).into_response())
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let caller = authenticate(&headers, &resources).await?;
        let user = resources.identity.profile(&caller).await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }

    async fn handle_delete_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let caller = authenticate(&headers, &resources).await?;
        resources.identity.delete_account(&caller).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
