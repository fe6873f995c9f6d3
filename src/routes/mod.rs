// ABOUTME: HTTP route assembly for the workout tracker API
// ABOUTME: Thin handlers over the service layer plus request tracing and request-id layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to [`crate::services`]. Extraction failures are converted to
//! `MALFORMED_INPUT` so every error body has the same JSON shape.

/// Liveness endpoint
pub mod health;
/// Session submission and owner-scoped reads
pub mod sessions;
/// Registration, login, refresh and account routes
pub mod users;

pub use health::HealthRoutes;
pub use sessions::SessionRoutes;
pub use users::UserRoutes;

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{extract_bearer_token, AuthenticatedUser};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(SessionRoutes::routes(resources))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
}

/// Resolve the caller from `Authorization: Bearer <access token>`
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthenticatedUser> {
    let header_value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;

    let token = extract_bearer_token(header_value)?;
    resources.identity.resolve_access_token(token).await
}

/// Body that failed JSON extraction
pub(crate) fn malformed_body(rejection: &JsonRejection) -> AppError {
    AppError::malformed(rejection.body_text())
}

/// Path parameter that failed extraction
pub(crate) fn malformed_path(rejection: &PathRejection) -> AppError {
    AppError::malformed(rejection.body_text())
}
