// ABOUTME: Shared server resources created once at startup and handed to every route
// ABOUTME: Holds the store, the token manager and the services built over them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::auth::TokenManager;
use crate::config::{AuthConfig, ServerConfig};
use crate::database::Database;
use crate::errors::AppResult;
use crate::services::{IdentityService, SessionService};

/// Process-wide resources; immutable after construction
#[derive(Clone)]
pub struct ServerResources {
    /// Session and identity store
    pub database: Database,
    /// Token issuer and verifier
    pub tokens: Arc<TokenManager>,
    /// Identity operations
    pub identity: IdentityService,
    /// Session operations
    pub sessions: SessionService,
}

impl ServerResources {
    /// Wire services over an open store
    #[must_use]
    pub fn new(database: Database, auth: &AuthConfig) -> Self {
        let tokens = Arc::new(TokenManager::from_config(auth));
        Self {
            identity: IdentityService::new(database.clone(), Arc::clone(&tokens), auth.bcrypt_cost),
            sessions: SessionService::new(database.clone()),
            database,
            tokens,
        }
    }

    /// Open the configured store and wire services over it
    ///
    /// # Errors
    ///
    /// Returns a database error if the store cannot be opened or migrated
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database).await?;
        Ok(Self::new(database, &config.auth))
    }
}
