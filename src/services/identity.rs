// ABOUTME: Identity service: registration, login, refresh and access-token resolution
// ABOUTME: Every credential or token failure surfaces as the same generic AUTH_INVALID error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{
    generate_session_marker, hash_password, verify_password, AuthenticatedUser, TokenKind,
    TokenManager, VerifiedToken,
};
use crate::constants::error_messages::{INVALID_CREDENTIALS, INVALID_TOKEN};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CreateUserRequest, LoginRequest, LoginResponse, NewUser, RefreshRequest, TokenPair, User,
    UserRecord,
};
use crate::validation::{validate_email, validate_password, validate_username};

/// Registration, authentication and token lifecycle
#[derive(Clone)]
pub struct IdentityService {
    database: Database,
    tokens: Arc<TokenManager>,
    bcrypt_cost: u32,
}

impl IdentityService {
    /// Create the service over shared resources
    #[must_use]
    pub const fn new(database: Database, tokens: Arc<TokenManager>, bcrypt_cost: u32) -> Self {
        Self {
            database,
            tokens,
            bcrypt_cost,
        }
    }

    /// Register a new identity
    ///
    /// Username and email are stored lowercase.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FIELD` for malformed fields or `RESOURCE_ALREADY_EXISTS`
    /// naming the duplicate field
    pub async fn register(&self, request: &CreateUserRequest) -> AppResult<UserRecord> {
        let username = validate_username(&request.username)?;
        let email = validate_email(&request.email)?;
        validate_password(&request.password)?;

        let password_hash = hash_password(&request.password, self.bcrypt_cost).await?;
        let user = self
            .database
            .create_user(&NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        Ok(user.to_record())
    }

    /// Authenticate and open a new login session
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` for an unknown username or a wrong password
    pub async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let username = request.username.trim().to_lowercase();

        let Some(user) = self.database.get_user_by_username(&username).await? else {
            warn!("Login attempt for unknown identity");
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        };

        if !verify_password(&request.password, &user.password_hash).await? {
            warn!(user.id = user.id, "Login attempt with wrong password");
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        }

        let marker = generate_session_marker();
        let tokens = self.tokens.issue_pair(user.id, &user.username, &marker)?;
        info!(user.id = user.id, "Login succeeded");

        Ok(LoginResponse {
            tokens,
            user: user.to_record(),
        })
    }

    /// Exchange a refresh token for a new pair bound to the same session marker
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` for an invalid, expired or access-kind token, or
    /// when the identity no longer exists
    pub async fn refresh(&self, request: &RefreshRequest) -> AppResult<TokenPair> {
        let verified = self
            .tokens
            .verify_kind(&request.refresh_token, TokenKind::Refresh)?;

        let user = self.token_owner(&verified).await?;
        self.tokens
            .issue_pair(user.id, &user.username, &verified.session_marker)
    }

    /// Resolve a bearer access token to the calling identity
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` for an invalid, expired or refresh-kind token, or
    /// when the identity no longer exists
    pub async fn resolve_access_token(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let verified = self.tokens.verify_kind(token, TokenKind::Access)?;

        let user = self.token_owner(&verified).await?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
            session_marker: verified.session_marker,
        })
    }

    /// The live identity a verified token was issued to
    ///
    /// A username freed by account deletion may be registered again; tokens of
    /// the earlier identity carry its id and predate the new record.
    async fn token_owner(&self, verified: &VerifiedToken) -> AppResult<User> {
        let Some(user) = self.database.get_user_by_username(&verified.username).await? else {
            warn!(kind = %verified.kind, "Token for an identity that no longer exists");
            return Err(AppError::auth_invalid(INVALID_TOKEN));
        };

        if user.id != verified.user_id || verified.issued_at < user.created_at.timestamp() {
            warn!(
                kind = %verified.kind,
                token.user_id = verified.user_id,
                user.id = user.id,
                "Token issued to an earlier identity with this username"
            );
            return Err(AppError::auth_invalid(INVALID_TOKEN));
        }

        Ok(user)
    }

    /// Current identity record
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the identity was deleted concurrently
    pub async fn profile(&self, caller: &AuthenticatedUser) -> AppResult<UserRecord> {
        self.database
            .get_user(caller.user_id)
            .await?
            .map(|user| user.to_record())
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Delete the caller and every session they own
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the identity was already gone
    pub async fn delete_account(&self, caller: &AuthenticatedUser) -> AppResult<()> {
        if !self.database.delete_user(caller.user_id).await? {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }
}
