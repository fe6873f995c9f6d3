// ABOUTME: HS256 access and refresh token issuance and verification
// ABOUTME: Tokens carry the user id, username, token kind and an opaque session marker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Token Issuer / Verifier
//!
//! A [`TokenManager`] is built once from [`AuthConfig`] and shared read-only.
//! Verification failures are classified into [`TokenError`] for the logs; every
//! caller-facing failure is the same generic `AUTH_INVALID` error.

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::AuthConfig;
use crate::constants::error_messages::INVALID_TOKEN;
use crate::constants::tokens::{SESSION_MARKER_BYTES, TOKEN_TYPE_BEARER};
use crate::errors::{AppError, AppResult};
use crate::models::TokenPair;

/// Which operations a token may be presented to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Resource access
    Access,
    /// Token refresh only
    Refresh,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        })
    }
}

/// Claims embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Canonical username
    pub sub: String,
    /// Identifier of the user the token was issued to
    pub uid: i64,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
    /// Token kind
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Login session marker, unchanged across refreshes
    pub sid: String,
}

/// Successful verification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Identifier of the user the token was issued to
    pub user_id: i64,
    /// Canonical username
    pub username: String,
    /// Issued at (seconds since epoch)
    pub issued_at: i64,
    /// Token kind
    pub kind: TokenKind,
    /// Login session marker
    pub session_marker: String,
}

/// Reason a token was rejected; logged, never shown to callers
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// `exp` is in the past
    #[error("token expired")]
    Expired,
    /// Signature or claim check failed
    #[error("token invalid: {reason}")]
    Invalid {
        /// Library-level reason
        reason: String,
    },
    /// Not a well-formed token
    #[error("token malformed: {details}")]
    Malformed {
        /// Decoding failure details
        details: String,
    },
    /// Valid token presented to the wrong operation
    #[error("expected {expected} token, got {actual}")]
    WrongKind {
        /// Kind the operation accepts
        expected: TokenKind,
        /// Kind that was presented
        actual: TokenKind,
    },
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> Self {
        warn!(reason = %error, "Token rejected");
        Self::auth_invalid(INVALID_TOKEN)
    }
}

/// Fresh login session marker: 32 random bytes, URL-safe base64
#[must_use]
pub fn generate_session_marker() -> String {
    let mut bytes = [0u8; SESSION_MARKER_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Issues and verifies HS256 tokens with a single configured secret
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenManager {
    /// Build from explicit secret and lifetimes
    #[must_use]
    pub fn new(secret: &[u8], access_ttl_minutes: i64, refresh_ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::minutes(refresh_ttl_minutes),
        }
    }

    /// Build from authentication configuration
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.access_token_expiry_minutes,
            config.refresh_token_expiry_minutes,
        )
    }

    /// Issue one token
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        kind: TokenKind,
        session_marker: &str,
    ) -> AppResult<String> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: username.to_owned(),
            uid: user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
            sid: session_marker.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Issue an access/refresh pair sharing one session marker
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails
    pub fn issue_pair(
        &self,
        user_id: i64,
        username: &str,
        session_marker: &str,
    ) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(user_id, username, TokenKind::Access, session_marker)?,
            refresh_token: self.issue(user_id, username, TokenKind::Refresh, session_marker)?,
            token_type: TOKEN_TYPE_BEARER.to_owned(),
        })
    }

    /// Verify signature and expiry and return the embedded identity
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing why the token was rejected
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| convert_jwt_error(&e))?;

        Ok(VerifiedToken {
            user_id: data.claims.uid,
            username: data.claims.sub,
            issued_at: data.claims.iat,
            kind: data.claims.kind,
            session_marker: data.claims.sid,
        })
    }

    /// Verify and additionally require a specific kind
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::WrongKind`] for a valid token of the other kind
    pub fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<VerifiedToken, TokenError> {
        let verified = self.verify(token)?;
        if verified.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: verified.kind,
            });
        }
        Ok(verified)
    }
}

fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            TokenError::Malformed {
                details: e.to_string(),
            }
        }
        _ => TokenError::Invalid {
            reason: e.to_string(),
        },
    }
}
