// ABOUTME: Authentication configuration: token signing secret, token lifetimes and bcrypt cost
// ABOUTME: The signing secret is redacted from Debug output and never serialized
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use tracing::warn;

use super::environment::Environment;
use crate::constants::tokens::{
    ACCESS_TOKEN_EXPIRY_MINUTES, GENERATED_SECRET_BYTES, REFRESH_TOKEN_EXPIRY_MINUTES,
};
use crate::errors::{AppError, AppResult};

/// Token signing secret
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
    /// Wrap an explicit secret
    ///
    /// # Errors
    ///
    /// Returns a config error if the secret is blank
    pub fn new(secret: impl Into<String>) -> AppResult<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AppError::config("JWT_SECRET cannot be empty"));
        }
        Ok(Self(secret))
    }

    /// Random secret for development and test runs; tokens do not survive a restart
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; GENERATED_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Raw secret bytes for the signing key
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Debug for JwtSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("JwtSecret([REDACTED])")
    }
}

/// Authentication configuration for issued tokens and stored credentials
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signing secret for access and refresh tokens
    pub jwt_secret: JwtSecret,
    /// Access token lifetime in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token lifetime in minutes
    pub refresh_token_expiry_minutes: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Defaults with the given secret
    #[must_use]
    pub const fn with_secret(jwt_secret: JwtSecret) -> Self {
        Self {
            jwt_secret,
            access_token_expiry_minutes: ACCESS_TOKEN_EXPIRY_MINUTES,
            refresh_token_expiry_minutes: REFRESH_TOKEN_EXPIRY_MINUTES,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Load authentication configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing in production, or if any
    /// lifetime or cost value is invalid
    pub fn from_env(environment: Environment) -> AppResult<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => JwtSecret::new(secret)?,
            Err(_) if environment.is_production() => {
                return Err(AppError::config(
                    "JWT_SECRET must be set in production",
                ));
            }
            Err(_) => {
                warn!("JWT_SECRET not set, generating an ephemeral signing secret");
                JwtSecret::generate()
            }
        };

        let access_token_expiry_minutes =
            parse_positive_minutes("ACCESS_TOKEN_EXPIRY_MINUTES", ACCESS_TOKEN_EXPIRY_MINUTES)?;
        let refresh_token_expiry_minutes =
            parse_positive_minutes("REFRESH_TOKEN_EXPIRY_MINUTES", REFRESH_TOKEN_EXPIRY_MINUTES)?;

        let bcrypt_cost = env_var_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
            .parse::<u32>()
            .map_err(|e| AppError::config(format!("Invalid BCRYPT_COST value: {e}")))?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::config("BCRYPT_COST must be between 4 and 31"));
        }

        Ok(Self {
            jwt_secret,
            access_token_expiry_minutes,
            refresh_token_expiry_minutes,
            bcrypt_cost,
        })
    }
}

fn parse_positive_minutes(key: &str, default: i64) -> AppResult<i64> {
    let minutes = env_var_or(key, &default.to_string())
        .parse::<i64>()
        .map_err(|e| AppError::config(format!("Invalid {key} value: {e}")))?;
    if minutes <= 0 {
        return Err(AppError::config(format!("{key} must be positive")));
    }
    Ok(minutes)
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
