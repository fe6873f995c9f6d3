// ABOUTME: Environment-based server configuration loaded once at startup
// ABOUTME: Composes HTTP port, deployment environment, database and authentication settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

use tracing::info;

use super::database::DatabaseConfig;
use super::security::AuthConfig;
use crate::errors::{AppError, AppResult};

/// Default HTTP listen port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        };
        f.write_str(name)
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Session store settings
    pub database: DatabaseConfig,
    /// Token and credential settings
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but invalid, or if a
    /// production deployment lacks `JWT_SECRET`
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let environment =
            Environment::from_str_or_default(&env::var("ENVIRONMENT").unwrap_or_default());

        let http_port = env::var("HTTP_PORT")
            .map_or(Ok(DEFAULT_HTTP_PORT), |raw| raw.parse::<u16>())
            .map_err(|e| AppError::config(format!("Invalid HTTP_PORT value: {e}")))?;

        Ok(Self {
            http_port,
            environment,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env(environment)?,
        })
    }

    /// Human-readable configuration summary; never includes secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Workout Tracker Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Max Connections: {}\n\
             - Access Token Lifetime: {} min\n\
             - Refresh Token Lifetime: {} min\n\
             - bcrypt Cost: {}",
            self.http_port,
            self.environment,
            self.database.url,
            self.database.max_connections,
            self.auth.access_token_expiry_minutes,
            self.auth.refresh_token_expiry_minutes,
            self.auth.bcrypt_cost,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default(""), Environment::Development);
        assert!(Environment::Production.is_production());
    }
}
