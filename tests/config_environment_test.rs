// ABOUTME: Tests for environment-driven server, database and authentication configuration
// ABOUTME: Serialized because each test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use serial_test::serial;
use workout_tracker::{
    config::{DatabaseUrl, Environment, ServerConfig},
    errors::ErrorCode,
    logging::{LogFormat, LoggingConfig},
};

const CONFIG_VARS: [&str; 10] = [
    "ENVIRONMENT",
    "HTTP_PORT",
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "JWT_SECRET",
    "ACCESS_TOKEN_EXPIRY_MINUTES",
    "REFRESH_TOKEN_EXPIRY_MINUTES",
    "BCRYPT_COST",
    "LOG_FORMAT",
    "LOG_INCLUDE_LOCATION",
];

fn clear_config_env() {
    for key in CONFIG_VARS {
        env::remove_var(key);
    }
}

#[test]
fn test_database_url_parsing() {
    assert_eq!(
        DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
        DatabaseUrl::Memory
    );
    assert_eq!(
        DatabaseUrl::parse_url("sqlite:./data/test.db").unwrap(),
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/test.db")
        }
    );
    assert_eq!(
        DatabaseUrl::parse_url("/var/lib/workouts.db").unwrap(),
        DatabaseUrl::SQLite {
            path: PathBuf::from("/var/lib/workouts.db")
        }
    );
    assert!(DatabaseUrl::parse_url("postgresql://localhost/db").is_err());
    assert!(DatabaseUrl::parse_url("  ").is_err());
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8081);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(
        config.database.url.to_connection_string(),
        "sqlite:./data/workouts.db"
    );
    assert_eq!(config.auth.access_token_expiry_minutes, 60 * 24 * 7);
    assert_eq!(config.auth.refresh_token_expiry_minutes, 60 * 24 * 30);
    assert_eq!(config.auth.bcrypt_cost, 12);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_config_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("JWT_SECRET", "configured-secret-value");
    env::set_var("ACCESS_TOKEN_EXPIRY_MINUTES", "15");
    env::set_var("BCRYPT_COST", "6");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    assert_eq!(config.http_port, 9090);
    assert!(config.database.url.is_memory());
    assert_eq!(config.auth.access_token_expiry_minutes, 15);
    assert_eq!(config.auth.bcrypt_cost, 6);
    assert_eq!(config.auth.jwt_secret.as_bytes(), b"configured-secret-value");
}

#[test]
#[serial]
fn test_production_requires_jwt_secret() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "production");

    let err = ServerConfig::from_env().unwrap_err();
    clear_config_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
    assert!(err.message.contains("JWT_SECRET"));
}

#[test]
#[serial]
fn test_invalid_values_are_config_errors() {
    for (key, value) in [
        ("HTTP_PORT", "not-a-port"),
        ("DATABASE_MAX_CONNECTIONS", "0"),
        ("ACCESS_TOKEN_EXPIRY_MINUTES", "-5"),
        ("BCRYPT_COST", "2"),
        ("JWT_SECRET", "   "),
    ] {
        clear_config_env();
        env::set_var(key, value);

        let result = ServerConfig::from_env();
        clear_config_env();

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError, "{key}={value}");
    }
}

#[test]
#[serial]
fn test_summary_never_contains_secret() {
    clear_config_env();
    env::set_var("JWT_SECRET", "super-secret-signing-key");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    let summary = config.summary();
    assert!(summary.contains("HTTP Port: 8081"));
    assert!(!summary.contains("super-secret-signing-key"));
    assert!(!format!("{config:?}").contains("super-secret-signing-key"));
}

#[test]
#[serial]
fn test_logging_config_from_environment() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "production");
    let production = LoggingConfig::from_env();

    env::set_var("LOG_FORMAT", "compact");
    env::set_var("LOG_INCLUDE_LOCATION", "true");
    let compact = LoggingConfig::from_env();
    clear_config_env();

    assert_eq!(production.format, LogFormat::Json);
    assert_eq!(compact.format, LogFormat::Compact);
    assert!(compact.include_location);
}
