// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory resources, quiet logging, identity helpers and session payload builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `workout_tracker`

use std::sync::{Arc, Once};

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use workout_tracker::{
    auth::AuthenticatedUser,
    config::{AuthConfig, DatabaseConfig, JwtSecret},
    database::Database,
    models::{CreateUserRequest, LoginRequest, LoginResponse, SessionRequest},
    resources::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Lowest bcrypt cost the library accepts
pub const TEST_BCRYPT_COST: u32 = 4;

/// Password used for every test identity
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixed reference time so payload timestamps never drift out of the window
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// Auth settings with a fixed secret and the cheapest bcrypt cost
pub fn test_auth_config() -> AuthConfig {
    let mut auth = AuthConfig::with_secret(
        JwtSecret::new("integration-test-signing-secret-0123456789").unwrap(),
    );
    auth.bcrypt_cost = TEST_BCRYPT_COST;
    auth
}

/// Fresh in-memory store with the schema applied
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&DatabaseConfig::in_memory()).await?)
}

/// Fresh resources over an in-memory store
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(database, &test_auth_config())))
}

/// Register and log in `username`, returning the login response
pub async fn register_and_login(
    resources: &ServerResources,
    username: &str,
) -> Result<LoginResponse> {
    resources
        .identity
        .register(&CreateUserRequest {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password: TEST_PASSWORD.to_owned(),
        })
        .await?;

    Ok(resources
        .identity
        .login(&LoginRequest {
            username: username.to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await?)
}

/// Register, log in and resolve the access token into a caller
pub async fn create_caller(
    resources: &ServerResources,
    username: &str,
) -> Result<AuthenticatedUser> {
    let login = register_and_login(resources, username).await?;
    Ok(resources
        .identity
        .resolve_access_token(&login.tokens.access_token)
        .await?)
}

fn ts(base: DateTime<Utc>, offset_minutes: i64) -> String {
    (base + Duration::minutes(offset_minutes)).to_rfc3339()
}

/// One set lasting a minute starting `offset` minutes after `base`
pub fn set_json(base: DateTime<Utc>, offset: i64, count: Value, intensity: &str) -> Value {
    json!({
        "started_at": ts(base, offset),
        "finished_at": ts(base, offset + 1),
        "reps": { "count": count, "intensity": intensity, "weight": 60 }
    })
}

/// Workout with `sets` one-minute sets
pub fn workout_json(base: DateTime<Utc>, name: &str, sets: usize) -> Value {
    let sets: Vec<Value> = (0..sets)
        .map(|i| set_json(base, i as i64 * 2, json!(10), "medium"))
        .collect();
    json!({
        "name": name,
        "started_at": ts(base, 0),
        "finished_at": ts(base, 600),
        "sets": sets
    })
}

/// Session with `workouts` workouts of `sets_per_workout` sets each, started an hour before `now`
pub fn session_json(now: DateTime<Utc>, workouts: usize, sets_per_workout: usize) -> Value {
    let base = now - Duration::hours(1);
    let workouts: Vec<Value> = (0..workouts)
        .map(|i| workout_json(base, &format!("Workout {i}"), sets_per_workout))
        .collect();
    json!({
        "started_at": ts(base, 0),
        "finished_at": ts(base, 600),
        "notes": "Leg day",
        "workouts": workouts
    })
}

/// Typed request from a JSON payload
pub fn session_request(value: Value) -> SessionRequest {
    serde_json::from_value(value).unwrap()
}
