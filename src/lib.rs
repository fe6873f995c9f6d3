// ABOUTME: Main library entry point for the workout tracker API
// ABOUTME: Validated ingestion and owner-scoped retrieval of nested workout sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy.
#![deny(unsafe_code)]

//! # Workout Tracker
//!
//! An HTTP backend that accepts nested workout sessions (session, workouts,
//! sets, reps), validates them in two passes, binds them to the authenticated
//! identity and persists the whole graph atomically.
//!
//! ## Architecture
//!
//! - **Validation**: pure field and structure checks, no I/O
//! - **Ingest**: converts a validated request into an insertable graph
//! - **Database**: `SQLite` store with all-or-nothing graph writes
//! - **Services**: registration, login, submission and owner-scoped reads
//! - **Routes**: thin axum handlers over the services
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use workout_tracker::config::ServerConfig;
//! use workout_tracker::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Workout tracker configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests (tests/).

/// Token issuance, password hashing and owner binding
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application constants and validation bounds
pub mod constants;

/// Session and identity store
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Conversion of validated requests into insertable session graphs
pub mod ingest;

/// Production logging and structured output
pub mod logging;

/// Session graph and identity data models
pub mod models;

/// Shared server resources handed to every route
pub mod resources;

/// `HTTP` routes for identity and session endpoints
pub mod routes;

/// Identity and session services
pub mod services;

/// Field and structural validators
pub mod validation;
