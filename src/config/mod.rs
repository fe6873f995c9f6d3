// ABOUTME: Configuration module for server, database and authentication settings
// ABOUTME: All values come from environment variables with documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration
//!
//! - **Environment**: server port, deployment environment, composed config
//! - **Database**: `DATABASE_URL` and pool sizing
//! - **Security**: signing secret, token lifetimes, bcrypt cost

/// Database location and pool settings
pub mod database;
/// Server configuration from environment variables
pub mod environment;
/// Token and credential settings
pub mod security;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{Environment, ServerConfig};
pub use security::{AuthConfig, JwtSecret};
