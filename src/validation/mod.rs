// ABOUTME: Field and structural validators for inbound session and identity payloads
// ABOUTME: Pure functions composed explicitly by the request pass and the graph builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Validation
//!
//! Validators are plain functions returning [`crate::errors::AppResult`]:
//!
//! - [`sanitize`]: free-text sanitizer
//! - [`fields`]: one scalar in, one normalized value out
//! - [`structure`]: cardinality limits on collections
//! - [`request`]: the parse-time pass over a whole session payload
//! - [`identity`]: registration fields

/// Scalar field validators
pub mod fields;
/// Registration field validators
pub mod identity;
/// Whole-request validation pass
pub mod request;
/// Free-text sanitizer
pub mod sanitize;
/// Cardinality validators
pub mod structure;

pub use fields::{
    validate_intensity, validate_notes, validate_rep_count, validate_time_order,
    validate_timestamp, validate_weight, validate_workout_name,
};
pub use identity::{validate_email, validate_password, validate_username};
pub use request::{validate_session_fields, validate_session_request, validate_session_structure};
pub use sanitize::sanitize_text;
pub use structure::{validate_session_limits, validate_workout_limits};
