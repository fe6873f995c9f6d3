// ABOUTME: Data models for fitness sessions and user identities
// ABOUTME: Re-exports request payloads, persisted records and identity types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Two families of types live here:
//!
//! - **Requests** (`SessionRequest` and its children): untrusted, deserialized
//!   exactly as the client sent them. Numeric fields that must be validated as
//!   whole numbers are kept as raw JSON values so a wrong type surfaces as a field
//!   validation failure rather than a parse failure.
//! - **Records** (`SessionRecord` and its children): persisted, identifier-bearing
//!   values reloaded from storage and serialized in responses. Their shape mirrors
//!   the request shape so a response can be resubmitted.

mod session;
mod user;

pub use session::*;
pub use user::*;
