// ABOUTME: Domain service layer shared by the HTTP routes and the import tool
// ABOUTME: Routes and binaries stay thin; business rules live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services are protocol-agnostic: the HTTP routes and the `import-session`
//! binary call the same operations, so both entry points get identical
//! validation and authorization.

/// Registration, login, refresh and token resolution
pub mod identity;

/// Session file loading for offline import
pub mod import;

/// Session ingestion pipeline and owner-scoped access
pub mod sessions;

pub use identity::IdentityService;
pub use import::{load_session_import, parse_session_envelope, SessionImport};
pub use sessions::SessionService;
