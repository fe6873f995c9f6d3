// ABOUTME: Application-wide constants for validation bounds, limits and tokens
// ABOUTME: Single source of truth shared by validators, schema and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bounds applied to individual scalar fields
pub mod fields {
    /// Maximum characters in a workout name
    pub const MAX_WORKOUT_NAME_CHARS: usize = 100;
    /// Maximum characters in session notes
    pub const MAX_NOTES_CHARS: usize = 1000;
    /// Default truncation applied by the text sanitizer
    pub const DEFAULT_SANITIZE_CHARS: usize = 1000;
    /// Smallest accepted rep count
    pub const MIN_REP_COUNT: u32 = 1;
    /// Largest accepted rep count
    pub const MAX_REP_COUNT: u32 = 1000;
    /// Largest accepted weight (unit is not modelled)
    pub const MAX_WEIGHT: u32 = 10_000;
    /// Timestamps must fall within this many months of the current time
    pub const TIMESTAMP_WINDOW_MONTHS: u32 = 12;
    /// Marker substituted for blocked SQL keyword sequences
    pub const BLOCKED_MARKER: &str = "[BLOCKED]";
}

/// Cardinality limits across collections
pub mod limits {
    /// Minimum workouts in a single session
    pub const MIN_WORKOUTS_PER_SESSION: usize = 1;
    /// Minimum sets in a single workout
    pub const MIN_SETS_PER_WORKOUT: usize = 1;
    /// Maximum workouts in a single session
    pub const MAX_WORKOUTS_PER_SESSION: usize = 50;
    /// Maximum sets in a single workout
    pub const MAX_SETS_PER_WORKOUT: usize = 100;
    /// Maximum sets summed over every workout of a session
    pub const MAX_TOTAL_SETS_PER_SESSION: usize = 500;
    /// Attempts made by the persistence coordinator on transient lock errors
    pub const MAX_WRITE_ATTEMPTS: u32 = 3;
}

/// Identity field bounds
pub mod identity {
    /// Minimum username length
    pub const MIN_USERNAME_CHARS: usize = 3;
    /// Maximum username length
    pub const MAX_USERNAME_CHARS: usize = 50;
    /// Maximum email length
    pub const MAX_EMAIL_CHARS: usize = 100;
    /// Minimum password length
    pub const MIN_PASSWORD_CHARS: usize = 8;
    /// bcrypt only consumes the first 72 bytes of a password
    pub const MAX_PASSWORD_BYTES: usize = 72;
}

/// Token issuance defaults
pub mod tokens {
    /// Access token lifetime: 7 days
    pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60 * 24 * 7;
    /// Refresh token lifetime: 30 days
    pub const REFRESH_TOKEN_EXPIRY_MINUTES: i64 = 60 * 24 * 30;
    /// Random bytes in a session marker before encoding
    pub const SESSION_MARKER_BYTES: usize = 32;
    /// Bytes in a generated signing secret
    pub const GENERATED_SECRET_BYTES: usize = 64;
    /// Token type reported to clients
    pub const TOKEN_TYPE_BEARER: &str = "bearer";
}

/// Service identification
pub mod service_names {
    /// Service name used in logs
    pub const WORKOUT_TRACKER: &str = "workout-tracker";
}

/// Caller-facing messages that must not vary with internal state
pub mod error_messages {
    /// Generic authentication failure (no username or existence disclosure)
    pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
    /// Generic token failure
    pub const INVALID_TOKEN: &str = "Could not validate credentials";
    /// Generic ownership failure
    pub const NOT_AUTHORIZED: &str = "Not authorized to access this resource";
}
