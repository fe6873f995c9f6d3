// ABOUTME: Registration field validators for usernames, emails and passwords
// ABOUTME: Usernames and emails are canonicalized to lowercase before any uniqueness check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::identity::{
    MAX_EMAIL_CHARS, MAX_PASSWORD_BYTES, MAX_USERNAME_CHARS, MIN_PASSWORD_CHARS,
    MIN_USERNAME_CHARS,
};
use crate::errors::{AppError, AppResult};

static USERNAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.\-]+$").ok());

/// Validate a username and return its canonical lowercase form
///
/// # Errors
///
/// Returns `INVALID_FIELD` for lengths outside 3..=50 or characters outside
/// `[a-z0-9_.-]` after lowercasing.
pub fn validate_username(username: &str) -> AppResult<String> {
    let username = username.trim().to_lowercase();
    let length = username.chars().count();

    if !(MIN_USERNAME_CHARS..=MAX_USERNAME_CHARS).contains(&length) {
        return Err(AppError::invalid_field(format!(
            "Username must be between {MIN_USERNAME_CHARS} and {MAX_USERNAME_CHARS} characters"
        )));
    }

    let allowed = USERNAME_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&username));
    if !allowed {
        return Err(AppError::invalid_field(
            "Username may only contain letters, digits, '_', '.' and '-'",
        ));
    }

    Ok(username)
}

/// Validate an email address and return its canonical lowercase form
///
/// # Errors
///
/// Returns `INVALID_FIELD` unless the address has one `@`, a non-empty local part
/// and a dotted domain, and is at most 100 characters.
pub fn validate_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();

    if email.chars().count() > MAX_EMAIL_CHARS {
        return Err(AppError::invalid_field(format!(
            "Email too long (max {MAX_EMAIL_CHARS} characters)"
        )));
    }

    let invalid = || AppError::invalid_field("Invalid email format");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(email)
}

/// Validate a plaintext password before hashing
///
/// # Errors
///
/// Returns `INVALID_FIELD` for fewer than 8 characters or more than 72 bytes.
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::invalid_field(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::invalid_field(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_canonicalized() {
        assert_eq!(validate_username(" ALICE ").unwrap(), "alice");
        assert_eq!(validate_username("j.doe-99_x").unwrap(), "j.doe-99_x");
        assert!(validate_username("al").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username("bob smith").is_err());
        assert!(validate_username("bob@home").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert_eq!(validate_email("A@X.com").unwrap(), "a@x.com");
        for bad in ["ax.com", "@x.com", "a@x", "a@@x.com", "a@x..com", "a b@x.com"] {
            assert!(validate_email(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("longenough1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(73)).is_err());
    }
}
