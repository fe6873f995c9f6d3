// ABOUTME: Scalar field validators for names, notes, intensity, counts, weights and timestamps
// ABOUTME: Each validator maps one raw value to a normalized value or an INVALID_FIELD error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Field validators
//!
//! Pure functions of the form `(raw) -> AppResult<normalized>`. They are composed
//! explicitly by the request-level pass and again by the entity graph builder;
//! nothing invokes them implicitly.

use std::sync::LazyLock;

use chrono::{DateTime, Months, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

use super::sanitize::sanitize_text;
use crate::constants::fields::{
    MAX_NOTES_CHARS, MAX_REP_COUNT, MAX_WEIGHT, MAX_WORKOUT_NAME_CHARS, MIN_REP_COUNT,
    TIMESTAMP_WINDOW_MONTHS,
};
use crate::errors::{AppError, AppResult};
use crate::models::Intensity;

/// Letters, digits, whitespace, hyphen, underscore, parentheses
static WORKOUT_NAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_()]+$").ok());

/// Naive date-time layouts accepted in addition to RFC 3339
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Validate and sanitize a workout name
///
/// # Errors
///
/// Returns `INVALID_FIELD` if the name is blank, longer than 100 characters, or
/// contains characters outside the allow-list.
pub fn validate_workout_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_field("Workout name cannot be empty"));
    }

    if name.chars().count() > MAX_WORKOUT_NAME_CHARS {
        return Err(AppError::invalid_field(format!(
            "Workout name too long (max {MAX_WORKOUT_NAME_CHARS} characters)"
        )));
    }

    let allowed = WORKOUT_NAME_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name));
    if !allowed {
        return Err(AppError::invalid_field(
            "Workout name contains invalid characters",
        ));
    }

    Ok(sanitize_text(name, MAX_WORKOUT_NAME_CHARS))
}

/// Validate and sanitize optional session notes
///
/// Blank notes, and notes that sanitize down to nothing, become `None`.
///
/// # Errors
///
/// Returns `INVALID_FIELD` if the trimmed notes exceed 1000 characters.
pub fn validate_notes(notes: Option<&str>) -> AppResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_CHARS {
        return Err(AppError::invalid_field(format!(
            "Notes too long (max {MAX_NOTES_CHARS} characters)"
        )));
    }

    let sanitized = sanitize_text(notes, MAX_NOTES_CHARS);
    Ok(Some(sanitized).filter(|s| !s.is_empty()))
}

/// Validate an intensity level, case-insensitively
///
/// # Errors
///
/// Returns `INVALID_FIELD` unless the value is `low`, `medium` or `high`.
pub fn validate_intensity(intensity: &str) -> AppResult<Intensity> {
    if intensity.trim().is_empty() {
        return Err(AppError::invalid_field("Intensity cannot be empty"));
    }

    Intensity::parse(&intensity.trim().to_lowercase()).ok_or_else(|| {
        let allowed: Vec<&str> = Intensity::ALL.iter().map(Intensity::as_str).collect();
        AppError::invalid_field(format!(
            "Invalid intensity '{intensity}'. Must be one of: {}",
            allowed.join(", ")
        ))
    })
}

/// Validate a rep count
///
/// # Errors
///
/// Returns `INVALID_FIELD` unless the value is a whole number in `[1, 1000]`.
pub fn validate_rep_count(count: &Value) -> AppResult<u32> {
    let count = whole_number(count)
        .ok_or_else(|| AppError::invalid_field("Rep count must be an integer"))?;

    if count < i64::from(MIN_REP_COUNT) {
        return Err(AppError::invalid_field(format!(
            "Rep count must be at least {MIN_REP_COUNT}"
        )));
    }
    if count > i64::from(MAX_REP_COUNT) {
        return Err(AppError::invalid_field(format!(
            "Rep count too high (max {MAX_REP_COUNT})"
        )));
    }

    Ok(count as u32)
}

/// Validate an optional weight
///
/// JSON `null` is treated the same as an absent weight.
///
/// # Errors
///
/// Returns `INVALID_FIELD` unless the value is absent or a whole number in `[0, 10000]`.
pub fn validate_weight(weight: Option<&Value>) -> AppResult<Option<u32>> {
    let Some(weight) = weight.filter(|w| !w.is_null()) else {
        return Ok(None);
    };

    let weight =
        whole_number(weight).ok_or_else(|| AppError::invalid_field("Weight must be an integer"))?;

    if weight < 0 {
        return Err(AppError::invalid_field("Weight cannot be negative"));
    }
    if weight > i64::from(MAX_WEIGHT) {
        return Err(AppError::invalid_field(format!(
            "Weight too high (max {MAX_WEIGHT})"
        )));
    }

    Ok(Some(weight as u32))
}

/// Validate a timestamp and normalize it to UTC
///
/// RFC 3339 values keep their offset before conversion; naive values are read as
/// UTC. The result must lie within twelve calendar months of `now`.
///
/// # Errors
///
/// Returns `INVALID_FIELD` if the value does not parse or falls outside the window.
pub fn validate_timestamp(raw: &str, label: &str, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let timestamp = parse_timestamp(raw.trim())
        .ok_or_else(|| AppError::invalid_field(format!("{label} must be a valid datetime")))?;

    let window = Months::new(TIMESTAMP_WINDOW_MONTHS);
    let earliest = now.checked_sub_months(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let latest = now.checked_add_months(window).unwrap_or(DateTime::<Utc>::MAX_UTC);

    if timestamp < earliest {
        return Err(AppError::invalid_field(format!(
            "{label} cannot be more than a year in the past"
        )));
    }
    if timestamp > latest {
        return Err(AppError::invalid_field(format!(
            "{label} cannot be more than a year in the future"
        )));
    }

    Ok(timestamp)
}

/// Require `end` to be strictly after `start`
///
/// # Errors
///
/// Returns `INVALID_FIELD` naming `label` when `end <= start`.
pub fn validate_time_order(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    label: &str,
) -> AppResult<()> {
    if end <= start {
        return Err(AppError::invalid_field(format!(
            "{label} must finish after it starts"
        )));
    }
    Ok(())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Integers, and floats without a fractional part; everything else is rejected
fn whole_number(value: &Value) -> Option<i64> {
    let number = value.as_number()?;
    if let Some(integer) = number.as_i64() {
        return Some(integer);
    }
    let float = number.as_f64()?;
    // Bounds keep the cast exact; callers apply the real limits afterwards
    if float.fract() == 0.0 && float.abs() < 1e15 {
        return Some(float as i64);
    }
    None
}
