// ABOUTME: Request-level validation pass over a raw session payload
// ABOUTME: Runs every field validator first and every structural validator second
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use super::fields::{
    validate_intensity, validate_notes, validate_rep_count, validate_time_order,
    validate_timestamp, validate_weight, validate_workout_name,
};
use super::structure::{validate_session_limits, validate_workout_limits};
use crate::errors::AppResult;
use crate::models::{RepsRequest, SessionRequest, SetRequest, WorkoutRequest};

/// Validated start and end of one timed entity
pub(crate) fn validate_span(
    started_at: &str,
    finished_at: &str,
    label: &str,
    now: DateTime<Utc>,
) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = validate_timestamp(started_at, &format!("{label} start time"), now)?;
    let end = validate_timestamp(finished_at, &format!("{label} end time"), now)?;
    validate_time_order(start, end, label)?;
    Ok((start, end))
}

/// Validate a whole session payload as received
///
/// This is the parse-time pass. The entity graph builder repeats the same checks
/// on its own when it constructs persistence values.
///
/// # Errors
///
/// Returns the first `INVALID_FIELD` found by the field pass, otherwise the first
/// `LIMIT_EXCEEDED` found by the structural pass.
pub fn validate_session_request(request: &SessionRequest, now: DateTime<Utc>) -> AppResult<()> {
    validate_session_fields(request, now)?;
    validate_session_structure(request)
}

/// Field pass: every scalar in the payload, depth first
///
/// # Errors
///
/// Returns the first `INVALID_FIELD`
pub fn validate_session_fields(request: &SessionRequest, now: DateTime<Utc>) -> AppResult<()> {
    validate_span(&request.started_at, &request.finished_at, "Session", now)?;
    validate_notes(request.notes.as_deref())?;

    for workout in &request.workouts {
        validate_workout_fields(workout, now)?;
    }
    Ok(())
}

fn validate_workout_fields(workout: &WorkoutRequest, now: DateTime<Utc>) -> AppResult<()> {
    validate_workout_name(&workout.name)?;
    validate_span(&workout.started_at, &workout.finished_at, "Workout", now)?;

    for set in &workout.sets {
        validate_set_fields(set, now)?;
    }
    Ok(())
}

fn validate_set_fields(set: &SetRequest, now: DateTime<Utc>) -> AppResult<()> {
    validate_span(&set.started_at, &set.finished_at, "Set", now)?;
    validate_reps_fields(&set.reps)
}

fn validate_reps_fields(reps: &RepsRequest) -> AppResult<()> {
    validate_rep_count(&reps.count)?;
    validate_intensity(&reps.intensity)?;
    validate_weight(reps.weight.as_ref())?;
    Ok(())
}

/// Structural pass: session and per-workout cardinality
///
/// # Errors
///
/// Returns the first `LIMIT_EXCEEDED`, or `INVALID_FIELD` for a workout name that
/// cannot be sanitized for the message
pub fn validate_session_structure(request: &SessionRequest) -> AppResult<()> {
    validate_session_limits(request.workouts.len(), request.total_sets())?;

    for workout in &request.workouts {
        let name = validate_workout_name(&workout.name)?;
        validate_workout_limits(workout.sets.len(), &name)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn request(sets_per_workout: &[usize]) -> SessionRequest {
        let workouts: Vec<_> = sets_per_workout
            .iter()
            .map(|&count| {
                json!({
                    "name": "Squat",
                    "started_at": "2025-06-15T09:00:00Z",
                    "finished_at": "2025-06-15T10:00:00Z",
                    "sets": (0..count).map(|_| json!({
                        "started_at": "2025-06-15T09:00:00Z",
                        "finished_at": "2025-06-15T09:05:00Z",
                        "reps": {"count": 10, "intensity": "medium", "weight": 100}
                    })).collect::<Vec<_>>()
                })
            })
            .collect();

        serde_json::from_value(json!({
            "started_at": "2025-06-15T09:00:00Z",
            "finished_at": "2025-06-15T10:00:00Z",
            "workouts": workouts,
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_session_request(&request(&[3, 2]), now()).is_ok());
    }

    #[test]
    fn test_field_errors_win_over_structure_errors() {
        let mut req = request(&[0]);
        req.workouts[0].name = "bad;name".into();
        let err = validate_session_request(&req, now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidField);
    }

    #[test]
    fn test_empty_workout_is_structural() {
        let err = validate_session_request(&request(&[2, 0]), now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::LimitExceeded);
    }

    #[test]
    fn test_set_time_order_is_labelled() {
        let mut req = request(&[1]);
        req.workouts[0].sets[0].finished_at = "2025-06-15T08:00:00Z".into();
        let err = validate_session_request(&req, now()).unwrap_err();
        assert_eq!(err.message, "Set must finish after it starts");
    }
}
