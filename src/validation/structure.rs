// ABOUTME: Structural validators enforcing cardinality limits on sessions and workouts
// ABOUTME: Failures carry the offending count and the limit it was checked against
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::limits::{
    MAX_SETS_PER_WORKOUT, MAX_TOTAL_SETS_PER_SESSION, MAX_WORKOUTS_PER_SESSION,
    MIN_SETS_PER_WORKOUT, MIN_WORKOUTS_PER_SESSION,
};
use crate::errors::{AppError, AppResult};

/// Check session-level cardinality
///
/// # Errors
///
/// Returns `LIMIT_EXCEEDED` when the session has no workouts, more than 50
/// workouts, or more than 500 sets summed across its workouts.
pub fn validate_session_limits(workout_count: usize, total_sets: usize) -> AppResult<()> {
    if workout_count < MIN_WORKOUTS_PER_SESSION {
        return Err(AppError::below_minimum(
            "Session must contain at least one workout",
            workout_count,
            MIN_WORKOUTS_PER_SESSION,
        ));
    }

    if workout_count > MAX_WORKOUTS_PER_SESSION {
        return Err(AppError::limit_exceeded(
            format!("Too many workouts in session (max {MAX_WORKOUTS_PER_SESSION})"),
            workout_count,
            MAX_WORKOUTS_PER_SESSION,
        ));
    }

    if total_sets > MAX_TOTAL_SETS_PER_SESSION {
        return Err(AppError::limit_exceeded(
            format!("Too many total sets in session (max {MAX_TOTAL_SETS_PER_SESSION})"),
            total_sets,
            MAX_TOTAL_SETS_PER_SESSION,
        ));
    }

    Ok(())
}

/// Check workout-level cardinality; `name` should already be sanitized
///
/// # Errors
///
/// Returns `LIMIT_EXCEEDED` when the workout has no sets or more than 100 sets.
pub fn validate_workout_limits(set_count: usize, name: &str) -> AppResult<()> {
    if set_count < MIN_SETS_PER_WORKOUT {
        return Err(AppError::below_minimum(
            format!("Workout '{name}' must contain at least one set"),
            set_count,
            MIN_SETS_PER_WORKOUT,
        ));
    }

    if set_count > MAX_SETS_PER_WORKOUT {
        return Err(AppError::limit_exceeded(
            format!("Too many sets in workout '{name}' (max {MAX_SETS_PER_WORKOUT})"),
            set_count,
            MAX_SETS_PER_WORKOUT,
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_session_limit_edges() {
        assert!(validate_session_limits(1, 1).is_ok());
        assert!(validate_session_limits(50, 500).is_ok());

        let err = validate_session_limits(51, 51).unwrap_err();
        assert_eq!(err.code, ErrorCode::LimitExceeded);
        assert_eq!(err.details["count"], 51);
        assert_eq!(err.details["limit"], 50);

        let err = validate_session_limits(10, 501).unwrap_err();
        assert_eq!(err.details["count"], 501);
        assert_eq!(err.details["limit"], 500);

        let err = validate_session_limits(0, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::LimitExceeded);
        assert_eq!(err.details["count"], 0);
        assert_eq!(err.details["minimum"], 1);
    }

    #[test]
    fn test_workout_limit_names_the_workout() {
        assert!(validate_workout_limits(100, "Squat").is_ok());

        let err = validate_workout_limits(101, "Squat").unwrap_err();
        assert_eq!(err.message, "Too many sets in workout 'Squat' (max 100)");

        let err = validate_workout_limits(0, "Row").unwrap_err();
        assert_eq!(err.code, ErrorCode::LimitExceeded);
        assert!(err.message.contains("'Row'"));
        assert_eq!(err.details["minimum"], 1);
    }
}
