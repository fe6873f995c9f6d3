// ABOUTME: Entity graph builder turning a raw session payload into persistence-ready values
// ABOUTME: Re-runs every field and structural validator while constructing the tree
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use crate::errors::AppResult;
use crate::models::{Intensity, RepsRequest, SessionRequest, SetRequest, WorkoutRequest};
use crate::validation::request::validate_span;
use crate::validation::{
    validate_intensity, validate_notes, validate_rep_count, validate_session_limits,
    validate_weight, validate_workout_limits, validate_workout_name,
};

/// Normalized reps awaiting insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReps {
    /// Number of repetitions
    pub count: u32,
    /// Lowercase effort level
    pub intensity: Intensity,
    /// Optional load
    pub weight: Option<u32>,
}

/// Normalized set with its single reps record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSet {
    /// Set start (UTC)
    pub started_at: DateTime<Utc>,
    /// Set end (UTC)
    pub finished_at: DateTime<Utc>,
    /// Owned reps
    pub reps: NewReps,
}

/// Normalized workout with its ordered sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkout {
    /// Sanitized name
    pub name: String,
    /// Workout start (UTC)
    pub started_at: DateTime<Utc>,
    /// Workout end (UTC)
    pub finished_at: DateTime<Utc>,
    /// Owned sets, in submission order
    pub sets: Vec<NewSet>,
}

/// Complete session graph bound to its owner
///
/// Only [`build_session_graph`] produces a graph from user input, so every value
/// in it has passed the validators in this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// Owning identity
    pub user_id: i64,
    /// Session start (UTC)
    pub started_at: DateTime<Utc>,
    /// Session end (UTC)
    pub finished_at: DateTime<Utc>,
    /// Sanitized notes
    pub notes: Option<String>,
    /// Owned workouts, in submission order
    pub workouts: Vec<NewWorkout>,
}

impl NewSession {
    /// Total sets across every workout
    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.workouts.iter().map(|w| w.sets.len()).sum()
    }
}

/// Build the persistence graph for `request`, owned by `owner_id`
///
/// The session's own scalars and limits are checked before the depth-first walk
/// over workouts, sets and reps. The first failure aborts the build and no
/// partial graph is returned.
///
/// # Errors
///
/// Returns `INVALID_FIELD` or `LIMIT_EXCEEDED` for the first failing check
pub fn build_session_graph(
    request: &SessionRequest,
    owner_id: i64,
    now: DateTime<Utc>,
) -> AppResult<NewSession> {
    let (started_at, finished_at) =
        validate_span(&request.started_at, &request.finished_at, "Session", now)?;
    let notes = validate_notes(request.notes.as_deref())?;
    validate_session_limits(request.workouts.len(), request.total_sets())?;

    let workouts = request
        .workouts
        .iter()
        .map(|workout| build_workout(workout, now))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(NewSession {
        user_id: owner_id,
        started_at,
        finished_at,
        notes,
        workouts,
    })
}

fn build_workout(workout: &WorkoutRequest, now: DateTime<Utc>) -> AppResult<NewWorkout> {
    let name = validate_workout_name(&workout.name)?;
    validate_workout_limits(workout.sets.len(), &name)?;
    let (started_at, finished_at) =
        validate_span(&workout.started_at, &workout.finished_at, "Workout", now)?;

    let sets = workout
        .sets
        .iter()
        .map(|set| build_set(set, now))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(NewWorkout {
        name,
        started_at,
        finished_at,
        sets,
    })
}

fn build_set(set: &SetRequest, now: DateTime<Utc>) -> AppResult<NewSet> {
    let (started_at, finished_at) = validate_span(&set.started_at, &set.finished_at, "Set", now)?;
    Ok(NewSet {
        started_at,
        finished_at,
        reps: build_reps(&set.reps)?,
    })
}

fn build_reps(reps: &RepsRequest) -> AppResult<NewReps> {
    Ok(NewReps {
        count: validate_rep_count(&reps.count)?,
        intensity: validate_intensity(&reps.intensity)?,
        weight: validate_weight(reps.weight.as_ref())?,
    })
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

    fn payload() -> serde_json::Value {
        json!({
            "started_at": "2025-06-15T09:00:00",
            "finished_at": "2025-06-15T10:30:00",
            "notes": "  Push day  ",
            "workouts": [
                {
                    "name": "Bench Press",
                    "started_at": "2025-06-15T09:00:00",
                    "finished_at": "2025-06-15T09:40:00",
                    "sets": [
                        {
                            "started_at": "2025-06-15T09:00:00",
                            "finished_at": "2025-06-15T09:05:00",
                            "reps": {"count": 8, "intensity": "HIGH", "weight": 135}
                        },
                        {
                            "started_at": "2025-06-15T09:10:00",
                            "finished_at": "2025-06-15T09:15:00",
                            "reps": {"count": 10.0, "intensity": "Medium"}
                        }
                    ]
                },
                {
                    "name": "Dips",
                    "started_at": "2025-06-15T09:45:00",
                    "finished_at": "2025-06-15T10:30:00",
                    "sets": [
                        {
                            "started_at": "2025-06-15T09:45:00",
                            "finished_at": "2025-06-15T09:50:00",
                            "reps": {"count": 12, "intensity": "low", "weight": null}
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_builds_normalized_tree() {
        let request: SessionRequest = serde_json::from_value(payload()).unwrap();
        let graph = build_session_graph(&request, 7, now()).unwrap();

        assert_eq!(graph.user_id, 7);
        assert_eq!(graph.notes.as_deref(), Some("Push day"));
        assert_eq!(graph.workouts.len(), 2);
        assert_eq!(graph.total_sets(), 3);

        let bench = &graph.workouts[0];
        assert_eq!(bench.name, "Bench Press");
        assert_eq!(bench.sets[0].reps.intensity, Intensity::High);
        assert_eq!(bench.sets[0].reps.weight, Some(135));
        assert_eq!(bench.sets[1].reps.count, 10);
        assert_eq!(bench.sets[1].reps.weight, None);
        assert_eq!(graph.workouts[1].sets[0].reps.weight, None);
        assert_eq!(
            bench.sets[0].started_at,
            Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_deep_failure_aborts_whole_build() {
        let mut value = payload();
        value["workouts"][1]["sets"][0]["reps"]["count"] = json!(0);
        let request: SessionRequest = serde_json::from_value(value).unwrap();

        let err = build_session_graph(&request, 7, now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidField);
    }

    #[test]
    fn test_builder_enforces_limits_without_prior_pass() {
        let mut value = payload();
        let set = value["workouts"][0]["sets"][0].clone();
        value["workouts"][0]["sets"] = json!(vec![set; 101]);
        let request: SessionRequest = serde_json::from_value(value).unwrap();

        let err = build_session_graph(&request, 7, now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::LimitExceeded);
        assert!(err.message.contains("'Bench Press'"));
    }
}
