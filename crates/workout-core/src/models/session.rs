// ABOUTME: Session, workout, set and reps models for requests and persisted records
// ABOUTME: Defines the Intensity enum and the four-level ownership tree shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Effort level of a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Light effort
    Low,
    /// Moderate effort
    Medium,
    /// Hard effort
    High,
}

impl Intensity {
    /// All accepted values, in display order
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse an already-normalized (lowercase, trimmed) value
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Intensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Inbound reps payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepsRequest {
    /// Number of repetitions, validated as a whole number
    pub count: serde_json::Value,
    /// Effort level, matched case-insensitively
    pub intensity: String,
    /// Optional load, validated as a whole number
    #[serde(default)]
    pub weight: Option<serde_json::Value>,
}

/// Inbound set payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRequest {
    /// Exactly one reps record
    pub reps: RepsRequest,
    /// Set start
    pub started_at: String,
    /// Set end
    pub finished_at: String,
}

/// Inbound workout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRequest {
    /// Workout display name
    pub name: String,
    /// Workout start
    pub started_at: String,
    /// Workout end
    pub finished_at: String,
    /// Ordered sets
    pub sets: Vec<SetRequest>,
}

/// Inbound session payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Declared owner; must match the authenticated identity when present
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Session start
    pub started_at: String,
    /// Session end
    pub finished_at: String,
    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Ordered workouts
    pub workouts: Vec<WorkoutRequest>,
}

impl SessionRequest {
    /// Total number of sets across every workout
    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.workouts.iter().map(|w| w.sets.len()).sum()
    }
}

/// File/import envelope: `{"session": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionEnvelope {
    /// Wrapped session payload
    pub session: SessionRequest,
}

/// Persisted reps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepsRecord {
    /// Assigned identifier
    pub id: i64,
    /// Number of repetitions
    pub count: u32,
    /// Effort level
    pub intensity: Intensity,
    /// Optional load
    pub weight: Option<u32>,
}

/// Persisted set with its reps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Assigned identifier
    pub id: i64,
    /// Set start
    pub started_at: DateTime<Utc>,
    /// Set end
    pub finished_at: DateTime<Utc>,
    /// The set's single reps record
    pub reps: RepsRecord,
}

/// Persisted workout with its sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Assigned identifier
    pub id: i64,
    /// Sanitized name
    pub name: String,
    /// Workout start
    pub started_at: DateTime<Utc>,
    /// Workout end
    pub finished_at: DateTime<Utc>,
    /// Ordered sets
    pub sets: Vec<SetRecord>,
}

/// Persisted session with every descendant level populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Assigned identifier
    pub id: i64,
    /// Owning identity
    pub user_id: i64,
    /// Session start
    pub started_at: DateTime<Utc>,
    /// Session end
    pub finished_at: DateTime<Utc>,
    /// Sanitized notes
    pub notes: Option<String>,
    /// Ordered workouts
    pub workouts: Vec<WorkoutRecord>,
}

impl SessionRecord {
    /// Total number of sets across every workout
    #[must_use]
    pub fn total_sets(&self) -> usize {
        self.workouts.iter().map(|w| w.sets.len()).sum()
    }
}
