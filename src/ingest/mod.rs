// ABOUTME: Session ingestion pipeline types: entity graph and per-request stage tracking
// ABOUTME: Stages run Received through GraphBuilt and end in Persisted or Aborted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Entity graph builder
pub mod graph;

pub use graph::{build_session_graph, NewReps, NewSession, NewSet, NewWorkout};

/// Position of one submission in the ingestion pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    /// Payload decoded
    Received,
    /// Every scalar passed its validator
    FieldValidated,
    /// Every collection is within its limits
    StructureValidated,
    /// Declared owner matches the caller
    AuthorizedBinding,
    /// Persistence graph constructed
    GraphBuilt,
    /// Committed and reloaded
    Persisted,
    /// Rejected or rolled back; nothing was written
    Aborted,
}

impl IngestStage {
    /// Stage name as logged
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::FieldValidated => "field_validated",
            Self::StructureValidated => "structure_validated",
            Self::AuthorizedBinding => "authorized_binding",
            Self::GraphBuilt => "graph_built",
            Self::Persisted => "persisted",
            Self::Aborted => "aborted",
        }
    }

    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Persisted | Self::Aborted)
    }

    /// The stage that follows a successful step, if any
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::FieldValidated),
            Self::FieldValidated => Some(Self::StructureValidated),
            Self::StructureValidated => Some(Self::AuthorizedBinding),
            Self::AuthorizedBinding => Some(Self::GraphBuilt),
            Self::GraphBuilt => Some(Self::Persisted),
            Self::Persisted | Self::Aborted => None,
        }
    }
}

impl Display for IngestStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
