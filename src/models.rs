// ABOUTME: Session graph and identity models re-exported from workout-core
// ABOUTME: Request DTOs, persisted records and token responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use workout_core::models::*;
