// ABOUTME: Unified error handling re-exported from workout-core
// ABOUTME: AppError, ErrorCode and the JSON error envelope rendered by every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use workout_core::errors::*;
