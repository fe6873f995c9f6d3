// ABOUTME: Validation bounds, collection limits and token defaults re-exported from workout-core
// ABOUTME: Shared by validators, the schema and configuration defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use workout_core::constants::*;
