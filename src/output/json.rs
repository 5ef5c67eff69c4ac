// ABOUTME: JSON export of a validated training plan
// ABOUTME: Field names and week/day ordering survive the round trip losslessly
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{AppError, AppResult};
use crate::models::RunningPlan;

/// Serialize a plan as a pretty-printed JSON document
///
/// The output parses back into an equal `RunningPlan`
/// (`parse(serialize(x)) == x`).
///
/// # Errors
///
/// Returns `InternalError` if serialization fails (it cannot for a valid
/// plan, but the contract is explicit).
pub fn render_json(plan: &RunningPlan) -> AppResult<String> {
    serde_json::to_string_pretty(plan)
        .map_err(|e| AppError::internal(format!("plan serialization failed: {e}")))
}
