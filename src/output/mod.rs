// ABOUTME: Output generation for validated plans - HTML and JSON documents
// ABOUTME: Atomic file writes so partial output is never visible as complete
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Output Generators
//!
//! Renderers take a read-only view of a validated [`RunningPlan`] and never
//! mutate it. Files are written to a temporary path in the destination
//! directory and renamed into place, so a failure mid-write leaves no
//! half-complete file behind.

mod html;
mod json;

pub use html::render_html;
pub use json::render_json;

use std::io::Write;
use std::path::Path;

use crate::errors::{AppError, AppResult};
use crate::models::RunningPlan;

/// Write contents to a file atomically (temp file + rename)
///
/// # Errors
///
/// Returns `StorageError` if the temporary file cannot be created, written,
/// or persisted to the destination path.
pub fn write_atomic(path: impl AsRef<Path>, contents: &str) -> AppResult<()> {
    let path = path.as_ref();
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());

    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .map_err(|e| AppError::storage(format!("cannot create temp file: {e}")))?;

    tmp.write_all(contents.as_bytes())
        .map_err(|e| AppError::storage(format!("cannot write {}: {e}", path.display())))?;

    tmp.persist(path)
        .map_err(|e| AppError::storage(format!("cannot persist {}: {e}", path.display())))?;

    Ok(())
}

/// Compact console summary printed after a successful generation
#[must_use]
pub fn plan_summary(plan: &RunningPlan) -> String {
    let mut out = String::new();
    out.push_str("Your training plan is ready\n");
    out.push_str(&format!(
        "  {} weeks, {} training days\n\n",
        plan.week_count(),
        plan.total_days()
    ));
    out.push_str(&format!("Motivation: {}\n", plan.motivation));
    out.push_str(&format!("Feedback:   {}\n", plan.feedback));
    out.push_str(&format!("Supplements: {}\n", plan.supplement_suggestion));
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::models::{DailyPlan, Meal};

    pub(super) fn sample_plan(weeks: usize, days_per_week: usize) -> RunningPlan {
        let meal = |name: &str| Meal {
            suggestion: name.to_owned(),
            calories: "500 kcal".to_owned(),
        };
        let plan = (0..weeks)
            .map(|w| {
                (0..days_per_week)
                    .map(|d| DailyPlan {
                        day: format!("Week {} day {}", w + 1, d + 1),
                        titles: "Easy run".to_owned(),
                        details: "5k conversational".to_owned(),
                        breakfast: meal("Oatmeal"),
                        lunch: meal("Salad"),
                        dinner: meal("Pasta"),
                    })
                    .collect()
            })
            .collect();
        RunningPlan {
            motivation: "Keep going".to_owned(),
            feedback: "Good base".to_owned(),
            supplement_suggestion: "Electrolytes".to_owned(),
            plan,
        }
    }

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.html");
        write_atomic(&path, "<html></html>").expect("write succeeds");
        assert_eq!(
            std::fs::read_to_string(&path).expect("readable"),
            "<html></html>"
        );
    }

    #[test]
    fn test_summary_mentions_counts() {
        let summary = plan_summary(&sample_plan(8, 7));
        assert!(summary.contains("8 weeks"));
        assert!(summary.contains("56 training days"));
    }
}
