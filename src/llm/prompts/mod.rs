// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the coaching system prompt used for plan generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy
//! maintenance.

/// Running coach system prompt
///
/// Instructs the model to derive the week count from the user's goal, comment
/// on the uploaded stats, and emit one schedule entry per week with three
/// meals per day.
pub const COACH_SYSTEM_PROMPT: &str = include_str!("coach_system.md");

/// Get the system prompt for plan generation
#[must_use]
pub const fn get_coach_system_prompt() -> &'static str {
    COACH_SYSTEM_PROMPT
}
