// ABOUTME: Plan data model shared by the LLM boundary, persistence, and rendering
// ABOUTME: Meal, DailyPlan, and RunningPlan plus structural validation with field paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plan Data Model
//!
//! The nested shapes returned by the model call and carried end-to-end:
//! a [`RunningPlan`] holds weeks, each week holds ordered [`DailyPlan`]s,
//! each day holds three [`Meal`]s. The same shapes are used to declare the
//! model output schema and to validate the returned payload.
//!
//! Validation is structural and total: a payload either conforms exactly or
//! is rejected with an error naming the first non-conforming field path
//! (e.g. `plan[0][2].breakfast.suggestion`). There is no best-effort
//! acceptance of partially-typed data.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::errors::{AppError, AppResult};

/// One meal recommendation
///
/// Calories stay free text so model output like "≈450 kcal" never fails
/// parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Name/description of the suggested meal
    pub suggestion: String,
    /// Calorie estimate as returned by the model
    pub calories: String,
}

/// One calendar day's training activity plus its three meals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// Day label (e.g. "Monday" or "Day 3")
    pub day: String,
    /// Session title
    pub titles: String,
    /// Session details
    pub details: String,
    /// Breakfast recommendation
    pub breakfast: Meal,
    /// Lunch recommendation
    pub lunch: Meal,
    /// Dinner recommendation
    pub dinner: Meal,
}

/// One week's ordered daily plans
pub type WeeklyPlan = Vec<DailyPlan>;

/// Complete multi-week training-and-nutrition plan for one goal/image pair
///
/// The outer `plan` sequence indexes weeks, the inner sequence indexes days
/// within a week. Day ordering is calendar order and is preserved through
/// storage and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningPlan {
    /// Motivation message for the athlete
    pub motivation: String,
    /// Feedback derived from the uploaded screenshot stats
    pub feedback: String,
    /// Supplement recommendations
    pub supplement_suggestion: String,
    /// Weeks of daily plans, in calendar order
    pub plan: Vec<WeeklyPlan>,
}

impl RunningPlan {
    /// Number of weeks in the plan
    #[must_use]
    pub fn week_count(&self) -> usize {
        self.plan.len()
    }

    /// Total number of training days across all weeks
    #[must_use]
    pub fn total_days(&self) -> usize {
        self.plan.iter().map(Vec::len).sum()
    }

    /// Validate an untyped payload into a `RunningPlan`
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] with `ValidationFailed` naming the first
    /// non-conforming field path. Rejects missing fields, wrong nesting
    /// depth, an empty top-level `plan`, and empty weeks.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        let root = as_object(value, "$")?;

        let plan_value = require(root, "$", "plan")?;
        let weeks_raw = as_array(plan_value, "$.plan")?;
        if weeks_raw.is_empty() {
            return Err(AppError::validation("$.plan", "plan has no weeks"));
        }

        let mut weeks = Vec::with_capacity(weeks_raw.len());
        for (week_idx, week_value) in weeks_raw.iter().enumerate() {
            let week_path = format!("plan[{week_idx}]");
            let days_raw = as_array(week_value, &week_path)?;
            if days_raw.is_empty() {
                return Err(AppError::validation(&week_path, "week has no days"));
            }

            let mut days = Vec::with_capacity(days_raw.len());
            for (day_idx, day_value) in days_raw.iter().enumerate() {
                let day_path = format!("{week_path}[{day_idx}]");
                days.push(daily_plan_from_value(day_value, &day_path)?);
            }
            weeks.push(days);
        }

        Ok(Self {
            motivation: text_field(root, "$", "motivation")?,
            feedback: text_field(root, "$", "feedback")?,
            supplement_suggestion: text_field(root, "$", "supplement_suggestion")?,
            plan: weeks,
        })
    }

    /// JSON schema declared to the model to constrain its output
    ///
    /// Uses the strict subset accepted by OpenAI-compatible
    /// `response_format: json_schema` endpoints (all fields required,
    /// `additionalProperties: false`).
    #[must_use]
    pub fn response_schema() -> Value {
        let meal = json!({
            "type": "object",
            "properties": {
                "suggestion": { "type": "string" },
                "calories": { "type": "string" }
            },
            "required": ["suggestion", "calories"],
            "additionalProperties": false
        });

        let daily_plan = json!({
            "type": "object",
            "properties": {
                "day": { "type": "string" },
                "titles": { "type": "string" },
                "details": { "type": "string" },
                "breakfast": meal.clone(),
                "lunch": meal.clone(),
                "dinner": meal
            },
            "required": ["day", "titles", "details", "breakfast", "lunch", "dinner"],
            "additionalProperties": false
        });

        json!({
            "type": "object",
            "properties": {
                "motivation": { "type": "string" },
                "feedback": { "type": "string" },
                "supplement_suggestion": { "type": "string" },
                "plan": {
                    "type": "array",
                    "items": {
                        "type": "array",
                        "items": daily_plan
                    }
                }
            },
            "required": ["motivation", "feedback", "supplement_suggestion", "plan"],
            "additionalProperties": false
        })
    }
}

/// Meal slot discriminator used by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    /// First meal of the day
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
}

impl MealSlot {
    /// All slots in day order
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    /// String form used in database rows
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }

    /// Parse the database string form
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DailyPlan {
    /// The meal occupying the given slot
    #[must_use]
    pub const fn meal(&self, slot: MealSlot) -> &Meal {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn as_object<'a>(value: &'a Value, path: &str) -> AppResult<&'a serde_json::Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| AppError::validation(path, "expected an object"))
}

fn as_array<'a>(value: &'a Value, path: &str) -> AppResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| AppError::validation(path, "expected an array"))
}

fn require<'a>(
    obj: &'a serde_json::Map<String, Value>,
    path: &str,
    name: &str,
) -> AppResult<&'a Value> {
    obj.get(name).ok_or_else(|| {
        AppError::validation(join_path(path, name), "missing required field")
    })
}

/// Extract a text field, coercing bare numbers to their string form
fn text_field(obj: &serde_json::Map<String, Value>, path: &str, name: &str) -> AppResult<String> {
    let field_path = join_path(path, name);
    let value = require(obj, path, name)?;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AppError::validation(field_path, "expected text")),
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path == "$" {
        format!("$.{name}")
    } else {
        format!("{path}.{name}")
    }
}

fn meal_from_value(value: &Value, path: &str) -> AppResult<Meal> {
    let obj = as_object(value, path)?;
    let suggestion = text_field(obj, path, "suggestion")?;
    if suggestion.trim().is_empty() {
        return Err(AppError::validation(
            join_path(path, "suggestion"),
            "suggestion must not be empty",
        ));
    }
    Ok(Meal {
        suggestion,
        calories: text_field(obj, path, "calories")?,
    })
}

fn daily_plan_from_value(value: &Value, path: &str) -> AppResult<DailyPlan> {
    let obj = as_object(value, path)?;
    Ok(DailyPlan {
        day: text_field(obj, path, "day")?,
        titles: text_field(obj, path, "titles")?,
        details: text_field(obj, path, "details")?,
        breakfast: meal_from_value(require(obj, path, "breakfast")?, &join_path(path, "breakfast"))?,
        lunch: meal_from_value(require(obj, path, "lunch")?, &join_path(path, "lunch"))?,
        dinner: meal_from_value(require(obj, path, "dinner")?, &join_path(path, "dinner"))?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn minimal_payload() -> Value {
        json!({
            "motivation": "Keep moving",
            "feedback": "Solid base mileage",
            "supplement_suggestion": "Electrolytes on long runs",
            "plan": [[{
                "day": "Monday",
                "titles": "Easy run",
                "details": "5k at conversational pace",
                "breakfast": { "suggestion": "Oatmeal", "calories": "350 kcal" },
                "lunch": { "suggestion": "Chicken salad", "calories": "500 kcal" },
                "dinner": { "suggestion": "Salmon and rice", "calories": "600 kcal" }
            }]]
        })
    }

    #[test]
    fn test_accepts_minimal_payload() {
        let plan = RunningPlan::from_value(&minimal_payload()).expect("minimal payload conforms");
        assert_eq!(plan.week_count(), 1);
        assert_eq!(plan.total_days(), 1);
        assert_eq!(plan.plan[0][0].breakfast.suggestion, "Oatmeal");
    }

    #[test]
    fn test_rejects_missing_meal_with_path() {
        let mut payload = minimal_payload();
        payload["plan"][0][0]
            .as_object_mut()
            .expect("day is object")
            .remove("breakfast");

        let error = RunningPlan::from_value(&payload).expect_err("missing breakfast");
        assert!(error.message.contains("plan[0][0].breakfast"), "{error}");
    }

    #[test]
    fn test_rejects_empty_plan() {
        let mut payload = minimal_payload();
        payload["plan"] = json!([]);
        let error = RunningPlan::from_value(&payload).expect_err("empty plan");
        assert!(error.message.contains("$.plan"), "{error}");
    }

    #[test]
    fn test_rejects_empty_week() {
        let mut payload = minimal_payload();
        payload["plan"] = json!([[]]);
        let error = RunningPlan::from_value(&payload).expect_err("empty week");
        assert!(error.message.contains("plan[0]"), "{error}");
    }

    #[test]
    fn test_rejects_wrong_nesting() {
        let mut payload = minimal_payload();
        // Days directly under plan instead of nested per week
        payload["plan"] = json!([{
            "day": "Monday", "titles": "Run", "details": "5k",
            "breakfast": { "suggestion": "Oats", "calories": "350" },
            "lunch": { "suggestion": "Salad", "calories": "500" },
            "dinner": { "suggestion": "Fish", "calories": "600" }
        }]);
        let error = RunningPlan::from_value(&payload).expect_err("wrong nesting");
        assert!(error.message.contains("expected an array"), "{error}");
    }

    #[test]
    fn test_rejects_empty_suggestion() {
        let mut payload = minimal_payload();
        payload["plan"][0][0]["lunch"]["suggestion"] = json!("  ");
        let error = RunningPlan::from_value(&payload).expect_err("blank suggestion");
        assert!(error.message.contains("plan[0][0].lunch.suggestion"), "{error}");
    }

    #[test]
    fn test_coerces_numeric_calories() {
        let mut payload = minimal_payload();
        payload["plan"][0][0]["dinner"]["calories"] = json!(600);
        let plan = RunningPlan::from_value(&payload).expect("numeric calories coerce");
        assert_eq!(plan.plan[0][0].dinner.calories, "600");
    }

    #[test]
    fn test_json_round_trip() {
        let plan = RunningPlan::from_value(&minimal_payload()).expect("valid payload");
        let serialized = serde_json::to_string(&plan).expect("serialize");
        let restored: RunningPlan = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(restored, plan);
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = RunningPlan::response_schema();
        let required = schema["required"].as_array().expect("required list");
        assert_eq!(required.len(), 4);
        assert_eq!(schema["additionalProperties"], json!(false));
    }
}
