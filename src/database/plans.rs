// ABOUTME: Plan storage operations - atomic save, ordered load, cascading delete
// ABOUTME: Week/day/slot position columns carry calendar order through the round trip
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{DailyPlan, Meal, MealSlot, RunningPlan};

/// Header row of a stored plan
#[derive(Debug, Clone)]
pub struct PlanSummary {
    /// Generated plan identifier
    pub id: Uuid,
    /// Motivation message
    pub motivation: String,
    /// When the plan was stored
    pub created_at: DateTime<Utc>,
}

impl Database {
    /// Store a validated plan, returning its generated identifier
    ///
    /// All rows are written inside one transaction: either the complete plan
    /// is visible afterwards or none of it is.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails; nothing is committed in
    /// that case.
    pub async fn save_plan(&self, plan: &RunningPlan) -> AppResult<Uuid> {
        let plan_id = Uuid::new_v4();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            INSERT INTO running_plan (id, motivation, feedback, supplement_suggestion)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(plan_id.to_string())
        .bind(&plan.motivation)
        .bind(&plan.feedback)
        .bind(&plan.supplement_suggestion)
        .execute(&mut *tx)
        .await?;

        for (week_idx, week) in plan.plan.iter().enumerate() {
            for (day_idx, daily) in week.iter().enumerate() {
                let daily_id = Uuid::new_v4();

                sqlx::query(
                    r"
                    INSERT INTO daily_plan
                        (id, running_plan_id, week_number, day_number, day, titles, details)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ",
                )
                .bind(daily_id.to_string())
                .bind(plan_id.to_string())
                .bind(week_idx as i64 + 1)
                .bind(day_idx as i64 + 1)
                .bind(&daily.day)
                .bind(&daily.titles)
                .bind(&daily.details)
                .execute(&mut *tx)
                .await?;

                for slot in MealSlot::ALL {
                    let meal = daily.meal(slot);
                    sqlx::query(
                        r"
                        INSERT INTO daily_meal (id, daily_plan_id, meal_slot, suggestion, calories)
                        VALUES ($1, $2, $3, $4, $5)
                        ",
                    )
                    .bind(Uuid::new_v4().to_string())
                    .bind(daily_id.to_string())
                    .bind(slot.as_str())
                    .bind(&meal.suggestion)
                    .bind(&meal.calories)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;

        info!(
            "Stored plan {plan_id}: {} weeks, {} days",
            plan.week_count(),
            plan.total_days()
        );

        Ok(plan_id)
    }

    /// Load a stored plan, restoring week/day order from the position columns
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or the stored rows are
    /// inconsistent (e.g. a day missing one of its three meals).
    pub async fn load_plan(&self, plan_id: Uuid) -> AppResult<Option<RunningPlan>> {
        let header = sqlx::query(
            r"
            SELECT motivation, feedback, supplement_suggestion
            FROM running_plan WHERE id = $1
            ",
        )
        .bind(plan_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let daily_rows = sqlx::query(
            r"
            SELECT id, week_number, day_number, day, titles, details
            FROM daily_plan
            WHERE running_plan_id = $1
            ORDER BY week_number, day_number
            ",
        )
        .bind(plan_id.to_string())
        .fetch_all(self.pool())
        .await?;

        let mut weeks: Vec<Vec<DailyPlan>> = Vec::new();
        for row in daily_rows {
            let daily_id: String = row.try_get("id")?;
            let week_number: i64 = row.try_get("week_number")?;

            let (breakfast, lunch, dinner) = self.load_meals(&daily_id).await?;
            let daily = DailyPlan {
                day: row.try_get("day")?,
                titles: row.try_get("titles")?,
                details: row.try_get("details")?,
                breakfast,
                lunch,
                dinner,
            };

            // Rows arrive week by week; week_number is 1-based
            let week_idx = usize::try_from(week_number)
                .map_err(|_| AppError::database(format!("invalid week number {week_number}")))?
                .checked_sub(1)
                .ok_or_else(|| AppError::database("week numbers start at 1"))?;
            if week_idx >= weeks.len() {
                weeks.resize_with(week_idx + 1, Vec::new);
            }
            weeks[week_idx].push(daily);
        }

        Ok(Some(RunningPlan {
            motivation: header.try_get("motivation")?,
            feedback: header.try_get("feedback")?,
            supplement_suggestion: header.try_get("supplement_suggestion")?,
            plan: weeks,
        }))
    }

    /// Load the three meals for one daily entry
    async fn load_meals(&self, daily_id: &str) -> AppResult<(Meal, Meal, Meal)> {
        let rows = sqlx::query(
            r"
            SELECT meal_slot, suggestion, calories
            FROM daily_meal WHERE daily_plan_id = $1
            ",
        )
        .bind(daily_id)
        .fetch_all(self.pool())
        .await?;

        let mut breakfast = None;
        let mut lunch = None;
        let mut dinner = None;

        for row in rows {
            let slot_raw: String = row.try_get("meal_slot")?;
            let slot = MealSlot::parse(&slot_raw)
                .ok_or_else(|| AppError::database(format!("unknown meal slot `{slot_raw}`")))?;
            let meal = Meal {
                suggestion: row.try_get("suggestion")?,
                calories: row.try_get("calories")?,
            };
            match slot {
                MealSlot::Breakfast => breakfast = Some(meal),
                MealSlot::Lunch => lunch = Some(meal),
                MealSlot::Dinner => dinner = Some(meal),
            }
        }

        match (breakfast, lunch, dinner) {
            (Some(b), Some(l), Some(d)) => Ok((b, l, d)),
            _ => Err(AppError::database(format!(
                "daily entry {daily_id} is missing a meal slot"
            ))),
        }
    }

    /// Delete a plan and all dependent daily/meal rows
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any delete fails; the transaction rolls
    /// back in that case.
    pub async fn delete_plan(&self, plan_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            DELETE FROM daily_meal WHERE daily_plan_id IN (
                SELECT id FROM daily_plan WHERE running_plan_id = $1
            )
            ",
        )
        .bind(plan_id.to_string())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM daily_plan WHERE running_plan_id = $1")
            .bind(plan_id.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM running_plan WHERE id = $1")
            .bind(plan_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Deleted plan {plan_id}");
        Ok(())
    }

    /// List stored plan headers, newest first
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_plans(&self) -> AppResult<Vec<PlanSummary>> {
        let rows = sqlx::query(
            r"
            SELECT id, motivation, created_at
            FROM running_plan ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                let id_raw: String = row.try_get("id")?;
                let id = Uuid::parse_str(&id_raw)
                    .map_err(|e| AppError::database(format!("invalid plan id: {e}")))?;
                Ok(PlanSummary {
                    id,
                    motivation: row.try_get("motivation")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
