// ABOUTME: SQLite persistence for generated training plans
// ABOUTME: Connection management and schema migration over a sqlx pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Database Management
//!
//! Plans are normalized across three tables: `running_plan` (header),
//! `daily_plan` (one row per training day, keyed by week/day position), and
//! `daily_meal` (three rows per day, keyed by meal slot). The position
//! columns, not insertion order, carry the calendar ordering.
//!
//! Each run opens its own connection, performs its writes, and closes it;
//! no state is shared across runs.

mod plans;

pub use plans::PlanSummary;

use sqlx::{Pool, Sqlite, SqlitePool};

use crate::errors::AppResult;

/// Database handle for plan storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open a database connection and ensure the schema exists
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains("memory")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS running_plan (
                id TEXT PRIMARY KEY,
                motivation TEXT NOT NULL,
                feedback TEXT NOT NULL,
                supplement_suggestion TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS daily_plan (
                id TEXT PRIMARY KEY,
                running_plan_id TEXT NOT NULL,
                week_number INTEGER NOT NULL,
                day_number INTEGER NOT NULL,
                day TEXT NOT NULL,
                titles TEXT NOT NULL,
                details TEXT NOT NULL,
                FOREIGN KEY (running_plan_id) REFERENCES running_plan (id) ON DELETE CASCADE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS daily_meal (
                id TEXT PRIMARY KEY,
                daily_plan_id TEXT NOT NULL,
                meal_slot TEXT NOT NULL,
                suggestion TEXT NOT NULL,
                calories TEXT NOT NULL,
                FOREIGN KEY (daily_plan_id) REFERENCES daily_plan (id) ON DELETE CASCADE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
