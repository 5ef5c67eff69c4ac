// ABOUTME: Library root for the stride-coach training plan generator
// ABOUTME: Wires config, LLM provider, plan model, persistence, and rendering modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Stride Coach
//!
//! Turns a wearable-device screenshot plus a free-text running goal into a
//! structured multi-week training-and-nutrition plan by calling a multimodal
//! LLM with a declared output schema, then persists and renders the result.
//!
//! The pipeline is strictly linear: image + goal → model call → validated
//! [`models::RunningPlan`] → console summary / HTML / JSON / SQLite rows.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stride_coach::app::CoachApp;
//! use stride_coach::config::CoachConfig;
//! use stride_coach::database::Database;
//! use stride_coach::llm::OpenAiCompatibleProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), stride_coach::errors::AppError> {
//!     let config = CoachConfig::from_env()?;
//!     let provider = OpenAiCompatibleProvider::new(config.llm.clone())?;
//!     let database = Database::new(&config.database_url).await?;
//!     let app = CoachApp::new(config, Box::new(provider), database);
//!     app.run().await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod database;
pub mod errors;
pub mod generator;
pub mod image;
pub mod llm;
pub mod logging;
pub mod models;
pub mod output;
