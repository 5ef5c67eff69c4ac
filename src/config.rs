// ABOUTME: Environment-based configuration for the coach CLI
// ABOUTME: One explicit struct built at startup and passed by reference, no globals
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-only configuration management
//!
//! All settings come from environment variables (CLI flags may override them
//! after loading). Required values fail fast with [`crate::errors::ErrorCode::ConfigMissing`]
//! before any I/O is attempted.

use std::env;

use crate::errors::{AppError, AppResult};

/// Environment variable for the LLM API key
pub const LLM_API_KEY_ENV: &str = "STRIDE_LLM_API_KEY";

/// Environment variable for the LLM base URL
pub const LLM_BASE_URL_ENV: &str = "STRIDE_LLM_BASE_URL";

/// Environment variable for the LLM model name
pub const LLM_MODEL_ENV: &str = "STRIDE_LLM_MODEL";

/// Environment variable for the screenshot path
pub const IMAGE_PATH_ENV: &str = "STRIDE_IMAGE_PATH";

/// Environment variable for the goal text
pub const GOAL_ENV: &str = "STRIDE_GOAL";

/// Environment variable for the database URL
pub const DATABASE_URL_ENV: &str = "STRIDE_DATABASE_URL";

/// Environment variable for the HTML output path
pub const HTML_OUTPUT_ENV: &str = "STRIDE_HTML_OUTPUT";

/// Environment variable for the JSON output path
pub const JSON_OUTPUT_ENV: &str = "STRIDE_JSON_OUTPUT";

/// Default chat-completions endpoint
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default multimodal model
const DEFAULT_MODEL: &str = "gpt-4o";

/// Default screenshot filename
const DEFAULT_IMAGE_PATH: &str = "activity.png";

/// Default SQLite database URL
const DEFAULT_DATABASE_URL: &str = "sqlite:training_plans.sqlite";

/// Default HTML output path
const DEFAULT_HTML_OUTPUT: &str = "training_plan.html";

/// Default JSON output path
const DEFAULT_JSON_OUTPUT: &str = "training_plan.json";

/// Goal text shorter than this is rejected before any I/O
pub const MIN_GOAL_LENGTH: usize = 5;

/// Goal text longer than this is rejected before any I/O
pub const MAX_GOAL_LENGTH: usize = 500;

/// LLM endpoint configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// API key (optional for local OpenAI-compatible servers)
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
}

impl LlmConfig {
    /// Load the LLM endpoint settings from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(LLM_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            api_key: env::var(LLM_API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            model: env::var(LLM_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned()),
        }
    }

    /// Whether this endpoint is a local OpenAI-compatible server
    ///
    /// Local servers (Ollama, vLLM, `LocalAI`) do not require an API key.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.base_url.contains("localhost") || self.base_url.contains("127.0.0.1")
    }
}

/// Complete configuration for one coach run
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// LLM endpoint settings
    pub llm: LlmConfig,
    /// Path to the wearable-device screenshot
    pub image_path: String,
    /// Free-text running goal (required)
    pub goal: Option<String>,
    /// SQLite database URL
    pub database_url: String,
    /// HTML output path
    pub html_output: String,
    /// JSON output path
    pub json_output: String,
}

impl CoachConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] with `ConfigMissing` if the API key is absent for
    /// a non-local endpoint. The goal is checked later by [`Self::goal_text`]
    /// so a CLI flag can still supply it.
    pub fn from_env() -> AppResult<Self> {
        let llm = LlmConfig::from_env();

        if llm.api_key.is_none() && !llm.is_local() {
            return Err(AppError::config_missing(LLM_API_KEY_ENV));
        }

        Ok(Self {
            llm,
            image_path: env::var(IMAGE_PATH_ENV).unwrap_or_else(|_| DEFAULT_IMAGE_PATH.to_owned()),
            goal: env::var(GOAL_ENV).ok().filter(|g| !g.is_empty()),
            database_url: env::var(DATABASE_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            html_output: env::var(HTML_OUTPUT_ENV)
                .unwrap_or_else(|_| DEFAULT_HTML_OUTPUT.to_owned()),
            json_output: env::var(JSON_OUTPUT_ENV)
                .unwrap_or_else(|_| DEFAULT_JSON_OUTPUT.to_owned()),
        })
    }

    /// Return the validated goal text for this run
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` if no goal was provided, or `InvalidInput` if
    /// the goal is shorter than [`MIN_GOAL_LENGTH`] or longer than
    /// [`MAX_GOAL_LENGTH`] characters.
    pub fn goal_text(&self) -> AppResult<&str> {
        let goal = self
            .goal
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .ok_or_else(|| AppError::config_missing(GOAL_ENV))?;

        if goal.chars().count() < MIN_GOAL_LENGTH {
            return Err(AppError::invalid_input(format!(
                "goal text must be at least {MIN_GOAL_LENGTH} characters"
            )));
        }
        if goal.chars().count() > MAX_GOAL_LENGTH {
            return Err(AppError::invalid_input(format!(
                "goal text must be at most {MAX_GOAL_LENGTH} characters"
            )));
        }

        Ok(goal)
    }
}
