// ABOUTME: Unified error handling for stride-coach
// ABOUTME: Defines error codes per failure category and the AppError carrier type
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling
//!
//! Every failure in the pipeline maps to exactly one [`ErrorCode`] category so
//! the CLI can print a single clear message and exit non-zero. None of these
//! errors are retried or swallowed; each aborts the current run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Configuration (1000-1999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 1000,
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 1001,

    // Input validation (2000-2999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 2000,

    // External model call (3000-3999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 3000,
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 3001,
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 3002,

    // Schema validation of the model response (4000-4999)
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed = 4000,

    // Persistence and file output (9000-9999)
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9000,
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9001,
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9002,
}

impl ErrorCode {
    /// User-facing description of this error category
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ConfigError => "Configuration error",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InvalidInput => "Invalid input",
            Self::ExternalServiceError => "The model service returned an error",
            Self::ExternalAuthFailed => "Authentication with the model service failed",
            Self::ExternalRateLimited => "The model service rate limit was exceeded",
            Self::ValidationFailed => "The model response does not conform to the plan schema",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "File output failed",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {message}", .code.description())]
pub struct AppError {
    /// Error category
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration value is missing
    pub fn config_missing(key: &str) -> Self {
        Self::new(ErrorCode::ConfigMissing, format!("{key} is not set"))
    }

    /// Invalid user input (goal text, image file)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// External model service failure
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Authentication with the external service failed
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalAuthFailed, message)
    }

    /// Schema validation failure, naming the first non-conforming field path
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ValidationFailed,
            format!("at `{}`: {}", path.into(), reason.into()),
        )
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// File output error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string()).with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category_description() {
        let error = AppError::validation("plan[0][1].breakfast", "missing field");
        let rendered = error.to_string();
        assert!(rendered.contains("does not conform"));
        assert!(rendered.contains("plan[0][1].breakfast"));
    }

    #[test]
    fn test_config_missing_names_key() {
        let error = AppError::config_missing("STRIDE_LLM_API_KEY");
        assert_eq!(error.code, ErrorCode::ConfigMissing);
        assert!(error.message.contains("STRIDE_LLM_API_KEY"));
    }
}
