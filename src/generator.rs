// ABOUTME: Plan generator orchestrating the single schema-constrained model call
// ABOUTME: Assembles system prompt, goal text, and image into one request and validates the reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plan Generator
//!
//! Builds the model request from the fixed system instruction, the user's
//! goal text (passed through unmodified), and the encoded screenshot, then
//! performs exactly one provider call and validates the returned payload
//! into a [`RunningPlan`].
//!
//! Error conditions are kept distinct: transport/auth failures surface as
//! external-call errors from the provider, while a reply that is not valid
//! JSON or does not conform to the schema surfaces as a validation error
//! naming the offending field path.

use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::image::ImageAttachment;
use crate::llm::{prompts, ChatMessage, ChatRequest, LlmProvider};
use crate::models::RunningPlan;

/// Schema name reported to the API
const PLAN_SCHEMA_NAME: &str = "running_plan";

/// Generates validated training plans through an LLM provider
pub struct PlanGenerator {
    provider: Box<dyn LlmProvider>,
}

impl PlanGenerator {
    /// Create a generator over the given provider
    #[must_use]
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Generate a plan for the given goal and screenshot
    ///
    /// Performs one outbound call; no local state is retained between calls
    /// and failures are never retried here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the provider cannot take image input with a
    /// declared output schema, the provider's error for network/auth/quota
    /// failures, or `ValidationFailed` when the model reply is not valid JSON
    /// or does not conform to the plan schema.
    pub async fn generate(&self, goal: &str, image: ImageAttachment) -> AppResult<RunningPlan> {
        let capabilities = self.provider.capabilities();
        if !capabilities.supports_vision() || !capabilities.supports_json_schema() {
            return Err(AppError::config(format!(
                "provider {} does not support image input with schema-constrained output",
                self.provider.display_name()
            )));
        }

        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::get_coach_system_prompt()),
            ChatMessage::user_with_image(goal, image),
        ])
        .with_response_schema(PLAN_SCHEMA_NAME, RunningPlan::response_schema());

        info!(
            "Requesting plan from {} (model {})",
            self.provider.display_name(),
            self.provider.default_model()
        );

        let response = self.provider.complete(&request).await?;

        debug!(
            "Received {} bytes of plan content (finish_reason={:?})",
            response.content.len(),
            response.finish_reason
        );

        let payload: serde_json::Value = serde_json::from_str(&response.content)
            .map_err(|e| {
                AppError::validation("$", format!("model reply is not valid JSON: {e}"))
            })?;

        let plan = RunningPlan::from_value(&payload)?;

        info!(
            "Generated plan: {} weeks, {} training days",
            plan.week_count(),
            plan.total_days()
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::llm::{ChatResponse, LlmCapabilities};
    use async_trait::async_trait;

    /// Provider stub returning a canned reply or a forced failure
    struct StubProvider {
        reply: Result<String, ()>,
        capabilities: LlmCapabilities,
    }

    impl StubProvider {
        fn with_reply(reply: Result<String, ()>) -> Self {
            Self {
                reply,
                capabilities: LlmCapabilities::full_featured(),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn display_name(&self) -> &str {
            "Stub"
        }

        fn capabilities(&self) -> LlmCapabilities {
            self.capabilities
        }

        fn default_model(&self) -> &str {
            "stub-model"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
            match &self.reply {
                Ok(content) => Ok(ChatResponse {
                    content: content.clone(),
                    model: "stub-model".to_owned(),
                    usage: None,
                    finish_reason: Some("stop".to_owned()),
                }),
                Err(()) => Err(AppError::external_service("Stub", "forced failure")),
            }
        }
    }

    fn png_image() -> ImageAttachment {
        ImageAttachment::from_bytes(&[0x89, b'P', b'N', b'G', 0, 0, 0, 0]).expect("png header")
    }

    fn valid_reply() -> String {
        serde_json::json!({
            "motivation": "Go get it",
            "feedback": "Pace is improving",
            "supplement_suggestion": "Magnesium",
            "plan": [[{
                "day": "Monday",
                "titles": "Tempo run",
                "details": "6k with 3k at threshold",
                "breakfast": { "suggestion": "Porridge", "calories": "400 kcal" },
                "lunch": { "suggestion": "Wrap", "calories": "550 kcal" },
                "dinner": { "suggestion": "Pasta", "calories": "700 kcal" }
            }]]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_returns_validated_plan() {
        let generator = PlanGenerator::new(Box::new(StubProvider::with_reply(Ok(valid_reply()))));
        let plan = generator
            .generate("run a 10k in 8 weeks", png_image())
            .await
            .expect("valid reply parses");
        assert_eq!(plan.week_count(), 1);
        assert_eq!(plan.plan[0][0].titles, "Tempo run");
    }

    #[tokio::test]
    async fn test_non_json_reply_is_validation_error() {
        let generator = PlanGenerator::new(Box::new(StubProvider::with_reply(Ok(
            "here is your plan: ...".to_owned(),
        ))));
        let error = generator
            .generate("run a 10k in 8 weeks", png_image())
            .await
            .expect_err("prose reply rejected");
        assert_eq!(error.code, crate::errors::ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_non_conforming_reply_names_field_path() {
        let generator = PlanGenerator::new(Box::new(StubProvider::with_reply(Ok(
            r#"{"motivation": "hi", "plan": [[]]}"#.to_owned(),
        ))));
        let error = generator
            .generate("run a 10k in 8 weeks", png_image())
            .await
            .expect_err("non-conforming reply rejected");
        assert_eq!(error.code, crate::errors::ErrorCode::ValidationFailed);
        assert!(error.message.contains("plan[0]"), "{error}");
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let generator = PlanGenerator::new(Box::new(StubProvider::with_reply(Err(()))));
        let error = generator
            .generate("run a 10k in 8 weeks", png_image())
            .await
            .expect_err("provider failure propagates");
        assert_eq!(
            error.code,
            crate::errors::ErrorCode::ExternalServiceError
        );
    }

    #[tokio::test]
    async fn test_text_only_provider_is_rejected() {
        let mut provider = StubProvider::with_reply(Ok(valid_reply()));
        provider.capabilities = LlmCapabilities::SYSTEM_MESSAGES;

        let generator = PlanGenerator::new(Box::new(provider));
        let error = generator
            .generate("run a 10k in 8 weeks", png_image())
            .await
            .expect_err("provider without vision rejected");
        assert_eq!(error.code, crate::errors::ErrorCode::ConfigError);
    }
}
