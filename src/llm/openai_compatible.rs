// ABOUTME: OpenAI-compatible chat-completions provider with vision and schema output
// ABOUTME: Works against api.openai.com and local servers like Ollama and vLLM
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # `OpenAI`-Compatible Provider
//!
//! Implementation of [`LlmProvider`] for any endpoint speaking the `OpenAI`
//! chat completions API: the hosted service, Ollama, vLLM, `LocalAI`.
//!
//! Requests carry the user image as a multimodal `image_url` content part
//! and the declared plan schema as `response_format: json_schema`, so the
//! response body is machine-parseable without free-text extraction.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::config::LlmConfig;
use crate::errors::{AppError, ErrorCode};

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (plan generation can take tens of seconds)
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: OpenAiContent,
}

/// Message content: plain text, or multimodal parts when an image rides along
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAiContent {
    Text(String),
    Parts(Vec<OpenAiContentPart>),
}

/// One part of a multimodal message
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpenAiContentPart {
    Text { text: String },
    ImageUrl { image_url: OpenAiImageUrl },
}

/// Inline image reference (data URI)
#[derive(Debug, Serialize)]
struct OpenAiImageUrl {
    url: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        let content = match &msg.image {
            Some(image) => OpenAiContent::Parts(vec![
                OpenAiContentPart::Text {
                    text: msg.content.clone(),
                },
                OpenAiContentPart::ImageUrl {
                    image_url: OpenAiImageUrl {
                        url: image.data_uri(),
                    },
                },
            ]),
            None => OpenAiContent::Text(msg.content.clone()),
        };
        Self {
            role: msg.role.as_str().to_owned(),
            content,
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: LlmConfig,
    display_name: String,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider from endpoint configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        // Friendlier display names for well-known endpoints
        let display_name = if config.base_url.contains("api.openai.com") {
            "OpenAI".to_owned()
        } else if config.base_url.contains(":11434") {
            "Ollama (Local)".to_owned()
        } else if config.base_url.contains(":8000") {
            "vLLM (Local)".to_owned()
        } else {
            "OpenAI-compatible LLM".to_owned()
        };

        info!(
            "Initializing {display_name} provider: base_url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self {
            client,
            config,
            display_name,
        })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if an API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Parse error response from the API into the error taxonomy
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 | 403 => AppError::auth_failed(format!(
                    "API authentication failed: {}",
                    error_response.error.message
                )),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    error_response.error.message,
                ),
                _ => AppError::external_service(
                    self.display_name.clone(),
                    format!("{error_type} - {}", error_response.error.message),
                ),
            }
        } else {
            match status.as_u16() {
                502..=504 => AppError::external_service(
                    self.display_name.clone(),
                    "server is not responding (is the endpoint running?)",
                ),
                _ => AppError::external_service(
                    self.display_name.clone(),
                    format!(
                        "API error ({status}): {}",
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            }
        }
    }

    /// Build the `response_format` value for a declared schema
    fn response_format(request: &ChatRequest) -> Option<Value> {
        request.response_schema.as_ref().map(|schema| {
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": true
                }
            })
        })
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::full_featured()
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: Self::response_format(request),
        };

        debug!(
            "Sending chat completion to {} ({} messages, schema={})",
            self.display_name,
            request.messages.len(),
            request.response_schema.is_some()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", self.display_name, e);
                if e.is_connect() {
                    AppError::external_service(
                        self.display_name.clone(),
                        format!(
                            "cannot connect to {} (base URL {})",
                            self.display_name, self.config.base_url
                        ),
                    )
                } else {
                    AppError::external_service(
                        self.display_name.clone(),
                        format!("request failed: {e}"),
                    )
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(
                self.display_name.clone(),
                format!("failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(
                self.display_name.clone(),
                format!("unexpected response shape: {e}"),
            )
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(self.display_name.clone(), "response contained no choices")
        })?;

        let content = choice.message.content.unwrap_or_default();

        if let Some(ref usage) = parsed.usage {
            debug!(
                "Completion used {} prompt + {} completion tokens",
                usage.prompt, usage.completion
            );
        }

        Ok(ChatResponse {
            content,
            model: parsed.model,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::image::ImageAttachment;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(LlmConfig {
            base_url: "http://localhost:11434/v1/".to_owned(),
            api_key: None,
            model: "llava".to_owned(),
        })
        .expect("client builds")
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        assert_eq!(
            provider().api_url("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_message_with_image_serializes_as_parts() {
        let png = [0x89, b'P', b'N', b'G', 0, 0, 0, 0];
        let image = ImageAttachment::from_bytes(&png).expect("png header");
        let message = ChatMessage::user_with_image("my goal", image);
        let serialized =
            serde_json::to_value(OpenAiMessage::from(&message)).expect("serializes");

        assert_eq!(serialized["content"][0]["type"], "text");
        assert_eq!(serialized["content"][1]["type"], "image_url");
        assert!(serialized["content"][1]["image_url"]["url"]
            .as_str()
            .expect("url")
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_plain_message_serializes_as_string() {
        let message = ChatMessage::system("be a coach");
        let serialized =
            serde_json::to_value(OpenAiMessage::from(&message)).expect("serializes");
        assert_eq!(serialized["content"], "be a coach");
    }

    #[test]
    fn test_response_format_declares_strict_schema() {
        let request = ChatRequest::new(vec![]).with_response_schema(
            "running_plan",
            serde_json::json!({"type": "object"}),
        );
        let format = OpenAiCompatibleProvider::response_format(&request).expect("format");
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["strict"], true);
        assert_eq!(format["json_schema"]["name"], "running_plan");
    }
}
