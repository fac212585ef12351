// ABOUTME: Anthropic hosted messages-API provider with typed multimodal content blocks
// ABOUTME: Relies on the tolerant JSON scan since the API offers no JSON response mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Anthropic Provider
//!
//! Implementation of the [`AiProvider`] contract against the Anthropic
//! messages API. Unlike the other HTTP variants there is no JSON-mode hint;
//! the prompt's "JSON only" instruction plus the bracket scan in
//! [`crate::normalize::extract_json`] absorb any surrounding prose. Image
//! identification sends a typed base64 image source block.
//!
//! ## Configuration
//!
//! - `ANTHROPIC_API_KEY`: API key (required)
//! - `SOUSCHEF_ANTHROPIC_MODEL`: model name (default `claude-sonnet-4-20250514`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::{
    prompts, AiProvider, RecipeGenerationRequest, RECIPES_ENVELOPE_KEY, SUBSTITUTIONS_ENVELOPE_KEY,
};
use crate::config::AiConfig;
use crate::errors::{AppError, AppResult};
use crate::normalize;

/// Base URL for the Anthropic API
const API_BASE_URL: &str = "https://api.anthropic.com/v1";

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Token budget for recipe generation
const GENERATION_MAX_TOKENS: u32 = 4096;

/// Token budget for image identification
const IMAGE_MAX_TOKENS: u32 = 2048;

/// Token budget for substitution and voice parsing
const SHORT_TASK_MAX_TOKENS: u32 = 1024;

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request timeout
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Anthropic messages request structure
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

/// Message structure; content is plain text or typed blocks
#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: AnthropicContent,
}

impl AnthropicMessage {
    fn user(text: String) -> Self {
        Self {
            role: "user",
            content: AnthropicContent::Text(text),
        }
    }

    fn user_with_image(text: String, image_base64: &str) -> Self {
        Self {
            role: "user",
            content: AnthropicContent::Blocks(vec![
                AnthropicContentBlock::Image {
                    source: ImageSource {
                        source_type: "base64",
                        media_type: "image/jpeg",
                        data: image_base64.to_owned(),
                    },
                },
                AnthropicContentBlock::Text { text },
            ]),
        }
    }
}

/// Plain-text or block-structured message content
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnthropicContent {
    Text(String),
    Blocks(Vec<AnthropicContentBlock>),
}

/// One typed content block
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "image")]
    Image { source: ImageSource },
    #[serde(rename = "text")]
    Text { text: String },
}

/// Base64 image source descriptor
#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'static str,
    data: String,
}

/// Anthropic messages response structure
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicResponseBlock>,
}

/// Response content block
#[derive(Debug, Deserialize)]
struct AnthropicResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic API error response
#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Anthropic hosted chat provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    /// Create a new provider with the given API key and model
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Create a provider from the AI configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `ANTHROPIC_API_KEY` is not set.
    pub fn from_config(config: &AiConfig) -> AppResult<Self> {
        let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
            AppError::config_missing(
                "Missing ANTHROPIC_API_KEY environment variable required for the anthropic provider",
            )
        })?;
        Self::new(api_key, config.anthropic_model.clone())
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<AnthropicErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::external_service(
                    "Anthropic",
                    format!("Authentication failed: {}", error_response.error.message),
                ),
                429 => AppError::external_service(
                    "Anthropic",
                    format!("Rate limit exceeded: {}", error_response.error.message),
                ),
                400 => AppError::invalid_input(format!(
                    "Anthropic API validation error: {}",
                    error_response.error.message
                )),
                _ => AppError::external_service(
                    "Anthropic",
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            AppError::external_service(
                "Anthropic",
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            )
        }
    }

    /// Send a messages request and return the first text block
    async fn send_message(
        &self,
        messages: Vec<AnthropicMessage>,
        max_tokens: u32,
    ) -> AppResult<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens,
            messages,
        };

        let response = self
            .client
            .post(format!("{API_BASE_URL}/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Anthropic: {}", e);
                AppError::external_service("Anthropic", format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Anthropic response: {}", e);
            AppError::external_service("Anthropic", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let parsed: AnthropicResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Anthropic response envelope: {}", e);
            AppError::external_service("Anthropic", format!("Failed to parse response: {e}"))
        })?;

        let content = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| {
                AppError::external_service("Anthropic", "API returned no text content")
            })?;

        debug!("Received response from Anthropic: {} chars", content.len());

        Ok(content)
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn display_name(&self) -> &'static str {
        "Anthropic Claude"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate_recipes(&self, request: &RecipeGenerationRequest) -> AppResult<Vec<Value>> {
        let prompt = prompts::build_recipe_prompt(request);
        let content = self
            .send_message(vec![AnthropicMessage::user(prompt)], GENERATION_MAX_TOKENS)
            .await?;
        let value = normalize::extract_json(&content)?;
        Ok(normalize::unwrap_envelope(value, RECIPES_ENVELOPE_KEY))
    }

    #[instrument(skip(self, image_base64), fields(model = %self.model, image_len = image_base64.len()))]
    async fn identify_ingredients(&self, image_base64: &str) -> AppResult<Value> {
        let message =
            AnthropicMessage::user_with_image(prompts::build_image_prompt(), image_base64);
        let content = self.send_message(vec![message], IMAGE_MAX_TOKENS).await?;
        normalize::extract_json(&content)
    }

    #[instrument(skip(self, dietary_restrictions, available_ingredients), fields(model = %self.model))]
    async fn suggest_substitutions(
        &self,
        original_ingredient: &str,
        dietary_restrictions: &[String],
        available_ingredients: &[String],
    ) -> AppResult<Vec<Value>> {
        let prompt = prompts::build_substitution_prompt(
            original_ingredient,
            dietary_restrictions,
            available_ingredients,
        );
        let content = self
            .send_message(vec![AnthropicMessage::user(prompt)], SHORT_TASK_MAX_TOKENS)
            .await?;
        let value = normalize::extract_json(&content)?;
        Ok(normalize::unwrap_envelope(value, SUBSTITUTIONS_ENVELOPE_KEY))
    }

    #[instrument(skip(self, transcript), fields(model = %self.model))]
    async fn parse_voice_input(&self, transcript: &str) -> AppResult<Value> {
        let prompt = prompts::build_voice_parse_prompt(transcript);
        let content = self
            .send_message(vec![AnthropicMessage::user(prompt)], SHORT_TASK_MAX_TOKENS)
            .await?;
        normalize::extract_json(&content)
    }
}
