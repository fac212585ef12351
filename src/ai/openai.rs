// ABOUTME: OpenAI hosted chat-completions provider with JSON response mode
// ABOUTME: Embeds camera images as data-URL content parts on multimodal requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # OpenAI Provider
//!
//! Implementation of the [`AiProvider`] contract against the OpenAI
//! chat-completions API. Every request carries the explicit
//! `response_format: {"type": "json_object"}` hint; image identification
//! sends the image as a `data:image/jpeg;base64,...` URL content part.
//!
//! ## Configuration
//!
//! - `OPENAI_API_KEY`: API key (required)
//! - `SOUSCHEF_OPENAI_MODEL`: model name (default `gpt-4o`)

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

/// Base URL for the OpenAI API
const API_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request timeout
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// API Request/Response Types
// ============================================================================

/// OpenAI chat-completions request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    response_format: ResponseFormat,
}

/// JSON response-mode hint
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

impl ResponseFormat {
    const fn json_object() -> Self {
        Self {
            format_type: "json_object",
        }
    }
}

/// Message structure; content is plain text or multimodal parts
#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: OpenAiContent,
}

impl OpenAiMessage {
    fn user(text: String) -> Self {
        Self {
            role: "user",
            content: OpenAiContent::Text(text),
        }
    }

    fn user_with_image(text: String, image_base64: &str) -> Self {
        Self {
            role: "user",
            content: OpenAiContent::Parts(vec![
                OpenAiContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/jpeg;base64,{image_base64}"),
                    },
                },
                OpenAiContentPart::Text { text },
            ]),
        }
    }
}

/// Plain-text or multimodal message content
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAiContent {
    Text(String),
    Parts(Vec<OpenAiContentPart>),
}

/// One part of a multimodal message
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum OpenAiContentPart {
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
    #[serde(rename = "text")]
    Text { text: String },
}

/// Image reference carried as a data URL
#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// OpenAI chat-completions response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

/// Choice in the response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

/// Message in the response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// OpenAI API error response
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

/// OpenAI hosted chat provider
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
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
    /// Returns a configuration error if `OPENAI_API_KEY` is not set.
    pub fn from_config(config: &AiConfig) -> AppResult<Self> {
        let api_key = config.openai_api_key.clone().ok_or_else(|| {
            AppError::config_missing(
                "Missing OPENAI_API_KEY environment variable required for the openai provider",
            )
        })?;
        Self::new(api_key, config.openai_model.clone())
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::external_service(
                    "OpenAI",
                    format!("Authentication failed: {}", error_response.error.message),
                ),
                429 => AppError::external_service(
                    "OpenAI",
                    format!("Rate limit exceeded: {}", error_response.error.message),
                ),
                400 => AppError::invalid_input(format!(
                    "OpenAI API validation error: {}",
                    error_response.error.message
                )),
                _ => AppError::external_service(
                    "OpenAI",
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            AppError::external_service(
                "OpenAI",
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            )
        }
    }

    /// Send a chat-completion request and return the raw message content
    ///
    /// `fallback` stands in for the content when the model returns an empty
    /// message (`"[]"` for array operations, `"{}"` for object operations).
    async fn chat(&self, messages: Vec<OpenAiMessage>, fallback: &str) -> AppResult<String> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages,
            response_format: ResponseFormat::json_object(),
        };

        let response = self
            .client
            .post(format!("{API_BASE_URL}/chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to OpenAI: {}", e);
                AppError::external_service("OpenAI", format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read OpenAI response: {}", e);
            AppError::external_service("OpenAI", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse OpenAI response envelope: {}", e);
            AppError::external_service("OpenAI", format!("Failed to parse response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("OpenAI", "API returned no choices"))?
            .message
            .content
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| fallback.to_owned());

        debug!("Received response from OpenAI: {} chars", content.len());

        Ok(content)
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn display_name(&self) -> &'static str {
        "OpenAI"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate_recipes(&self, request: &RecipeGenerationRequest) -> AppResult<Vec<Value>> {
        let prompt = prompts::build_recipe_prompt(request);
        let content = self.chat(vec![OpenAiMessage::user(prompt)], "[]").await?;
        let value = normalize::extract_json(&content)?;
        Ok(normalize::unwrap_envelope(value, RECIPES_ENVELOPE_KEY))
    }

    #[instrument(skip(self, image_base64), fields(model = %self.model, image_len = image_base64.len()))]
    async fn identify_ingredients(&self, image_base64: &str) -> AppResult<Value> {
        let message = OpenAiMessage::user_with_image(prompts::build_image_prompt(), image_base64);
        let content = self.chat(vec![message], "{}").await?;
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
        let content = self.chat(vec![OpenAiMessage::user(prompt)], "[]").await?;
        let value = normalize::extract_json(&content)?;
        Ok(normalize::unwrap_envelope(value, SUBSTITUTIONS_ENVELOPE_KEY))
    }

    #[instrument(skip(self, transcript), fields(model = %self.model))]
    async fn parse_voice_input(&self, transcript: &str) -> AppResult<Value> {
        let prompt = prompts::build_voice_parse_prompt(transcript);
        let content = self.chat(vec![OpenAiMessage::user(prompt)], "{}").await?;
        normalize::extract_json(&content)
    }
}
