// ABOUTME: Local model server provider speaking the Ollama native chat protocol
// ABOUTME: Sends prompts with a JSON format hint and inline base64 images
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Ollama Provider
//!
//! Implementation of the [`AiProvider`] contract for a local Ollama server.
//! Uses the native `/api/chat` endpoint with `format: "json"` so the model
//! is steered toward JSON output; camera images travel as an inline base64
//! block on the user message.
//!
//! ## Configuration
//!
//! - `SOUSCHEF_OLLAMA_BASE_URL`: server endpoint (default `http://localhost:11434`)
//! - `SOUSCHEF_OLLAMA_MODEL`: model name (default `llama3.2`)

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

/// Connection timeout for the local server
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local inference can be slow)
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// API Request/Response Types (Ollama native chat format)
// ============================================================================

/// Ollama chat request structure
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    format: &'static str,
    stream: bool,
}

/// Message structure for the Ollama chat API
#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

impl OllamaMessage {
    fn user(content: String) -> Self {
        Self {
            role: "user",
            content,
            images: None,
        }
    }

    fn user_with_image(content: String, image_base64: &str) -> Self {
        Self {
            role: "user",
            content,
            images: Some(vec![image_base64.to_owned()]),
        }
    }
}

/// Ollama chat response structure
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

/// Message in the Ollama response
#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Local Ollama chat provider
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create a new provider for the given endpoint and model
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Create a provider from the AI configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &AiConfig) -> AppResult<Self> {
        Self::new(config.ollama_base_url.clone(), config.ollama_model.clone())
    }

    fn api_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    /// Send a chat request and return the raw message content
    async fn chat(&self, messages: Vec<OllamaMessage>) -> AppResult<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            messages,
            format: "json",
            stream: false,
        };

        let response = self
            .client
            .post(self.api_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Ollama: {}", e);
                if e.is_connect() {
                    AppError::external_service(
                        "Ollama",
                        format!(
                            "Cannot connect. Is the server running at {}?",
                            self.base_url
                        ),
                    )
                } else {
                    AppError::external_service("Ollama", format!("Failed to connect: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Ollama response: {}", e);
            AppError::external_service("Ollama", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(AppError::external_service(
                "Ollama",
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        let parsed: OllamaResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Ollama response envelope: {}", e);
            AppError::external_service("Ollama", format!("Failed to parse response: {e}"))
        })?;

        debug!(
            "Received response from Ollama: {} chars",
            parsed.message.content.len()
        );

        Ok(parsed.message.content)
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn display_name(&self) -> &'static str {
        "Ollama (Local)"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate_recipes(&self, request: &RecipeGenerationRequest) -> AppResult<Vec<Value>> {
        let prompt = prompts::build_recipe_prompt(request);
        let content = self.chat(vec![OllamaMessage::user(prompt)]).await?;
        let value = normalize::extract_json(&content)?;
        Ok(normalize::unwrap_envelope(value, RECIPES_ENVELOPE_KEY))
    }

    #[instrument(skip(self, image_base64), fields(model = %self.model, image_len = image_base64.len()))]
    async fn identify_ingredients(&self, image_base64: &str) -> AppResult<Value> {
        let message = OllamaMessage::user_with_image(prompts::build_image_prompt(), image_base64);
        let content = self.chat(vec![message]).await?;
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
        let content = self.chat(vec![OllamaMessage::user(prompt)]).await?;
        let value = normalize::extract_json(&content)?;
        Ok(normalize::unwrap_envelope(value, SUBSTITUTIONS_ENVELOPE_KEY))
    }

    #[instrument(skip(self, transcript), fields(model = %self.model))]
    async fn parse_voice_input(&self, transcript: &str) -> AppResult<Value> {
        let prompt = prompts::build_voice_parse_prompt(transcript);
        let content = self.chat(vec![OllamaMessage::user(prompt)]).await?;
        normalize::extract_json(&content)
    }
}
