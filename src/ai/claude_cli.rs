// ABOUTME: Local CLI provider driving a locally installed Claude binary over stdin/stdout
// ABOUTME: Non-zero exits surface as transport failures carrying the process stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Claude CLI Provider
//!
//! Implementation of the [`AiProvider`] contract on top of a locally
//! installed Claude CLI. The prompt is written to the subprocess's standard
//! input and JSON-bearing text is read from its standard output.
//!
//! The CLI receives no image bytes: image identification appends a
//! length-only notice describing the payload instead of attempting real
//! image reasoning.
//!
//! ## Configuration
//!
//! - `SOUSCHEF_CLAUDE_CLI_MODEL`: model passed to `claude --model`

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use super::{
    prompts, AiProvider, RecipeGenerationRequest, RECIPES_ENVELOPE_KEY, SUBSTITUTIONS_ENVELOPE_KEY,
};
use crate::config::AiConfig;
use crate::errors::{AppError, AppResult};
use crate::normalize;

/// Name of the CLI binary resolved from `PATH`
const CLAUDE_BINARY: &str = "claude";

/// Locally installed Claude CLI provider
pub struct ClaudeCliProvider {
    model: String,
}

impl ClaudeCliProvider {
    /// Create a new provider for the given model
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Create a provider from the AI configuration
    #[must_use]
    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.claude_cli_model.clone())
    }

    /// Run the CLI with the prompt on stdin and return trimmed stdout
    async fn run_claude(&self, prompt: &str) -> AppResult<String> {
        let mut child = Command::new(CLAUDE_BINARY)
            .arg("--print")
            .arg("--model")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn {}: {}", CLAUDE_BINARY, e);
                AppError::external_service(
                    "ClaudeCli",
                    format!("Failed to spawn {CLAUDE_BINARY}: {e}"),
                )
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await.map_err(|e| {
                AppError::external_service("ClaudeCli", format!("Failed to write prompt: {e}"))
            })?;
            // stdin drops here, closing the pipe so the CLI sees EOF
        }

        let output = child.wait_with_output().await.map_err(|e| {
            AppError::external_service("ClaudeCli", format!("Failed to read output: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            error!("Claude CLI exited with {}: {}", output.status, stderr);
            return Err(AppError::external_service(
                "ClaudeCli",
                format!("Claude local CLI failed: {stderr}"),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        debug!("Received {} chars from Claude CLI", stdout.len());
        Ok(stdout)
    }
}

#[async_trait]
impl AiProvider for ClaudeCliProvider {
    fn name(&self) -> &'static str {
        "claude_local"
    }

    fn display_name(&self) -> &'static str {
        "Claude CLI (Local)"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate_recipes(&self, request: &RecipeGenerationRequest) -> AppResult<Vec<Value>> {
        let prompt = prompts::build_recipe_prompt(request);
        let response = self.run_claude(&prompt).await?;
        let value = normalize::extract_json(&response)?;
        Ok(normalize::unwrap_envelope(value, RECIPES_ENVELOPE_KEY))
    }

    #[instrument(skip(self, image_base64), fields(model = %self.model, image_len = image_base64.len()))]
    async fn identify_ingredients(&self, image_base64: &str) -> AppResult<Value> {
        let prompt = format!(
            "{}\n\n[Image data provided as base64, length: {} chars]",
            prompts::build_image_prompt(),
            image_base64.len()
        );
        let response = self.run_claude(&prompt).await?;
        normalize::extract_json(&response)
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
        let response = self.run_claude(&prompt).await?;
        let value = normalize::extract_json(&response)?;
        Ok(normalize::unwrap_envelope(value, SUBSTITUTIONS_ENVELOPE_KEY))
    }

    #[instrument(skip(self, transcript), fields(model = %self.model))]
    async fn parse_voice_input(&self, transcript: &str) -> AppResult<Value> {
        let prompt = prompts::build_voice_parse_prompt(transcript);
        let response = self.run_claude(&prompt).await?;
        normalize::extract_json(&response)
    }
}
