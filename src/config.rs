// ABOUTME: Explicit configuration value objects built once from the environment
// ABOUTME: Contains AiProviderKind selection plus per-variant endpoint/model/key settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Configuration
//!
//! Configuration is an explicit value object constructed once (from the
//! environment) and passed by reference into the components that need it.
//! There is no global settings singleton: the prompt builder needs nothing,
//! the gateway constructors need only the endpoint/model/key fields carried
//! here.
//!
//! An unrecognized provider selector is a fatal configuration error raised at
//! parse time, never a silent fallback to a default provider.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::{AppError, AppResult};

/// Environment variable for AI provider selection
pub const AI_PROVIDER_ENV: &str = "SOUSCHEF_AI_PROVIDER";

/// Default Ollama endpoint
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default Ollama model
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Default Anthropic model
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// Default OpenAI model
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default model for the local Claude CLI
const DEFAULT_CLAUDE_CLI_MODEL: &str = "claude-sonnet-4-20250514";

/// AI provider selection for recipe generation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AiProviderKind {
    /// Local model server speaking the Ollama chat protocol (default)
    #[default]
    Ollama,
    /// OpenAI hosted chat-completions API
    OpenAi,
    /// Anthropic hosted messages API
    Anthropic,
    /// Locally installed Claude CLI invoked as a subprocess
    ClaudeCli,
}

impl AiProviderKind {
    /// All recognized selector strings, in declaration order
    pub const ALL: &'static [Self] = &[Self::Ollama, Self::OpenAi, Self::Anthropic, Self::ClaudeCli];

    /// Parse a provider selector string
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any unrecognized selector. Selection
    /// is deliberately strict: a typo in deployment config must fail fast
    /// rather than silently routing to a different provider.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "claude_local" | "claude_cli" => Ok(Self::ClaudeCli),
            other => Err(AppError::config(format!(
                "Unknown AI provider: {other}. Valid values: ollama, openai, anthropic, claude_local"
            ))),
        }
    }

    /// Selector string as it appears in configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::ClaudeCli => "claude_local",
        }
    }
}

impl Display for AiProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// AI gateway configuration: provider selection plus per-variant settings
///
/// Only the fields for the selected variant are consulted at gateway
/// construction time; the rest may stay at their defaults.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Which provider variant to construct
    pub provider: AiProviderKind,
    /// Ollama server base URL
    pub ollama_base_url: String,
    /// Ollama model name
    pub ollama_model: String,
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// OpenAI model name
    pub openai_model: String,
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,
    /// Anthropic model name
    pub anthropic_model: String,
    /// Model passed to the local Claude CLI
    pub claude_cli_model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProviderKind::default(),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_owned(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_owned(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_owned(),
            anthropic_api_key: None,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_owned(),
            claude_cli_model: DEFAULT_CLAUDE_CLI_MODEL.to_owned(),
        }
    }
}

impl AiConfig {
    /// Build the AI configuration from environment variables
    ///
    /// Reads `SOUSCHEF_AI_PROVIDER` for the provider selector plus the
    /// per-variant variables below. Absent variables fall back to defaults;
    /// an unrecognized selector is fatal.
    ///
    /// - `SOUSCHEF_OLLAMA_BASE_URL`, `SOUSCHEF_OLLAMA_MODEL`
    /// - `OPENAI_API_KEY`, `SOUSCHEF_OPENAI_MODEL`
    /// - `ANTHROPIC_API_KEY`, `SOUSCHEF_ANTHROPIC_MODEL`
    /// - `SOUSCHEF_CLAUDE_CLI_MODEL`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `SOUSCHEF_AI_PROVIDER` holds an
    /// unrecognized value.
    pub fn from_env() -> AppResult<Self> {
        let provider = match env::var(AI_PROVIDER_ENV) {
            Ok(value) => AiProviderKind::parse(&value)?,
            Err(_) => AiProviderKind::default(),
        };

        Ok(Self {
            provider,
            ollama_base_url: env::var("SOUSCHEF_OLLAMA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_BASE_URL.to_owned()),
            ollama_model: env::var("SOUSCHEF_OLLAMA_MODEL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_owned()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env::var("SOUSCHEF_OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_owned()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty()),
            anthropic_model: env::var("SOUSCHEF_ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_owned()),
            claude_cli_model: env::var("SOUSCHEF_CLAUDE_CLI_MODEL")
                .unwrap_or_else(|_| DEFAULT_CLAUDE_CLI_MODEL.to_owned()),
        })
    }
}

/// Top-level configuration for the engine
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// AI gateway configuration
    pub ai: AiConfig,
}

impl ServerConfig {
    /// Build the full configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any section fails to parse.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            ai: AiConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(AiProviderKind::parse("ollama").ok(), Some(AiProviderKind::Ollama));
        assert_eq!(AiProviderKind::parse("OpenAI").ok(), Some(AiProviderKind::OpenAi));
        assert_eq!(
            AiProviderKind::parse("ANTHROPIC").ok(),
            Some(AiProviderKind::Anthropic)
        );
        assert_eq!(
            AiProviderKind::parse("claude_local").ok(),
            Some(AiProviderKind::ClaudeCli)
        );
    }

    #[test]
    fn test_unknown_provider_is_fatal() {
        let err = AiProviderKind::parse("bard").unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigInvalid);
        assert!(err.message.contains("bard"));
    }

    #[test]
    fn test_selector_round_trip() {
        for kind in AiProviderKind::ALL {
            assert_eq!(AiProviderKind::parse(kind.as_str()).ok(), Some(*kind));
        }
    }
}
