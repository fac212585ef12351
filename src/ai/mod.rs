// ABOUTME: AI provider abstraction layer for pluggable recipe-generation backends
// ABOUTME: Defines the AiProvider contract and the config-selected AiGateway dispatcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # AI Provider Gateway
//!
//! This module defines the contract that generative-AI backends must
//! implement to integrate with the recipe search pipeline, plus the
//! [`AiGateway`] dispatcher that selects one of the four interchangeable
//! variants from an explicit configuration value.
//!
//! All variants render their requests through the shared [`prompts`]
//! templates, so prompt content and output-schema documentation are
//! identical across providers; they differ only in transport (local chat
//! server, two hosted HTTP APIs, local CLI subprocess) and in how an image
//! payload is embedded.
//!
//! ## Example
//!
//! ```rust,no_run
//! use souschef::ai::{AiGateway, AiProvider, RecipeGenerationRequest};
//! use souschef::config::AiConfig;
//! use souschef::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = AiConfig::from_env()?;
//!     let gateway = AiGateway::from_config(&config)?;
//!     let request = RecipeGenerationRequest::new("a quick weeknight pasta");
//!     let raw_recipes = gateway.generate_recipes(&request).await?;
//!     println!("{} candidates", raw_recipes.len());
//!     Ok(())
//! }
//! ```

mod anthropic;
mod claude_cli;
mod ollama;
mod openai;
pub mod prompts;

pub use anthropic::AnthropicProvider;
pub use claude_cli::ClaudeCliProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{AiConfig, AiProviderKind};
use crate::errors::AppResult;

/// Envelope key unwrapped for recipe generation results
pub const RECIPES_ENVELOPE_KEY: &str = "recipes";

/// Envelope key unwrapped for substitution suggestion results
pub const SUBSTITUTIONS_ENVELOPE_KEY: &str = "substitutions";

// ============================================================================
// Request Types
// ============================================================================

/// Structured input for one recipe generation request
///
/// Carried unchanged across all provider variants; the shared prompt
/// templates render it into natural-language instructions.
#[derive(Debug, Clone, Default)]
pub struct RecipeGenerationRequest {
    /// The user's free-text cooking goal
    pub prompt: String,
    /// Household ingredient names to prefer (empty = ignore availability)
    pub available_ingredients: Vec<String>,
    /// Dietary restrictions and allergies - absolute exclusions
    pub dietary_preferences: Vec<String>,
    /// Health goals - soft preference, not exclusion
    pub health_goals: Vec<String>,
    /// Family members' dietary notes - must-respect, may contain allergies
    pub family_dietary_notes: Vec<String>,
    /// The user's preferred cuisines
    pub favorite_cuisines: Vec<String>,
    /// How many recipes to request
    pub max_results: u32,
    /// Optional preparation-time ceiling in minutes
    pub max_prep_time: Option<u32>,
    /// Optional cuisine filter
    pub cuisine: Option<String>,
}

impl RecipeGenerationRequest {
    /// Default number of recipes to request
    pub const DEFAULT_MAX_RESULTS: u32 = 5;

    /// Create a request for the given free-text prompt
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_results: Self::DEFAULT_MAX_RESULTS,
            ..Self::default()
        }
    }

    /// Set the available-ingredient list
    #[must_use]
    pub fn with_available_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.available_ingredients = ingredients;
        self
    }

    /// Set the dietary preference list
    #[must_use]
    pub fn with_dietary_preferences(mut self, preferences: Vec<String>) -> Self {
        self.dietary_preferences = preferences;
        self
    }

    /// Set the health goal list
    #[must_use]
    pub fn with_health_goals(mut self, goals: Vec<String>) -> Self {
        self.health_goals = goals;
        self
    }

    /// Set the family dietary notes
    #[must_use]
    pub fn with_family_dietary_notes(mut self, notes: Vec<String>) -> Self {
        self.family_dietary_notes = notes;
        self
    }

    /// Set the favorite cuisines
    #[must_use]
    pub fn with_favorite_cuisines(mut self, cuisines: Vec<String>) -> Self {
        self.favorite_cuisines = cuisines;
        self
    }

    /// Set the number of recipes to request
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the preparation-time ceiling
    #[must_use]
    pub const fn with_max_prep_time(mut self, minutes: Option<u32>) -> Self {
        self.max_prep_time = minutes;
        self
    }

    /// Set the cuisine filter
    #[must_use]
    pub fn with_cuisine(mut self, cuisine: Option<String>) -> Self {
        self.cuisine = cuisine;
        self
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Contract implemented by every generative-AI backend
///
/// The four operations share a post-parse contract: recipe generation and
/// substitution suggestion return bare arrays of raw JSON objects (the
/// `"recipes"` / `"substitutions"` envelopes already unwrapped), image
/// identification and voice parsing return a single JSON value. Transport
/// failures surface as [`crate::errors::ErrorCode::ExternalServiceError`],
/// unparseable content as
/// [`crate::errors::ErrorCode::MalformedResponse`]; callers never need to
/// know which variant is active.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Unique provider identifier (e.g. `"ollama"`, `"anthropic"`)
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Generate candidate recipes for the given request
    async fn generate_recipes(&self, request: &RecipeGenerationRequest) -> AppResult<Vec<Value>>;

    /// Identify ingredients visible in a base64-encoded camera image
    async fn identify_ingredients(&self, image_base64: &str) -> AppResult<Value>;

    /// Suggest substitutions for an ingredient under the given restrictions
    async fn suggest_substitutions(
        &self,
        original_ingredient: &str,
        dietary_restrictions: &[String],
        available_ingredients: &[String],
    ) -> AppResult<Vec<Value>>;

    /// Parse a voice transcript into ingredient name/quantity/unit entries
    async fn parse_voice_input(&self, transcript: &str) -> AppResult<Value>;
}

// ============================================================================
// Gateway Dispatcher
// ============================================================================

/// Unified gateway wrapping the four interchangeable provider variants
///
/// Selection is a pure function of the configuration value; an unrecognized
/// selector never reaches this type (it fails at config parse time).
pub enum AiGateway {
    /// Local model server speaking the Ollama chat protocol
    Ollama(OllamaProvider),
    /// OpenAI hosted chat-completions API
    OpenAi(OpenAiProvider),
    /// Anthropic hosted messages API
    Anthropic(AnthropicProvider),
    /// Locally installed Claude CLI invoked as a subprocess
    ClaudeCli(ClaudeCliProvider),
}

impl AiGateway {
    /// Construct the variant selected by the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the selected variant's required
    /// settings (e.g. a hosted vendor's API key) are missing, or an internal
    /// error when the HTTP client cannot be created.
    pub fn from_config(config: &AiConfig) -> AppResult<Self> {
        match config.provider {
            AiProviderKind::Ollama => Ok(Self::Ollama(OllamaProvider::from_config(config)?)),
            AiProviderKind::OpenAi => Ok(Self::OpenAi(OpenAiProvider::from_config(config)?)),
            AiProviderKind::Anthropic => {
                Ok(Self::Anthropic(AnthropicProvider::from_config(config)?))
            }
            AiProviderKind::ClaudeCli => Ok(Self::ClaudeCli(ClaudeCliProvider::from_config(config))),
        }
    }

    /// The kind of the active variant
    #[must_use]
    pub const fn provider_kind(&self) -> AiProviderKind {
        match self {
            Self::Ollama(_) => AiProviderKind::Ollama,
            Self::OpenAi(_) => AiProviderKind::OpenAi,
            Self::Anthropic(_) => AiProviderKind::Anthropic,
            Self::ClaudeCli(_) => AiProviderKind::ClaudeCli,
        }
    }

    /// All selectable provider kinds
    #[must_use]
    pub const fn available_providers() -> &'static [AiProviderKind] {
        AiProviderKind::ALL
    }
}

impl std::fmt::Debug for AiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama(_) => f.debug_tuple("AiGateway::Ollama").finish(),
            Self::OpenAi(_) => f.debug_tuple("AiGateway::OpenAi").finish(),
            Self::Anthropic(_) => f.debug_tuple("AiGateway::Anthropic").finish(),
            Self::ClaudeCli(_) => f.debug_tuple("AiGateway::ClaudeCli").finish(),
        }
    }
}

// Delegate AiProvider to the underlying variant
#[async_trait]
impl AiProvider for AiGateway {
    fn name(&self) -> &'static str {
        match self {
            Self::Ollama(p) => p.name(),
            Self::OpenAi(p) => p.name(),
            Self::Anthropic(p) => p.name(),
            Self::ClaudeCli(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Ollama(p) => p.display_name(),
            Self::OpenAi(p) => p.display_name(),
            Self::Anthropic(p) => p.display_name(),
            Self::ClaudeCli(p) => p.display_name(),
        }
    }

    async fn generate_recipes(&self, request: &RecipeGenerationRequest) -> AppResult<Vec<Value>> {
        match self {
            Self::Ollama(p) => p.generate_recipes(request).await,
            Self::OpenAi(p) => p.generate_recipes(request).await,
            Self::Anthropic(p) => p.generate_recipes(request).await,
            Self::ClaudeCli(p) => p.generate_recipes(request).await,
        }
    }

    async fn identify_ingredients(&self, image_base64: &str) -> AppResult<Value> {
        match self {
            Self::Ollama(p) => p.identify_ingredients(image_base64).await,
            Self::OpenAi(p) => p.identify_ingredients(image_base64).await,
            Self::Anthropic(p) => p.identify_ingredients(image_base64).await,
            Self::ClaudeCli(p) => p.identify_ingredients(image_base64).await,
        }
    }

    async fn suggest_substitutions(
        &self,
        original_ingredient: &str,
        dietary_restrictions: &[String],
        available_ingredients: &[String],
    ) -> AppResult<Vec<Value>> {
        match self {
            Self::Ollama(p) => {
                p.suggest_substitutions(
                    original_ingredient,
                    dietary_restrictions,
                    available_ingredients,
                )
                .await
            }
            Self::OpenAi(p) => {
                p.suggest_substitutions(
                    original_ingredient,
                    dietary_restrictions,
                    available_ingredients,
                )
                .await
            }
            Self::Anthropic(p) => {
                p.suggest_substitutions(
                    original_ingredient,
                    dietary_restrictions,
                    available_ingredients,
                )
                .await
            }
            Self::ClaudeCli(p) => {
                p.suggest_substitutions(
                    original_ingredient,
                    dietary_restrictions,
                    available_ingredients,
                )
                .await
            }
        }
    }

    async fn parse_voice_input(&self, transcript: &str) -> AppResult<Value> {
        match self {
            Self::Ollama(p) => p.parse_voice_input(transcript).await,
            Self::OpenAi(p) => p.parse_voice_input(transcript).await,
            Self::Anthropic(p) => p.parse_voice_input(transcript).await,
            Self::ClaudeCli(p) => p.parse_voice_input(transcript).await,
        }
    }
}
