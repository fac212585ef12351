// ABOUTME: Top-level recipe search use case tying gateway, normalizer, storage and matcher together
// ABOUTME: Per-candidate persistence failures are skipped and logged, never aborting the batch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Search Orchestrator
//!
//! The top-level use case: gather household/user context, issue the
//! generation request through the selected AI provider, then normalize,
//! persist and classify each candidate in provider order.
//!
//! Processing is deliberately sequential - each candidate is handled fully
//! (normalize, persist, classify) before the next begins, which bounds the
//! failure blast radius to one candidate and keeps log ordering and
//! partial-result semantics deterministic. A provider failure on the
//! generation call aborts the whole search; a storage failure on an
//! individual candidate only drops that candidate. An empty recipe list is a
//! valid, non-error outcome.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::ai::{AiProvider, RecipeGenerationRequest};
use crate::errors::AppResult;
use crate::matcher;
use crate::models::{
    CandidateRecipe, ParsedVoiceIngredient, PersistedRecipe, RecipeRecord, SearchResult,
};
use crate::{measurement, normalize};

/// Source tag recorded on AI-generated recipes
pub const AI_SOURCE_TAG: &str = "ai_generated";

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Read-only household/user context queries
///
/// Backed by whatever persistence layer the application uses; the
/// orchestrator only consumes these four lists.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Names of the ingredients the household currently has
    async fn household_ingredient_names(&self, household_id: &str) -> AppResult<Vec<String>>;

    /// The user's dietary preference values (restrictions and allergies)
    async fn dietary_preferences(&self, user_id: &str) -> AppResult<Vec<String>>;

    /// The user's health-goal descriptions
    async fn health_goals(&self, user_id: &str) -> AppResult<Vec<String>>;

    /// Household members' dietary notes, nulls excluded
    async fn family_dietary_notes(&self, household_id: &str) -> AppResult<Vec<String>>;
}

/// Recipe persistence collaborator
///
/// Assigns durable identity and echoes all normalized fields. May fail on
/// any save; the orchestrator treats a per-candidate failure as
/// skip-and-continue.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Persist a candidate recipe under the given source tag
    async fn save(
        &self,
        candidate: &CandidateRecipe,
        source: &str,
        image_url: Option<&str>,
    ) -> AppResult<PersistedRecipe>;
}

// ============================================================================
// Search Parameters
// ============================================================================

/// Caller-supplied parameters for one search invocation
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// The user's free-text cooking request
    pub prompt: String,
    /// Requesting user id
    pub user_id: String,
    /// Household whose inventory is matched
    pub household_id: String,
    /// How many recipes to request from the provider
    pub max_results: u32,
    /// Pass the inventory to generation so recipes favor what's on hand
    pub prefer_available: bool,
    /// Optional preparation-time ceiling in minutes
    pub max_prep_time: Option<u32>,
    /// Optional cuisine filter
    pub cuisine: Option<String>,
    /// Extra dietary restrictions for this search only
    pub dietary_filter: Vec<String>,
}

impl SearchParams {
    /// Create parameters with defaults (5 results, prefer available)
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        user_id: impl Into<String>,
        household_id: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            user_id: user_id.into(),
            household_id: household_id.into(),
            max_results: RecipeGenerationRequest::DEFAULT_MAX_RESULTS,
            prefer_available: true,
            max_prep_time: None,
            cuisine: None,
            dietary_filter: Vec::new(),
        }
    }

    /// Set the number of recipes to request
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set whether generation should favor available ingredients
    #[must_use]
    pub const fn with_prefer_available(mut self, prefer: bool) -> Self {
        self.prefer_available = prefer;
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

    /// Set the per-search dietary filter
    #[must_use]
    pub fn with_dietary_filter(mut self, filter: Vec<String>) -> Self {
        self.dietary_filter = filter;
        self
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// The recipe search use case
pub struct SearchOrchestrator<'a> {
    ai: &'a dyn AiProvider,
}

impl<'a> SearchOrchestrator<'a> {
    /// Create an orchestrator over the given AI provider
    #[must_use]
    pub const fn new(ai: &'a dyn AiProvider) -> Self {
        Self { ai }
    }

    /// Run one search end to end
    ///
    /// # Errors
    ///
    /// Returns an error when a context query fails, when the provider's
    /// generation call fails, or when its output carries no extractable
    /// JSON. Per-candidate persistence failures are absorbed: the candidate
    /// is logged and dropped, and processing continues.
    #[instrument(skip_all, fields(provider = self.ai.name(), user_id = %params.user_id, household_id = %params.household_id))]
    pub async fn search(
        &self,
        params: &SearchParams,
        context: &dyn ContextProvider,
        store: &dyn RecipeStore,
    ) -> AppResult<SearchResult> {
        let available = context
            .household_ingredient_names(&params.household_id)
            .await?;
        let dietary_preferences = context.dietary_preferences(&params.user_id).await?;
        let health_goals = context.health_goals(&params.user_id).await?;
        let family_notes = context.family_dietary_notes(&params.household_id).await?;

        // Union of stored preferences and the caller's filter, order
        // preserved, duplicates allowed.
        let mut all_dietary = dietary_preferences;
        all_dietary.extend(params.dietary_filter.iter().cloned());

        let generation_ingredients = if params.prefer_available {
            available.clone()
        } else {
            Vec::new()
        };

        let request = RecipeGenerationRequest::new(params.prompt.clone())
            .with_available_ingredients(generation_ingredients)
            .with_dietary_preferences(all_dietary)
            .with_health_goals(health_goals)
            .with_family_dietary_notes(family_notes)
            .with_max_results(params.max_results)
            .with_max_prep_time(params.max_prep_time)
            .with_cuisine(params.cuisine.clone());

        let raw_recipes = self.ai.generate_recipes(&request).await?;
        debug!("Provider returned {} raw candidates", raw_recipes.len());

        // Availability classification always runs against the real
        // inventory, even when generation ignored it.
        let household = matcher::fold_inventory(&available);
        let mut result = SearchResult::default();

        for raw in &raw_recipes {
            let candidate = normalize::candidate_from_raw(raw);

            let saved = match store.save(&candidate, AI_SOURCE_TAG, None).await {
                Ok(saved) => saved,
                Err(err) => {
                    warn!(
                        title = %candidate.title,
                        error = %err,
                        "Failed to persist candidate recipe, skipping"
                    );
                    continue;
                }
            };

            let availability = matcher::classify(&saved.ingredients, &household);

            if !availability.missing.is_empty() {
                result
                    .missing_ingredients
                    .insert(saved.id, availability.missing.clone());
            }
            if !availability.substitutions.is_empty() {
                result
                    .substitutions
                    .insert(saved.id, availability.substitutions.clone());
            }

            result
                .recipes
                .push(RecipeRecord::from_persisted(saved, availability.ingredients));
        }

        info!(
            recipes = result.recipes.len(),
            requested = raw_recipes.len(),
            "Recipe search complete"
        );

        Ok(result)
    }
}

/// Parse a voice transcript into structured ingredient entries
///
/// Each entry's quantity/unit pair runs through
/// [`measurement::reconcile`]; entries without a usable name are dropped.
///
/// # Errors
///
/// Returns an error when the provider call fails or its output carries no
/// extractable JSON.
pub async fn parse_voice_ingredients(
    ai: &dyn AiProvider,
    transcript: &str,
) -> AppResult<Vec<ParsedVoiceIngredient>> {
    let value = ai.parse_voice_input(transcript).await?;

    let entries = match value.get("ingredients") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let name = normalize::safe_str(entry.get("name"))?;
            let unit = normalize::safe_str(entry.get("unit"));
            Some(ParsedVoiceIngredient {
                name,
                quantity: measurement::reconcile(entry.get("quantity"), unit.as_deref()),
            })
        })
        .collect())
}
