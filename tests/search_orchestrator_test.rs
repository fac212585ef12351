// ABOUTME: End-to-end tests for the search orchestrator with scripted provider and store fakes
// ABOUTME: Validates partial-failure semantics, context merging and availability maps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use souschef::ai::{AiProvider, RecipeGenerationRequest};
use souschef::errors::{AppError, AppResult};
use souschef::ingredient_scan::detect_ingredients_from_image;
use souschef::models::{CandidateRecipe, PersistedRecipe};
use souschef::search::{
    parse_voice_ingredients, ContextProvider, RecipeStore, SearchOrchestrator, SearchParams,
    AI_SOURCE_TAG,
};
use souschef::storage::MemoryRecipeStore;

// ============================================================================
// Fakes
// ============================================================================

/// Provider fake returning scripted payloads and recording the last request
#[derive(Default)]
struct ScriptedProvider {
    recipes: Vec<Value>,
    image_response: Value,
    voice_response: Value,
    last_generation_request: Mutex<Option<RecipeGenerationRequest>>,
    fail_generation: bool,
}

impl ScriptedProvider {
    fn with_recipes(recipes: Vec<Value>) -> Self {
        Self {
            recipes,
            ..Self::default()
        }
    }

    fn recorded_request(&self) -> RecipeGenerationRequest {
        self.last_generation_request
            .lock()
            .unwrap()
            .clone()
            .expect("generate_recipes was never called")
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted (Test)"
    }

    async fn generate_recipes(&self, request: &RecipeGenerationRequest) -> AppResult<Vec<Value>> {
        *self.last_generation_request.lock().unwrap() = Some(request.clone());
        if self.fail_generation {
            return Err(AppError::external_service("Scripted", "provider down"));
        }
        Ok(self.recipes.clone())
    }

    async fn identify_ingredients(&self, _image_base64: &str) -> AppResult<Value> {
        Ok(self.image_response.clone())
    }

    async fn suggest_substitutions(
        &self,
        _original_ingredient: &str,
        _dietary_restrictions: &[String],
        _available_ingredients: &[String],
    ) -> AppResult<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn parse_voice_input(&self, _transcript: &str) -> AppResult<Value> {
        Ok(self.voice_response.clone())
    }
}

/// Context fake serving fixed lists
#[derive(Default)]
struct StaticContext {
    inventory: Vec<String>,
    dietary: Vec<String>,
    goals: Vec<String>,
    notes: Vec<String>,
}

#[async_trait]
impl ContextProvider for StaticContext {
    async fn household_ingredient_names(&self, _household_id: &str) -> AppResult<Vec<String>> {
        Ok(self.inventory.clone())
    }

    async fn dietary_preferences(&self, _user_id: &str) -> AppResult<Vec<String>> {
        Ok(self.dietary.clone())
    }

    async fn health_goals(&self, _user_id: &str) -> AppResult<Vec<String>> {
        Ok(self.goals.clone())
    }

    async fn family_dietary_notes(&self, _household_id: &str) -> AppResult<Vec<String>> {
        Ok(self.notes.clone())
    }
}

/// Store fake that rejects candidates with blacklisted titles
struct FlakyStore {
    inner: MemoryRecipeStore,
    reject_titles: HashSet<String>,
}

impl FlakyStore {
    fn rejecting(titles: &[&str]) -> Self {
        Self {
            inner: MemoryRecipeStore::new(),
            reject_titles: titles.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

#[async_trait]
impl RecipeStore for FlakyStore {
    async fn save(
        &self,
        candidate: &CandidateRecipe,
        source: &str,
        image_url: Option<&str>,
    ) -> AppResult<PersistedRecipe> {
        if self.reject_titles.contains(&candidate.title) {
            return Err(AppError::storage("simulated persistence failure"));
        }
        self.inner.save(candidate, source, image_url).await
    }
}

fn raw_recipe(title: &str, ingredients: Value) -> Value {
    json!({
        "title": title,
        "instructions": "Cook it.",
        "ingredients": ingredients,
    })
}

// ============================================================================
// Orchestration
// ============================================================================

#[tokio::test]
async fn test_basic_flow_returns_persisted_recipes() {
    let provider = ScriptedProvider::with_recipes(vec![raw_recipe(
        "Pasta al Limone",
        json!([{"name": "pasta", "quantity": 200, "unit": "g"}]),
    )]);
    let context = StaticContext {
        inventory: vec!["pasta".to_owned()],
        ..StaticContext::default()
    };
    let store = MemoryRecipeStore::new();

    let result = SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("something lemony", "user-1", "house-1"),
            &context,
            &store,
        )
        .await
        .unwrap();

    assert_eq!(result.recipes.len(), 1);
    let recipe = &result.recipes[0];
    assert_eq!(recipe.title, "Pasta al Limone");
    assert_eq!(recipe.source, AI_SOURCE_TAG);
    assert!(recipe.ingredients[0].is_available);
    assert!(result.missing_ingredients.is_empty());
    assert!(result.substitutions.is_empty());

    let saved = store.saved().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, recipe.id);
}

#[tokio::test]
async fn test_persistence_failure_skips_candidate_without_aborting() {
    let provider = ScriptedProvider::with_recipes(vec![
        raw_recipe("Good Soup", json!([])),
        raw_recipe("Cursed Stew", json!([])),
    ]);
    let context = StaticContext::default();
    let store = FlakyStore::rejecting(&["Cursed Stew"]);

    let result = SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("dinner", "user-1", "house-1"),
            &context,
            &store,
        )
        .await
        .unwrap();

    assert_eq!(result.recipes.len(), 1);
    assert_eq!(result.recipes[0].title, "Good Soup");
}

#[tokio::test]
async fn test_empty_provider_result_never_touches_store() {
    let provider = ScriptedProvider::with_recipes(Vec::new());
    let context = StaticContext::default();
    let store = MemoryRecipeStore::new();

    let result = SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("dinner", "user-1", "house-1"),
            &context,
            &store,
        )
        .await
        .unwrap();

    assert!(result.recipes.is_empty());
    assert!(result.missing_ingredients.is_empty());
    assert!(result.substitutions.is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_generation_failure_aborts_search() {
    let provider = ScriptedProvider {
        fail_generation: true,
        ..ScriptedProvider::default()
    };
    let context = StaticContext::default();
    let store = MemoryRecipeStore::new();

    let err = SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("dinner", "user-1", "house-1"),
            &context,
            &store,
        )
        .await
        .unwrap_err();

    assert!(err.is_transport_failure());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_prefer_available_passes_inventory_to_generation() {
    let provider = ScriptedProvider::with_recipes(Vec::new());
    let context = StaticContext {
        inventory: vec!["rice".to_owned(), "beans".to_owned()],
        ..StaticContext::default()
    };
    let store = MemoryRecipeStore::new();

    SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("dinner", "user-1", "house-1").with_prefer_available(true),
            &context,
            &store,
        )
        .await
        .unwrap();

    let request = provider.recorded_request();
    assert_eq!(
        request.available_ingredients,
        vec!["rice".to_owned(), "beans".to_owned()]
    );
}

#[tokio::test]
async fn test_prefer_available_false_passes_empty_list() {
    let provider = ScriptedProvider::with_recipes(Vec::new());
    let context = StaticContext {
        inventory: vec!["rice".to_owned()],
        ..StaticContext::default()
    };
    let store = MemoryRecipeStore::new();

    SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("dinner", "user-1", "house-1").with_prefer_available(false),
            &context,
            &store,
        )
        .await
        .unwrap();

    assert!(provider.recorded_request().available_ingredients.is_empty());
}

#[tokio::test]
async fn test_availability_still_classified_when_generation_ignores_inventory() {
    let provider = ScriptedProvider::with_recipes(vec![raw_recipe(
        "Fried Rice",
        json!([
            {"name": "rice"},
            {"name": "saffron"}
        ]),
    )]);
    let context = StaticContext {
        inventory: vec!["rice".to_owned()],
        ..StaticContext::default()
    };
    let store = MemoryRecipeStore::new();

    let result = SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("dinner", "user-1", "house-1").with_prefer_available(false),
            &context,
            &store,
        )
        .await
        .unwrap();

    let recipe = &result.recipes[0];
    assert!(recipe.ingredients[0].is_available);
    assert!(!recipe.ingredients[1].is_available);
    assert_eq!(
        result.missing_ingredients.get(&recipe.id),
        Some(&vec!["saffron".to_owned()])
    );
}

#[tokio::test]
async fn test_dietary_filter_appended_to_user_preferences() {
    let provider = ScriptedProvider::with_recipes(Vec::new());
    let context = StaticContext {
        dietary: vec!["vegetarian".to_owned()],
        ..StaticContext::default()
    };
    let store = MemoryRecipeStore::new();

    SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("dinner", "user-1", "house-1")
                .with_dietary_filter(vec!["nut-free".to_owned(), "vegetarian".to_owned()]),
            &context,
            &store,
        )
        .await
        .unwrap();

    // Order preserved, duplicates allowed.
    assert_eq!(
        provider.recorded_request().dietary_preferences,
        vec![
            "vegetarian".to_owned(),
            "nut-free".to_owned(),
            "vegetarian".to_owned()
        ]
    );
}

#[tokio::test]
async fn test_substitution_map_populated_from_notes() {
    let provider = ScriptedProvider::with_recipes(vec![raw_recipe(
        "Truffle Pasta",
        json!([
            {"name": "pasta"},
            {"name": "truffle oil", "substitution_notes": "use olive oil instead"}
        ]),
    )]);
    let context = StaticContext {
        inventory: vec!["pasta".to_owned()],
        ..StaticContext::default()
    };
    let store = MemoryRecipeStore::new();

    let result = SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("fancy pasta", "user-1", "house-1"),
            &context,
            &store,
        )
        .await
        .unwrap();

    let recipe = &result.recipes[0];
    assert!(result.missing_ingredients.is_empty());
    let suggestions = result.substitutions.get(&recipe.id).unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].substitute, "use olive oil instead");
    assert!(recipe.ingredients[1].has_substitution);
}

#[tokio::test]
async fn test_optional_unavailable_ingredient_in_neither_map() {
    let provider = ScriptedProvider::with_recipes(vec![raw_recipe(
        "Herb Omelette",
        json!([
            {"name": "eggs"},
            {"name": "chives", "is_optional": true}
        ]),
    )]);
    let context = StaticContext {
        inventory: vec!["eggs".to_owned()],
        ..StaticContext::default()
    };
    let store = MemoryRecipeStore::new();

    let result = SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("breakfast", "user-1", "house-1"),
            &context,
            &store,
        )
        .await
        .unwrap();

    assert!(result.missing_ingredients.is_empty());
    assert!(result.substitutions.is_empty());
}

#[tokio::test]
async fn test_generation_request_carries_all_context() {
    let provider = ScriptedProvider::with_recipes(Vec::new());
    let context = StaticContext {
        inventory: vec!["tofu".to_owned()],
        dietary: vec!["vegan".to_owned()],
        goals: vec!["more protein".to_owned()],
        notes: vec!["son allergic to peanuts".to_owned()],
    };
    let store = MemoryRecipeStore::new();

    SearchOrchestrator::new(&provider)
        .search(
            &SearchParams::new("high protein dinner", "user-1", "house-1")
                .with_max_results(7)
                .with_max_prep_time(Some(45))
                .with_cuisine(Some("Korean".to_owned())),
            &context,
            &store,
        )
        .await
        .unwrap();

    let request = provider.recorded_request();
    assert_eq!(request.prompt, "high protein dinner");
    assert_eq!(request.max_results, 7);
    assert_eq!(request.max_prep_time, Some(45));
    assert_eq!(request.cuisine.as_deref(), Some("Korean"));
    assert_eq!(request.health_goals, vec!["more protein".to_owned()]);
    assert_eq!(
        request.family_dietary_notes,
        vec!["son allergic to peanuts".to_owned()]
    );
}

// ============================================================================
// Voice parse and camera scan conveniences
// ============================================================================

#[tokio::test]
async fn test_parse_voice_ingredients_reconciles_quantities() {
    let provider = ScriptedProvider {
        voice_response: json!({
            "ingredients": [
                {"name": "chicken", "quantity": 2, "unit": "pounds"},
                {"name": "eggs", "quantity": "12", "unit": null},
                {"name": "", "quantity": 1, "unit": "cup"},
                {"name": "milk", "quantity": "1 gallon", "unit": null}
            ]
        }),
        ..ScriptedProvider::default()
    };

    let parsed = parse_voice_ingredients(&provider, "shopping haul").await.unwrap();

    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].name, "chicken");
    assert_eq!(parsed[0].quantity.value, Some(2.0));
    assert_eq!(parsed[0].quantity.unit.as_deref(), Some("pounds"));
    assert_eq!(parsed[1].quantity.value, Some(12.0));
    assert_eq!(parsed[1].quantity.unit, None);
    assert_eq!(parsed[2].quantity.value, Some(1.0));
    assert_eq!(parsed[2].quantity.unit.as_deref(), Some("gallon"));
}

#[tokio::test]
async fn test_scan_backfills_missing_confidence_scores() {
    let provider = ScriptedProvider {
        image_response: json!({
            "ingredients": ["tomato", "basil"]
        }),
        ..ScriptedProvider::default()
    };

    let result = detect_ingredients_from_image(&provider, "aW1hZ2U=").await.unwrap();

    assert_eq!(result.detected_ingredients, vec!["tomato", "basil"]);
    assert_eq!(result.confidence_scores.len(), 2);
    assert!((result.confidence_scores["tomato"] - 0.8).abs() < f64::EPSILON);
    assert!((result.confidence_scores["basil"] - 0.8).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_scan_keeps_provider_confidence_scores() {
    let provider = ScriptedProvider {
        image_response: json!({
            "ingredients": ["tomato"],
            "confidence_scores": {"tomato": 0.95}
        }),
        ..ScriptedProvider::default()
    };

    let result = detect_ingredients_from_image(&provider, "aW1hZ2U=").await.unwrap();
    assert!((result.confidence_scores["tomato"] - 0.95).abs() < f64::EPSILON);
}
