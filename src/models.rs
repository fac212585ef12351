// ABOUTME: Core data model for candidate and persisted recipes
// ABOUTME: Defines ingredient, recipe, scan and substitution value types shared across the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Data Model
//!
//! All in-core entities are created, transformed and discarded within a
//! single search invocation; only the storage collaborator assigns durable
//! identity. No entity is mutated after construction - transformation
//! produces new values.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::measurement::Quantity;

/// One normalized ingredient of a candidate recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateIngredient {
    /// Ingredient name (never empty after normalization)
    pub name: String,
    /// Parsed quantity and unit
    #[serde(flatten)]
    pub quantity: Quantity,
    /// Whether the recipe works without this ingredient
    #[serde(default)]
    pub is_optional: bool,
    /// Free-text substitution hint supplied by the provider
    #[serde(default)]
    pub substitution_notes: Option<String>,
}

/// An unpersisted, normalized recipe produced by an AI provider or the bulk
/// importer for one generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecipe {
    /// Recipe title (placeholder when the provider omitted one)
    pub title: String,
    /// Short description
    pub description: Option<String>,
    /// Step-by-step instructions, flattened to a single string
    pub instructions: String,
    /// Cuisine label
    pub cuisine: Option<String>,
    /// Meal type (breakfast, dinner, ...)
    pub meal_type: Option<String>,
    /// Preparation time in minutes
    pub prep_time_minutes: Option<i64>,
    /// Cooking time in minutes
    pub cook_time_minutes: Option<i64>,
    /// Number of servings
    pub servings: Option<i64>,
    /// Difficulty label
    pub difficulty: Option<String>,
    /// Comma-separated dietary tags
    pub dietary_tags: Option<String>,
    /// Estimated calories per serving
    pub calorie_estimate: Option<i64>,
    /// Normalized ingredient list
    pub ingredients: Vec<CandidateIngredient>,
}

/// A recipe after the storage collaborator assigned durable identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecipe {
    /// Generated identifier
    pub id: Uuid,
    /// Recipe title
    pub title: String,
    /// Short description
    pub description: Option<String>,
    /// Step-by-step instructions
    pub instructions: String,
    /// Cuisine label
    pub cuisine: Option<String>,
    /// Meal type
    pub meal_type: Option<String>,
    /// Preparation time in minutes
    pub prep_time_minutes: Option<i64>,
    /// Cooking time in minutes
    pub cook_time_minutes: Option<i64>,
    /// Number of servings
    pub servings: Option<i64>,
    /// Difficulty label
    pub difficulty: Option<String>,
    /// Comma-separated dietary tags
    pub dietary_tags: Option<String>,
    /// Estimated calories per serving
    pub calorie_estimate: Option<i64>,
    /// Origin of the record (`"ai_generated"`, `"themealdb"`, ...)
    pub source: String,
    /// Image URL, when the origin supplied one
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Stored ingredient list
    pub ingredients: Vec<CandidateIngredient>,
}

impl PersistedRecipe {
    /// Assign identity to a candidate, echoing all normalized fields
    #[must_use]
    pub fn from_candidate(
        candidate: &CandidateRecipe,
        source: &str,
        image_url: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: candidate.title.clone(),
            description: candidate.description.clone(),
            instructions: candidate.instructions.clone(),
            cuisine: candidate.cuisine.clone(),
            meal_type: candidate.meal_type.clone(),
            prep_time_minutes: candidate.prep_time_minutes,
            cook_time_minutes: candidate.cook_time_minutes,
            servings: candidate.servings,
            difficulty: candidate.difficulty.clone(),
            dietary_tags: candidate.dietary_tags.clone(),
            calorie_estimate: candidate.calorie_estimate,
            source: source.to_owned(),
            image_url: image_url.map(str::to_owned),
            created_at: Utc::now(),
            ingredients: candidate.ingredients.clone(),
        }
    }
}

/// Per-ingredient view annotated with the matcher's availability flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientStatus {
    /// Ingredient name
    pub name: String,
    /// Parsed quantity and unit
    #[serde(flatten)]
    pub quantity: Quantity,
    /// Whether the recipe works without this ingredient
    pub is_optional: bool,
    /// Free-text substitution hint
    pub substitution_notes: Option<String>,
    /// Whether the household inventory covers this ingredient
    pub is_available: bool,
    /// Whether a substitution note is present
    pub has_substitution: bool,
}

/// A persisted recipe enriched with per-ingredient availability flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Durable identifier assigned by storage
    pub id: Uuid,
    /// Recipe title
    pub title: String,
    /// Short description
    pub description: Option<String>,
    /// Step-by-step instructions
    pub instructions: String,
    /// Cuisine label
    pub cuisine: Option<String>,
    /// Meal type
    pub meal_type: Option<String>,
    /// Preparation time in minutes
    pub prep_time_minutes: Option<i64>,
    /// Cooking time in minutes
    pub cook_time_minutes: Option<i64>,
    /// Number of servings
    pub servings: Option<i64>,
    /// Difficulty label
    pub difficulty: Option<String>,
    /// Image URL
    pub image_url: Option<String>,
    /// Origin of the record
    pub source: String,
    /// Comma-separated dietary tags
    pub dietary_tags: Option<String>,
    /// Estimated calories per serving
    pub calorie_estimate: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Ingredients annotated with availability flags
    pub ingredients: Vec<RecipeIngredientStatus>,
}

impl RecipeRecord {
    /// Build the enriched view from a persisted recipe and its annotated
    /// ingredient statuses
    #[must_use]
    pub fn from_persisted(
        recipe: PersistedRecipe,
        ingredients: Vec<RecipeIngredientStatus>,
    ) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            instructions: recipe.instructions,
            cuisine: recipe.cuisine,
            meal_type: recipe.meal_type,
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            image_url: recipe.image_url,
            source: recipe.source,
            dietary_tags: recipe.dietary_tags,
            calorie_estimate: recipe.calorie_estimate,
            created_at: recipe.created_at,
            ingredients,
        }
    }
}

/// A suggested replacement for an ingredient the household does not have
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionSuggestion {
    /// The ingredient being replaced
    pub original_ingredient: String,
    /// The suggested substitute
    pub substitute: String,
    /// Usage notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Replacement ratio, e.g. `"1:1"`
    #[serde(default)]
    pub ratio: Option<String>,
}

/// Aggregate result of one AI recipe search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Persisted recipes, provider order, minus any that failed persistence
    pub recipes: Vec<RecipeRecord>,
    /// Required-but-unavailable ingredient names, keyed by recipe id
    pub missing_ingredients: HashMap<Uuid, Vec<String>>,
    /// Substitution suggestions, keyed by recipe id
    pub substitutions: HashMap<Uuid, Vec<SubstitutionSuggestion>>,
}

/// Result of identifying ingredients from a camera image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientScanResult {
    /// Detected ingredient names
    pub detected_ingredients: Vec<String>,
    /// Confidence score (0-1) per detected ingredient
    pub confidence_scores: HashMap<String, f64>,
}

/// One ingredient extracted from a voice transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedVoiceIngredient {
    /// Ingredient name
    pub name: String,
    /// Reconciled quantity and unit
    #[serde(flatten)]
    pub quantity: Quantity,
}
