// ABOUTME: TheMealDB fetch and transformation utilities for the bulk importer
// ABOUTME: Maps slot-numbered ingredient/measure pairs into the candidate recipe schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # TheMealDB Import
//!
//! Fetches recipes from the free TheMealDB API (test key `"1"`) and
//! transforms them into the same [`CandidateRecipe`] shape the AI pipeline
//! produces, so the storage collaborator's `save` contract is reused
//! unchanged. The feed's measure strings (`"3/4 cup"`, `"300g"`,
//! `"To taste"`) run through the shared measurement parser.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppResult;
use crate::measurement;
use crate::models::{CandidateIngredient, CandidateRecipe};
use crate::normalize::UNTITLED_RECIPE;

/// TheMealDB API root (free test key)
pub const BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Source tag recorded on imported recipes
pub const MEALDB_SOURCE_TAG: &str = "themealdb";

/// Highest ingredient/measure slot number in the feed's schema
const MAX_INGREDIENT_SLOTS: usize = 20;

/// A transformed feed entry: the candidate plus its thumbnail URL
///
/// The image URL is carried separately because it is a `save` argument, not
/// part of the candidate schema.
#[derive(Debug, Clone)]
pub struct MealDbRecipe {
    /// The normalized candidate
    pub candidate: CandidateRecipe,
    /// Meal thumbnail URL, when present
    pub image_url: Option<String>,
}

/// Transform one raw TheMealDB meal object into a candidate recipe
#[must_use]
pub fn transform_meal(meal: &Value) -> MealDbRecipe {
    let title = str_field(meal, "strMeal").unwrap_or_else(|| UNTITLED_RECIPE.to_owned());

    MealDbRecipe {
        candidate: CandidateRecipe {
            title,
            description: build_description(meal),
            instructions: str_field(meal, "strInstructions").unwrap_or_default(),
            cuisine: str_field(meal, "strArea"),
            meal_type: str_field(meal, "strCategory"),
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
            difficulty: None,
            dietary_tags: str_field(meal, "strTags"),
            calorie_estimate: None,
            ingredients: extract_ingredients(meal),
        },
        image_url: str_field(meal, "strMealThumb"),
    }
}

/// Extract ingredients from the feed's `strIngredient1`-`strIngredient20` /
/// `strMeasure1`-`strMeasure20` slots, skipping empty names
#[must_use]
pub fn extract_ingredients(meal: &Value) -> Vec<CandidateIngredient> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = str_field(meal, &format!("strIngredient{slot}"))?;
            let measure = str_field(meal, &format!("strMeasure{slot}")).unwrap_or_default();
            Some(CandidateIngredient {
                name,
                quantity: measurement::parse(&measure),
                is_optional: false,
                substitution_notes: None,
            })
        })
        .collect()
}

/// Build a description from area, category and the video link
fn build_description(meal: &Value) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    let area = str_field(meal, "strArea");
    let category = str_field(meal, "strCategory");
    match (area, category) {
        (Some(area), Some(category)) => {
            parts.push(format!("{area} {} dish", category.to_lowercase()));
        }
        (Some(area), None) => parts.push(format!("{area} dish")),
        (None, Some(category)) => parts.push(format!("{category} dish")),
        (None, None) => {}
    }

    if let Some(youtube) = str_field(meal, "strYoutube") {
        parts.push(format!("Video: {youtube}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(". "))
    }
}

fn str_field(meal: &Value, key: &str) -> Option<String> {
    let trimmed = meal.get(key)?.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Fetch all meals by iterating the search-by-letter endpoint (a-z)
///
/// Per-letter failures are logged and skipped; meals are de-duplicated by
/// their feed id. A polite delay runs between requests.
///
/// # Errors
///
/// Currently infallible per letter (failures degrade to skips); the result
/// is `Ok` even when every letter failed.
pub async fn fetch_all_meals(client: &Client, delay: Duration) -> AppResult<Vec<Value>> {
    let mut all_meals: Vec<Value> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for letter in 'a'..='z' {
        let url = format!("{BASE_URL}/search.php?f={letter}");

        let data: Value = match fetch_letter(client, &url).await {
            Ok(data) => data,
            Err(err) => {
                warn!(letter = %letter, error = %err, "Failed to fetch letter, skipping");
                continue;
            }
        };

        if let Some(meals) = data.get("meals").and_then(Value::as_array) {
            for meal in meals {
                let Some(meal_id) = meal.get("idMeal").and_then(Value::as_str) else {
                    continue;
                };
                if seen_ids.insert(meal_id.to_owned()) {
                    all_meals.push(meal.clone());
                }
            }
        }

        if letter != 'z' {
            tokio::time::sleep(delay).await;
        }
    }

    info!("Fetched {} unique meals from TheMealDB", all_meals.len());
    Ok(all_meals)
}

async fn fetch_letter(client: &Client, url: &str) -> Result<Value, reqwest::Error> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}
