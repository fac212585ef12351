// ABOUTME: Unit tests for TheMealDB transformation and the JSON-lines store
// ABOUTME: Uses a slot-numbered feed fixture mirroring the real API shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::{json, Map, Value};

use souschef::mealdb::{extract_ingredients, transform_meal, MEALDB_SOURCE_TAG};
use souschef::models::PersistedRecipe;
use souschef::normalize::UNTITLED_RECIPE;
use souschef::search::RecipeStore;
use souschef::storage::JsonlRecipeStore;

/// Minimal TheMealDB meal fixture with all 20 slots populated
fn sample_meal() -> Value {
    let mut meal = Map::new();
    meal.insert("idMeal".into(), json!("52772"));
    meal.insert("strMeal".into(), json!("Teriyaki Chicken Casserole"));
    meal.insert("strCategory".into(), json!("Chicken"));
    meal.insert("strArea".into(), json!("Japanese"));
    meal.insert(
        "strInstructions".into(),
        json!("Preheat oven to 350.\nCombine ingredients."),
    );
    meal.insert(
        "strMealThumb".into(),
        json!("https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg"),
    );
    meal.insert("strTags".into(), json!("Meat,Casserole"));
    meal.insert(
        "strYoutube".into(),
        json!("https://www.youtube.com/watch?v=4aZr5hZXP_s"),
    );
    meal.insert("strIngredient1".into(), json!("soy sauce"));
    meal.insert("strIngredient2".into(), json!("water"));
    meal.insert("strIngredient3".into(), json!("brown sugar"));
    meal.insert("strMeasure1".into(), json!("3/4 cup"));
    meal.insert("strMeasure2".into(), json!("1/2 cup"));
    meal.insert("strMeasure3".into(), json!("1/4 cup"));
    for i in 4..=20 {
        meal.insert(format!("strIngredient{i}"), json!(""));
        meal.insert(format!("strMeasure{i}"), json!(""));
    }
    Value::Object(meal)
}

#[test]
fn test_extracts_non_empty_ingredients() {
    let ingredients = extract_ingredients(&sample_meal());
    assert_eq!(ingredients.len(), 3);
    assert_eq!(ingredients[0].name, "soy sauce");
    assert_eq!(ingredients[1].name, "water");
    assert_eq!(ingredients[2].name, "brown sugar");
}

#[test]
fn test_measure_parsing_applied() {
    let ingredients = extract_ingredients(&sample_meal());
    assert_eq!(ingredients[0].quantity.value, Some(0.75));
    assert_eq!(ingredients[0].quantity.unit.as_deref(), Some("cup"));
    assert_eq!(ingredients[1].quantity.value, Some(0.5));
}

#[test]
fn test_imported_ingredients_are_required_and_noteless() {
    for ingredient in extract_ingredients(&sample_meal()) {
        assert!(!ingredient.is_optional);
        assert!(ingredient.substitution_notes.is_none());
    }
}

#[test]
fn test_transform_meal_maps_fields() {
    let recipe = transform_meal(&sample_meal());
    let candidate = &recipe.candidate;

    assert_eq!(candidate.title, "Teriyaki Chicken Casserole");
    assert_eq!(candidate.cuisine.as_deref(), Some("Japanese"));
    assert_eq!(candidate.meal_type.as_deref(), Some("Chicken"));
    assert_eq!(candidate.dietary_tags.as_deref(), Some("Meat,Casserole"));
    assert_eq!(
        candidate.instructions,
        "Preheat oven to 350.\nCombine ingredients."
    );
    assert_eq!(candidate.prep_time_minutes, None);
    assert_eq!(candidate.servings, None);
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg")
    );

    let description = candidate.description.as_deref().unwrap();
    assert!(description.contains("Japanese chicken dish"));
    assert!(description.contains("Video: https://www.youtube.com/watch?v=4aZr5hZXP_s"));
}

#[test]
fn test_transform_meal_untitled_placeholder() {
    let recipe = transform_meal(&json!({"strMeal": "  "}));
    assert_eq!(recipe.candidate.title, UNTITLED_RECIPE);
    assert_eq!(recipe.candidate.description, None);
    assert!(recipe.candidate.ingredients.is_empty());
}

#[test]
fn test_description_without_video() {
    let recipe = transform_meal(&json!({
        "strMeal": "Plain Dish",
        "strArea": "French"
    }));
    assert_eq!(recipe.candidate.description.as_deref(), Some("French dish"));
}

// ============================================================================
// JSON-lines store
// ============================================================================

#[tokio::test]
async fn test_jsonl_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.jsonl");
    let store = JsonlRecipeStore::new(&path);

    let recipe = transform_meal(&sample_meal());
    let saved = store
        .save(
            &recipe.candidate,
            MEALDB_SOURCE_TAG,
            recipe.image_url.as_deref(),
        )
        .await
        .unwrap();

    assert_eq!(saved.source, MEALDB_SOURCE_TAG);
    assert_eq!(saved.title, "Teriyaki Chicken Casserole");

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let restored: PersistedRecipe = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(restored.id, saved.id);
    assert_eq!(restored.ingredients.len(), 3);
    assert_eq!(restored.ingredients[0].quantity.value, Some(0.75));
}

#[tokio::test]
async fn test_jsonl_store_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.jsonl");
    let store = JsonlRecipeStore::new(&path);

    let recipe = transform_meal(&sample_meal());
    store
        .save(&recipe.candidate, MEALDB_SOURCE_TAG, None)
        .await
        .unwrap();
    store
        .save(&recipe.candidate, MEALDB_SOURCE_TAG, None)
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}
