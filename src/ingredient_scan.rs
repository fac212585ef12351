// ABOUTME: Camera-scan convenience turning raw provider output into an IngredientScanResult
// ABOUTME: Backfills missing confidence scores with a default per detected ingredient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Ingredient Scan
//!
//! Thin use case over the gateway's image identification operation: reads
//! the ingredient-name array and confidence map out of the provider's JSON
//! object and backfills a default confidence when the provider returned
//! names without scores.

use std::collections::HashMap;

use serde_json::Value;

use crate::ai::AiProvider;
use crate::errors::AppResult;
use crate::models::IngredientScanResult;

/// Confidence assigned when the provider omitted per-ingredient scores
const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Identify ingredients visible in a base64-encoded camera image
///
/// # Errors
///
/// Returns an error when the provider call fails or its output carries no
/// extractable JSON.
pub async fn detect_ingredients_from_image(
    ai: &dyn AiProvider,
    image_base64: &str,
) -> AppResult<IngredientScanResult> {
    let result = ai.identify_ingredients(image_base64).await?;

    let detected_ingredients: Vec<String> = result
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let mut confidence_scores: HashMap<String, f64> = result
        .get("confidence_scores")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(name, score)| score.as_f64().map(|s| (name.clone(), s)))
                .collect()
        })
        .unwrap_or_default();

    if confidence_scores.is_empty() && !detected_ingredients.is_empty() {
        confidence_scores = detected_ingredients
            .iter()
            .map(|name| (name.clone(), DEFAULT_CONFIDENCE))
            .collect();
    }

    Ok(IngredientScanResult {
        detected_ingredients,
        confidence_scores,
    })
}
