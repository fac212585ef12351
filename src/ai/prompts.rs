// ABOUTME: Shared prompt templates rendered identically across all AI provider variants
// ABOUTME: Embeds allergy-safety directives and output-schema documentation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Prompt Templates
//!
//! Four pure template functions, one per gateway operation, shared by every
//! provider variant so prompt content is identical regardless of transport.
//!
//! Dietary/allergy violations are a correctness-critical failure mode
//! distinct from ordinary recipe-quality issues; the recipe template gives
//! the exclusion block maximal salience and repeats every listed restriction
//! verbatim, regardless of provider.

use super::RecipeGenerationRequest;

/// Render the recipe-generation instructions for a request
#[must_use]
pub fn build_recipe_prompt(request: &RecipeGenerationRequest) -> String {
    let mut parts = vec![
        "You are SousChef, a personalized eating lifestyle assistant. Generate recipe suggestions as JSON.".to_owned(),
        format!("\nUser request: {}", request.prompt),
        format!(
            "\nAvailable ingredients: {}",
            if request.available_ingredients.is_empty() {
                "Not specified".to_owned()
            } else {
                request.available_ingredients.join(", ")
            }
        ),
    ];

    if !request.dietary_preferences.is_empty() {
        parts.push(format!(
            "\n*** CRITICAL SAFETY REQUIREMENT - ALLERGIES AND DIETARY RESTRICTIONS ***\n\
             The following dietary restrictions and allergies MUST be strictly respected.\n\
             Allergies are ABSOLUTE - NEVER include any ingredient that a user or family \
             member is allergic to, not even as an optional ingredient or substitution.\n\
             Dietary restrictions: {}\n\
             Failure to respect these could cause serious harm.",
            request.dietary_preferences.join(", ")
        ));
    }
    if !request.health_goals.is_empty() {
        parts.push(format!(
            "Health goals (give preference to): {}",
            request.health_goals.join(", ")
        ));
    }
    if !request.family_dietary_notes.is_empty() {
        parts.push(format!(
            "Family dietary notes (MUST respect - these may include allergies): {}",
            request.family_dietary_notes.join(", ")
        ));
    }
    if !request.favorite_cuisines.is_empty() {
        parts.push(format!(
            "Preferred cuisines: {}",
            request.favorite_cuisines.join(", ")
        ));
    }
    if let Some(minutes) = request.max_prep_time {
        parts.push(format!("Maximum prep time: {minutes} minutes"));
    }
    if let Some(cuisine) = &request.cuisine {
        parts.push(format!("Cuisine filter: {cuisine}"));
    }

    parts.push(format!(
        "\nReturn exactly {} recipes as a JSON array.",
        request.max_results
    ));
    parts.push(
        "Each recipe object must have: \"title\", \"description\", \"instructions\" (step by step), \
         \"cuisine\", \"meal_type\", \"prep_time_minutes\", \"cook_time_minutes\", \"servings\", \
         \"difficulty\", \"dietary_tags\" (comma-separated string), \"calorie_estimate\", \
         and \"ingredients\" (array of objects with \"name\", \"quantity\", \"unit\", \"is_optional\", \
         \"substitution_notes\")."
            .to_owned(),
    );
    parts.push(
        "\nFor each ingredient, indicate if a substitution is available when the user \
         doesn't have it. Prioritize recipes using available ingredients."
            .to_owned(),
    );
    parts.push("\nRespond with ONLY the JSON array, no other text.".to_owned());

    parts.join("\n")
}

/// Render the image ingredient-identification instructions
#[must_use]
pub fn build_image_prompt() -> String {
    "Analyze this image and identify all food ingredients visible. \
     Return a JSON object with: \
     \"ingredients\" (array of ingredient names) and \
     \"confidence_scores\" (object mapping each ingredient name to a confidence 0-1). \
     Only return the JSON, no other text."
        .to_owned()
}

/// Render the ingredient-substitution instructions
#[must_use]
pub fn build_substitution_prompt(
    original_ingredient: &str,
    dietary_restrictions: &[String],
    available_ingredients: &[String],
) -> String {
    format!(
        "Suggest substitutions for '{original_ingredient}' in cooking. \
         Dietary restrictions: {}. \
         Available ingredients: {}. \
         Return a JSON array of objects with \"substitute\", \"notes\", and \"ratio\". \
         Only return the JSON array, no other text.",
        if dietary_restrictions.is_empty() {
            "none".to_owned()
        } else {
            dietary_restrictions.join(", ")
        },
        if available_ingredients.is_empty() {
            "not specified".to_owned()
        } else {
            available_ingredients.join(", ")
        },
    )
}

/// Render the voice-transcript parsing instructions
#[must_use]
pub fn build_voice_parse_prompt(transcript: &str) -> String {
    format!(
        "Parse this voice input about ingredients: '{transcript}'. \
         Extract ingredient names, quantities, and units. \
         Return a JSON object with \"ingredients\" as an array of objects, \
         each with \"name\", \"quantity\" (number or null), and \"unit\" (string or null). \
         Only return the JSON, no other text."
    )
}
