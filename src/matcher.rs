// ABOUTME: Classifies candidate recipe ingredients against household inventory
// ABOUTME: Partitions unavailable ingredients into missing vs substitutable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Ingredient Availability Matcher
//!
//! Classifies each normalized ingredient of a candidate recipe against the
//! household's current inventory names. An unavailable ingredient is
//! *missing* when it is required and carries no substitution note, and
//! *substitutable* when it is required and does carry one. Optional
//! ingredients are silently permitted either way.
//!
//! The precedence (optional > has-note > missing) is deliberate: an
//! ingredient that is both optional and carries a note lands in neither
//! bucket. Classification is derived fresh on every search and never stored.

use std::collections::HashSet;

use crate::models::{CandidateIngredient, RecipeIngredientStatus, SubstitutionSuggestion};

/// The matcher's verdict for one recipe
#[derive(Debug, Clone, Default)]
pub struct RecipeAvailability {
    /// Every ingredient, input order, annotated with availability flags
    pub ingredients: Vec<RecipeIngredientStatus>,
    /// Required ingredients the household lacks, with no substitute on offer
    pub missing: Vec<String>,
    /// Required-but-unavailable ingredients that carry a substitution note
    pub substitutions: Vec<SubstitutionSuggestion>,
}

/// Case-fold household inventory names into a lookup set
#[must_use]
pub fn fold_inventory(names: &[String]) -> HashSet<String> {
    names.iter().map(|n| n.to_lowercase()).collect()
}

/// Classify a recipe's ingredients against a case-folded household set
#[must_use]
pub fn classify(
    ingredients: &[CandidateIngredient],
    household: &HashSet<String>,
) -> RecipeAvailability {
    let mut availability = RecipeAvailability::default();

    for ingredient in ingredients {
        let is_available = household.contains(&ingredient.name.to_lowercase());
        let has_substitution = ingredient
            .substitution_notes
            .as_deref()
            .is_some_and(|notes| !notes.is_empty());

        if !is_available && !ingredient.is_optional {
            if has_substitution {
                availability.substitutions.push(SubstitutionSuggestion {
                    original_ingredient: ingredient.name.clone(),
                    substitute: ingredient.substitution_notes.clone().unwrap_or_default(),
                    notes: Some(format!("Substitute available for {}", ingredient.name)),
                    ratio: None,
                });
            } else {
                availability.missing.push(ingredient.name.clone());
            }
        }

        availability.ingredients.push(RecipeIngredientStatus {
            name: ingredient.name.clone(),
            quantity: ingredient.quantity.clone(),
            is_optional: ingredient.is_optional,
            substitution_notes: ingredient.substitution_notes.clone(),
            is_available,
            has_substitution,
        });
    }

    availability
}
