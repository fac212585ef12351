// ABOUTME: Normalizes loosely-structured AI provider output into the internal recipe schema
// ABOUTME: JSON extraction from prose, envelope unwrapping and tolerant field coercion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Response Normalizer
//!
//! AI providers return loosely-structured, inconsistently-shaped text: pure
//! JSON, JSON wrapped in an envelope object, or JSON embedded in surrounding
//! prose; fields arrive as lists or strings, numbers or numeric strings,
//! quantities with embedded units. This module collapses all of those shapes
//! into the internal [`CandidateRecipe`] schema.
//!
//! Extraction failures ([`AppError::malformed_response`]) propagate - the
//! bracket scan in [`extract_json`] is the only tolerance layer at that
//! level. Field coercion failures never propagate: an unparseable int
//! degrades to `None` and an unparseable quantity keeps the original text,
//! preserving information rather than discarding it.

use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::measurement;
use crate::models::{CandidateIngredient, CandidateRecipe, SubstitutionSuggestion};

/// Titles are truncated to this length before storage
pub const MAX_TITLE_LEN: usize = 500;

/// Placeholder for candidates whose title is absent or empty
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Extract the JSON payload from raw model output
///
/// Tolerates leading/trailing prose: takes the first `[` through the last
/// `]` when a `[` appears before any `{`, otherwise the first `{` through
/// the last `}`.
///
/// # Errors
///
/// Returns [`AppError::malformed_response`] when no bracket exists at all or
/// when the located slice fails to decode as JSON.
pub fn extract_json(raw: &str) -> AppResult<Value> {
    let bracket = raw.find('[');
    let brace = raw.find('{');

    let slice = match (bracket, brace) {
        (Some(b), Some(c)) if b < c => slice_between(raw, b, ']'),
        (Some(b), None) => slice_between(raw, b, ']'),
        (_, Some(c)) => slice_between(raw, c, '}'),
        (None, None) => None,
    };

    let Some(slice) = slice else {
        return Err(AppError::malformed_response("No JSON found in response"));
    };

    serde_json::from_str(slice).map_err(|e| {
        AppError::malformed_response(format!("Failed to decode JSON payload: {e}")).with_source(e)
    })
}

fn slice_between(raw: &str, start: usize, close: char) -> Option<&str> {
    let end = raw.rfind(close)?;
    if end < start {
        return None;
    }
    raw.get(start..=end)
}

/// Unwrap a known envelope key into a bare array
///
/// A bare array passes through untouched (idempotent); an object yields the
/// array under `key`, or an empty vector when the key is absent or holds a
/// non-array.
#[must_use]
pub fn unwrap_envelope(value: Value, key: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Coerce an int-ish value: int, float (truncated) or numeric string
///
/// Never fails - anything unparseable becomes `None`.
#[must_use]
pub fn safe_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Coerce a string-ish value: trimmed string, `None` for null/empty
#[must_use]
pub fn safe_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        _ => None,
    }
}

/// Flatten a string-or-list-of-strings field into a single string
///
/// Lists are joined with `separator`; non-string list entries are skipped.
#[must_use]
pub fn join_string_or_list(value: Option<&Value>, separator: &str) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(separator))
            }
        }
        _ => None,
    }
}

/// Transform one raw provider-supplied recipe into the internal schema
#[must_use]
pub fn candidate_from_raw(raw: &Value) -> CandidateRecipe {
    let title = safe_str(raw.get("title")).unwrap_or_else(|| UNTITLED_RECIPE.to_owned());
    let title = truncate_title(&title);

    let ingredients = raw
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(ingredient_from_raw).collect())
        .unwrap_or_default();

    CandidateRecipe {
        title,
        description: join_string_or_list(raw.get("description"), " "),
        instructions: join_string_or_list(raw.get("instructions"), "\n").unwrap_or_default(),
        cuisine: safe_str(raw.get("cuisine")),
        meal_type: safe_str(raw.get("meal_type")),
        prep_time_minutes: safe_int(raw.get("prep_time_minutes")),
        cook_time_minutes: safe_int(raw.get("cook_time_minutes")),
        servings: safe_int(raw.get("servings")),
        difficulty: safe_str(raw.get("difficulty")),
        dietary_tags: join_string_or_list(raw.get("dietary_tags"), ", "),
        calorie_estimate: safe_int(raw.get("calorie_estimate")),
        ingredients,
    }
}

/// Transform one raw provider-supplied ingredient entry
///
/// Quantity and unit run through [`measurement::reconcile`] so an embedded
/// unit (`"1 pound"`) or a fraction string survives, with an explicit unit
/// field always winning.
#[must_use]
pub fn ingredient_from_raw(raw: &Value) -> CandidateIngredient {
    let unit = safe_str(raw.get("unit"));
    CandidateIngredient {
        name: safe_str(raw.get("name")).unwrap_or_default(),
        quantity: measurement::reconcile(raw.get("quantity"), unit.as_deref()),
        is_optional: raw
            .get("is_optional")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        substitution_notes: safe_str(raw.get("substitution_notes")),
    }
}

/// Map raw substitution objects into suggestions for `original_ingredient`
///
/// Entries without a usable `substitute` field are dropped.
#[must_use]
pub fn substitutions_from_raw(
    original_ingredient: &str,
    raw: &[Value],
) -> Vec<SubstitutionSuggestion> {
    raw.iter()
        .filter_map(|entry| {
            let substitute = safe_str(entry.get("substitute"))?;
            Some(SubstitutionSuggestion {
                original_ingredient: original_ingredient.to_owned(),
                substitute,
                notes: safe_str(entry.get("notes")),
                ratio: safe_str(entry.get("ratio")),
            })
        })
        .collect()
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_LEN {
        title.to_owned()
    } else {
        title.chars().take(MAX_TITLE_LEN).collect()
    }
}
