// ABOUTME: Free-text measurement parsing into numeric quantity + unit pairs
// ABOUTME: Handles fractions, mixed numbers, glued units and descriptive measures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Measurement Parser
//!
//! Converts free-text quantity expressions (`"1 1/2 tsp"`, `"300g"`,
//! `"To taste"`) into a numeric [`Quantity`]. Used for AI provider output and
//! for the bulk recipe feed importer, whose measure strings share the same
//! pattern family.
//!
//! Pattern precedence is load-bearing: mixed numbers must be tried before
//! plain fractions (otherwise `"1 1/2 tsp"` would parse as `1.0` with a junk
//! unit), fractions before glued units, glued before spaced numbers, and
//! spaced before bare numbers. Anything that survives every pattern is kept
//! verbatim as a descriptive measure so no caller-provided text is ever
//! silently discarded.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed measurement: numeric value plus unit
///
/// When `value` is `None`, `unit` may hold either a real unit or the entire
/// unparsed original text (context preservation). When `value` is present,
/// `unit` is either a recognized unit string or `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric quantity, if one could be parsed
    pub value: Option<f64>,
    /// Unit string, or the original descriptive text when `value` is `None`
    pub unit: Option<String>,
}

impl Quantity {
    /// A quantity with neither value nor unit
    #[must_use]
    pub const fn none() -> Self {
        Self {
            value: None,
            unit: None,
        }
    }

    /// A quantity with a numeric value and optional unit
    #[must_use]
    pub fn new(value: f64, unit: Option<&str>) -> Self {
        Self {
            value: Some(value),
            unit: unit.map(str::to_owned),
        }
    }

    /// A descriptive measure carrying the original text in place of a unit
    #[must_use]
    pub fn descriptive(text: &str) -> Self {
        Self {
            value: None,
            unit: Some(text.to_lowercase()),
        }
    }
}

/// Measures that carry no meaningful numeric quantity
const DESCRIPTIVE_MEASURES: &[&str] = &[
    "to taste",
    "to serve",
    "to garnish",
    "as needed",
    "pinch",
    "drizzle",
    "dash",
    "handful",
    "bunch",
    "sprig",
    "sprigs",
    "leaves",
    "leaf",
    "garnish",
    "splash",
];

// The patterns below are compile-time constants, so the unwraps cannot fail.
#[allow(clippy::unwrap_used)]
static MIXED_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(\d+)/(\d+)\s*(.*)$").unwrap());

#[allow(clippy::unwrap_used)]
static FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/(\d+)\s*(.*)$").unwrap());

#[allow(clippy::unwrap_used)]
static GLUED_UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9.]+)\s*([a-zA-Z].*)$").unwrap());

#[allow(clippy::unwrap_used)]
static SPACED_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9.]+)\s+(.+)$").unwrap());

/// Parse a free-text measure string into a [`Quantity`]
///
/// Handles patterns like `"1 cup"`, `"3/4 cup"`, `"1 1/2 tsp"`, `"300g"`,
/// `"To taste"` and the empty string. Unparseable text is preserved as a
/// descriptive measure.
#[must_use]
pub fn parse(text: &str) -> Quantity {
    let text = text.trim();
    if text.is_empty() {
        return Quantity::none();
    }

    if DESCRIPTIVE_MEASURES.contains(&text.to_lowercase().as_str()) {
        return Quantity::descriptive(text);
    }

    // "1 1/2 tsp" (mixed number with fraction)
    if let Some(caps) = MIXED_NUMBER_RE.captures(text) {
        if let (Ok(whole), Ok(num), Ok(den)) = (
            caps[1].parse::<f64>(),
            caps[2].parse::<f64>(),
            caps[3].parse::<f64>(),
        ) {
            if den != 0.0 {
                return Quantity {
                    value: Some(whole + num / den),
                    unit: non_empty(&caps[4]),
                };
            }
        }
    }

    // "3/4 cup" (plain fraction)
    if let Some(caps) = FRACTION_RE.captures(text) {
        if let (Ok(num), Ok(den)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            if den != 0.0 {
                return Quantity {
                    value: Some(num / den),
                    unit: non_empty(&caps[3]),
                };
            }
        }
    }

    // "300g", "200ml" (number glued to unit)
    if let Some(caps) = GLUED_UNIT_RE.captures(text) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return Quantity {
                value: Some(value),
                unit: non_empty(&caps[2]),
            };
        }
    }

    // "1 cup", "2.5 tablespoons" (number then unit)
    if let Some(caps) = SPACED_NUMBER_RE.captures(text) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return Quantity {
                value: Some(value),
                unit: non_empty(&caps[2]),
            };
        }
    }

    // Bare number: "2", "1.5"
    if let Ok(value) = text.parse::<f64>() {
        return Quantity {
            value: Some(value),
            unit: None,
        };
    }

    // Unparseable - treat as descriptive
    Quantity::descriptive(text)
}

/// Reconcile an AI-provider-supplied quantity/unit pair into a [`Quantity`]
///
/// Providers may return a numeric quantity with a separate unit field, a
/// quantity string with the unit embedded (`"1 pound"`), or a unit-less
/// fraction string (`"1/2"`). A numeric quantity is used as-is; a string
/// quantity is tried as a bare float, then as number-plus-words, then as a
/// fraction. An explicit `raw_unit` always wins over a unit embedded in the
/// quantity string. If nothing parses, the original text is preserved rather
/// than discarded.
#[must_use]
pub fn reconcile(raw_quantity: Option<&Value>, raw_unit: Option<&str>) -> Quantity {
    let unit_hint = raw_unit
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_owned);

    match raw_quantity {
        Some(Value::Number(n)) => Quantity {
            value: n.as_f64(),
            unit: unit_hint,
        },
        Some(Value::String(s)) => reconcile_text(s, unit_hint),
        _ => Quantity {
            value: None,
            unit: unit_hint,
        },
    }
}

fn reconcile_text(raw: &str, unit_hint: Option<String>) -> Quantity {
    let text = raw.trim();
    if text.is_empty() {
        return Quantity {
            value: None,
            unit: unit_hint,
        };
    }

    if let Ok(value) = text.parse::<f64>() {
        return Quantity {
            value: Some(value),
            unit: unit_hint,
        };
    }

    // Same pattern precedence as parse(); an embedded unit only survives
    // when no explicit unit was supplied.
    let parsed = parse(text);
    if parsed.value.is_some() {
        return Quantity {
            value: parsed.value,
            unit: unit_hint.or(parsed.unit),
        };
    }

    Quantity {
        value: None,
        unit: unit_hint.or_else(|| Some(text.to_owned())),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
