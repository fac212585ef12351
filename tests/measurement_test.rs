// ABOUTME: Unit tests for the free-text measurement parser
// ABOUTME: Covers pattern precedence, descriptive measures and AI quantity reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::{json, Value};

use souschef::measurement::{parse, reconcile, Quantity};

fn assert_parsed(input: &str, value: Option<f64>, unit: Option<&str>) {
    let parsed = parse(input);
    assert_eq!(parsed.value, value, "value mismatch for {input:?}");
    assert_eq!(parsed.unit.as_deref(), unit, "unit mismatch for {input:?}");
}

#[test]
fn test_simple_numbers_with_units() {
    assert_parsed("1 cup", Some(1.0), Some("cup"));
    assert_parsed("2 tablespoons", Some(2.0), Some("tablespoons"));
    assert_parsed("2.5 tablespoons", Some(2.5), Some("tablespoons"));
    assert_parsed("100 g", Some(100.0), Some("g"));
}

#[test]
fn test_fractions() {
    assert_parsed("3/4 cup", Some(0.75), Some("cup"));
    assert_parsed("1/2 teaspoon", Some(0.5), Some("teaspoon"));
    assert_parsed("1/2", Some(0.5), None);
}

#[test]
fn test_mixed_numbers() {
    assert_parsed("1 1/2 tsp", Some(1.5), Some("tsp"));
    assert_parsed("2 1/4 cups", Some(2.25), Some("cups"));
}

#[test]
fn test_glued_units() {
    assert_parsed("300g", Some(300.0), Some("g"));
    assert_parsed("200ml", Some(200.0), Some("ml"));
}

#[test]
fn test_bare_numbers() {
    assert_parsed("2", Some(2.0), None);
    assert_parsed("1.5", Some(1.5), None);
}

#[test]
fn test_descriptive_measures_lowercased() {
    for input in ["To taste", "Pinch", "Drizzle", "HANDFUL", "dash", "Splash"] {
        let parsed = parse(input);
        assert_eq!(parsed.value, None, "descriptive {input:?} has no value");
        assert_eq!(
            parsed.unit.as_deref(),
            Some(input.to_lowercase().as_str()),
            "descriptive {input:?} keeps lowercased text"
        );
    }
}

#[test]
fn test_empty_and_whitespace() {
    assert_eq!(parse(""), Quantity::none());
    assert_eq!(parse("   "), Quantity::none());
}

#[test]
fn test_unknown_text_falls_through_to_descriptive() {
    assert_parsed("Some random text", None, Some("some random text"));
}

#[test]
fn test_zero_denominator_is_not_a_fraction() {
    let parsed = parse("3/0");
    assert_eq!(parsed.value, None);
    assert_eq!(parsed.unit.as_deref(), Some("3/0"));
}

// ============================================================================
// reconcile() - AI-provider quantity/unit reconciliation
// ============================================================================

#[test]
fn test_reconcile_numeric_quantity_used_as_is() {
    let q = reconcile(Some(&json!(2)), Some("cups"));
    assert_eq!(q.value, Some(2.0));
    assert_eq!(q.unit.as_deref(), Some("cups"));

    let q = reconcile(Some(&json!(1.5)), None);
    assert_eq!(q.value, Some(1.5));
    assert_eq!(q.unit, None);
}

#[test]
fn test_reconcile_embedded_unit_extracted() {
    let q = reconcile(Some(&json!("1 pound")), None);
    assert_eq!(q.value, Some(1.0));
    assert_eq!(q.unit.as_deref(), Some("pound"));
}

#[test]
fn test_reconcile_explicit_unit_wins() {
    let q = reconcile(Some(&json!("1 pound")), Some("oz"));
    assert_eq!(q.value, Some(1.0));
    assert_eq!(q.unit.as_deref(), Some("oz"));
}

#[test]
fn test_reconcile_bare_float_string() {
    let q = reconcile(Some(&json!("2.5")), Some("cups"));
    assert_eq!(q.value, Some(2.5));
    assert_eq!(q.unit.as_deref(), Some("cups"));
}

#[test]
fn test_reconcile_fraction_string() {
    let q = reconcile(Some(&json!("1/2")), None);
    assert_eq!(q.value, Some(0.5));
    assert_eq!(q.unit, None);

    let q = reconcile(Some(&json!("1/2")), Some("cup"));
    assert_eq!(q.value, Some(0.5));
    assert_eq!(q.unit.as_deref(), Some("cup"));
}

#[test]
fn test_reconcile_unparseable_text_preserved() {
    let q = reconcile(Some(&json!("a few")), None);
    assert_eq!(q.value, None);
    assert_eq!(q.unit.as_deref(), Some("a few"));
}

#[test]
fn test_reconcile_unparseable_text_with_explicit_unit() {
    let q = reconcile(Some(&json!("a few")), Some("sprigs"));
    assert_eq!(q.value, None);
    assert_eq!(q.unit.as_deref(), Some("sprigs"));
}

#[test]
fn test_reconcile_null_quantity_keeps_unit() {
    let q = reconcile(Some(&Value::Null), Some("cloves"));
    assert_eq!(q.value, None);
    assert_eq!(q.unit.as_deref(), Some("cloves"));

    let q = reconcile(None, None);
    assert_eq!(q, Quantity::none());
}
