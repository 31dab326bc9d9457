// marketscope-core/tests/provenance.rs
// ============================================================================
// Module: Provenance Tagger Tests
// Description: Tests for creation provenance stamping on dynamic rules.
// Purpose: Ensure tagging is additive and never erases vendor provenance.
// Dependencies: marketscope-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises `tag_rule` idempotence for operator creation and monotonicity
//! for vendor creation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use marketscope_core::CREATED_FROM_VENDOR_DASHBOARD;
use marketscope_core::DynamicRule;
use marketscope_core::tag_rule;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn rule_with_type(rule_type: &str) -> DynamicRule {
    let mut rule = DynamicRule::new();
    rule.set("id", json!("rule-1"));
    rule.set("_rule_type", json!(rule_type));
    rule
}

// ============================================================================
// SECTION: Operator Creation
// ============================================================================

/// Verifies operator creation leaves the provenance marker absent.
#[test]
fn tag_rule_leaves_operator_rules_untagged() {
    let rule = rule_with_type("product_discount");
    let tagged = tag_rule(&rule, false);
    assert!(tagged.created_from().is_none());
    assert!(!tagged.is_vendor_created());
}

/// Verifies repeated operator tagging stays a no-op.
#[test]
fn tag_rule_is_idempotent_for_operators() {
    let rule = rule_with_type("product_discount");
    let once = tag_rule(&rule, false);
    let twice = tag_rule(&once, false);
    assert_eq!(once, twice);
    assert!(twice.created_from().is_none());
}

// ============================================================================
// SECTION: Vendor Creation
// ============================================================================

/// Verifies vendor creation stamps the dashboard marker.
#[test]
fn tag_rule_stamps_vendor_creation() {
    let rule = rule_with_type("product_discount");
    let tagged = tag_rule(&rule, true);
    assert_eq!(tagged.created_from(), Some(CREATED_FROM_VENDOR_DASHBOARD));
    assert!(tagged.is_vendor_created());
}

/// Verifies an operator edit never clears vendor provenance.
#[test]
fn tag_rule_is_monotonic_for_vendor_rules() {
    let rule = rule_with_type("product_discount");
    let vendor_created = tag_rule(&rule, true);
    let operator_edited = tag_rule(&vendor_created, false);
    assert_eq!(operator_edited.created_from(), Some(CREATED_FROM_VENDOR_DASHBOARD));
}

/// Verifies tagging returns a copy and leaves the input untouched.
#[test]
fn tag_rule_does_not_mutate_input() {
    let rule = rule_with_type("product_discount");
    let _tagged = tag_rule(&rule, true);
    assert!(rule.created_from().is_none());
}

/// Verifies the configuration keys survive tagging unchanged.
#[test]
fn tag_rule_preserves_other_fields() {
    let rule = rule_with_type("product_discount");
    let tagged = tag_rule(&rule, true);
    assert_eq!(tagged.get("_rule_type"), Some(&Value::String("product_discount".to_string())));
    assert_eq!(tagged.rule_id().unwrap().as_str(), "rule-1");
}

/// Verifies an empty created_from value reads as absent provenance.
#[test]
fn empty_created_from_reads_as_absent() {
    let mut rule = rule_with_type("product_discount");
    rule.set("created_from", json!(""));
    assert!(rule.created_from().is_none());
    assert!(!rule.is_vendor_created());
}
