// marketscope-core/tests/store.rs
// ============================================================================
// Module: In-Memory Store Tests
// Description: Tests for the in-memory rule store and the shared wrapper.
// Purpose: Ensure upserts are keyed, validated, and last-write-wins.
// Dependencies: marketscope-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises `InMemoryRuleStore` collection isolation, id validation, and
//! the `SharedRuleStore` wrapper delegating to one shared backing store.

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

use marketscope_core::Collection;
use marketscope_core::InMemoryRuleStore;
use marketscope_core::RuleStore;
use marketscope_core::SharedRuleStore;
use marketscope_core::StoreError;
use serde_json::json;

// ============================================================================
// SECTION: Upsert and Read
// ============================================================================

/// Verifies documents round-trip per collection.
#[test]
fn upsert_then_read_all_returns_documents() {
    let store = InMemoryRuleStore::new();
    store.upsert(Collection::DynamicRules, "rule-1", json!({"id": "rule-1"})).unwrap();
    store.upsert(Collection::DynamicRules, "rule-2", json!({"id": "rule-2"})).unwrap();
    let documents = store.read_all(Collection::DynamicRules).unwrap();
    assert_eq!(documents.len(), 2);
}

/// Verifies collections do not bleed into each other.
#[test]
fn collections_are_isolated() {
    let store = InMemoryRuleStore::new();
    store.upsert(Collection::DynamicRules, "rule-1", json!({})).unwrap();
    assert!(store.read_all(Collection::Conversations).unwrap().is_empty());
    assert!(store.read_all(Collection::ProductDiscounts).unwrap().is_empty());
    assert_eq!(store.len(Collection::DynamicRules).unwrap(), 1);
}

/// Verifies an empty collection reads as an empty list, not an error.
#[test]
fn read_all_on_empty_collection_returns_empty() {
    let store = InMemoryRuleStore::new();
    assert!(store.read_all(Collection::DynamicRules).unwrap().is_empty());
    assert!(store.is_empty(Collection::DynamicRules).unwrap());
}

/// Verifies writes to the same id are last-write-wins.
#[test]
fn upsert_is_last_write_wins() {
    let store = InMemoryRuleStore::new();
    store.upsert(Collection::DynamicRules, "rule-1", json!({"note": "first"})).unwrap();
    store.upsert(Collection::DynamicRules, "rule-1", json!({"note": "second"})).unwrap();
    let documents = store.read_all(Collection::DynamicRules).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0], json!({"note": "second"}));
}

/// Verifies an empty document id is rejected.
#[test]
fn upsert_rejects_empty_id() {
    let store = InMemoryRuleStore::new();
    let result = store.upsert(Collection::DynamicRules, "", json!({}));
    assert!(matches!(result, Err(StoreError::Invalid(_))));
    assert!(store.is_empty(Collection::DynamicRules).unwrap());
}

// ============================================================================
// SECTION: Shared Wrapper
// ============================================================================

/// Verifies clones of the shared wrapper see the same backing store.
#[test]
fn shared_store_clones_share_state() {
    let shared = SharedRuleStore::from_store(InMemoryRuleStore::new());
    let clone = shared.clone();
    shared.upsert(Collection::Conversations, "conv-1", json!({"id": "conv-1"})).unwrap();
    let documents = clone.read_all(Collection::Conversations).unwrap();
    assert_eq!(documents.len(), 1);
}
