// marketscope-core/tests/engine.rs
// ============================================================================
// Module: Scoping Engine Tests
// Description: End-to-end tests for the engine read and write paths.
// Purpose: Ensure the sanitize-tag-upsert write path and scoped reads hold.
// Dependencies: marketscope-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises the scoping engine against the in-memory store: rule save and
//! read-back, feature gating, malformed store entry skipping, hook ordering,
//! product discount persistence, and conversation scoping.

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

use std::collections::BTreeMap;

use marketscope_core::Actor;
use marketscope_core::Collection;
use marketscope_core::ConversationId;
use marketscope_core::ConversationRecord;
use marketscope_core::ConversationStatus;
use marketscope_core::DiscountType;
use marketscope_core::EngineError;
use marketscope_core::IdentityProvider;
use marketscope_core::InMemoryRuleStore;
use marketscope_core::OptionSet;
use marketscope_core::ProductDiscountSet;
use marketscope_core::ProductId;
use marketscope_core::ProductShape;
use marketscope_core::Role;
use marketscope_core::RoleCategory;
use marketscope_core::RoleId;
use marketscope_core::RoleSource;
use marketscope_core::RoleSourceError;
use marketscope_core::RuleStore;
use marketscope_core::roles_from_documents;
use marketscope_core::SETTING_VENDOR_CONVERSATIONS;
use marketscope_core::SETTING_VENDOR_DYNAMIC_RULES;
use marketscope_core::ScopingEngine;
use marketscope_core::SettingValue;
use marketscope_core::SettingsProvider;
use marketscope_core::Surface;
use marketscope_core::Timestamp;
use marketscope_core::VendorId;
use serde_json::json;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

/// Settings provider backed by a plain map; absent keys fall to the default.
#[derive(Debug, Default, Clone)]
struct MapSettings {
    values: BTreeMap<String, SettingValue>,
}

impl MapSettings {
    fn disabled(key: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), SettingValue::Text("no".to_string()));
        Self {
            values,
        }
    }
}

impl SettingsProvider for MapSettings {
    fn get_setting(&self, key: &str, default: SettingValue) -> SettingValue {
        self.values.get(key).cloned().unwrap_or(default)
    }
}

fn engine() -> ScopingEngine<MapSettings, InMemoryRuleStore> {
    ScopingEngine::new(MapSettings::default(), InMemoryRuleStore::new())
}

fn tenant() -> Actor {
    Actor::tenant_in_rule_editor(VendorId::new("7"))
}

fn conversation(id: &str) -> ConversationRecord {
    ConversationRecord {
        conversation_id: ConversationId::new(id),
        author: "customer-1".to_string(),
        recipients: vec!["operator".to_string()],
        vendor_id: None,
        created_at: Timestamp::UnixMillis(1_700_000_000_000),
        status: ConversationStatus::Open,
    }
}

// ============================================================================
// SECTION: Rule Write Path
// ============================================================================

/// Verifies the single write path: sanitize, tag, upsert, read back scoped.
#[test]
fn save_rule_sanitizes_tags_and_persists() {
    let engine = engine();
    let raw = r#"{"id": "rule-1", "_rule_type": "product_discount", "note": "<b>ten</b> off"}"#;
    let saved = engine.save_rule(&tenant(), raw).unwrap();
    assert!(saved.is_vendor_created());
    assert_eq!(saved.get("note"), Some(&json!("ten off")));

    let visible = engine.scoped_rules(&tenant()).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0], saved);
}

/// Verifies operator saves stay untagged and invisible to tenant editors.
#[test]
fn operator_rules_are_hidden_from_tenant_editors() {
    let engine = engine();
    let saved = engine
        .save_rule(&Actor::operator(), r#"{"id": "rule-2", "_rule_type": "cart_discount"}"#)
        .unwrap();
    assert!(!saved.is_vendor_created());

    assert!(engine.scoped_rules(&tenant()).unwrap().is_empty());
    assert_eq!(engine.scoped_rules(&Actor::operator()).unwrap().len(), 1);
}

/// Verifies malformed input is rejected whole with nothing persisted.
#[test]
fn save_rule_rejects_unparseable_input() {
    let store = InMemoryRuleStore::new();
    let engine = ScopingEngine::new(MapSettings::default(), store.clone());
    let result = engine.save_rule(&tenant(), "{broken");
    assert!(matches!(result, Err(EngineError::Sanitize(_))));
    assert!(store.is_empty(Collection::DynamicRules).unwrap());
}

/// Verifies documents without an id are rejected.
#[test]
fn save_rule_requires_an_identifier() {
    let result = engine().save_rule(&tenant(), r#"{"_rule_type": "product_discount"}"#);
    assert!(matches!(result, Err(EngineError::InvalidRule(_))));
}

/// Verifies non-object documents are rejected.
#[test]
fn save_rule_requires_an_object() {
    let result = engine().save_rule(&tenant(), "[1, 2, 3]");
    assert!(matches!(result, Err(EngineError::InvalidRule(_))));
}

/// Verifies a repeated save for the same id replaces the stored document.
#[test]
fn save_rule_upserts_by_identifier() {
    let engine = engine();
    engine.save_rule(&tenant(), r#"{"id": "rule-1", "note": "first"}"#).unwrap();
    engine.save_rule(&tenant(), r#"{"id": "rule-1", "note": "second"}"#).unwrap();
    let visible = engine.scoped_rules(&tenant()).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].get("note"), Some(&json!("second")));
}

// ============================================================================
// SECTION: Feature Gating
// ============================================================================

/// Verifies a disabled dynamic rules flag blocks tenants but not operators.
#[test]
fn dynamic_rules_flag_gates_tenants_only() {
    let settings = MapSettings::disabled(SETTING_VENDOR_DYNAMIC_RULES);
    let engine = ScopingEngine::new(settings, InMemoryRuleStore::new());

    let tenant_result = engine.save_rule(&tenant(), r#"{"id": "rule-1"}"#);
    assert!(matches!(tenant_result, Err(EngineError::FeatureDisabled { .. })));
    assert!(matches!(
        engine.scoped_rules(&tenant()),
        Err(EngineError::FeatureDisabled { .. })
    ));

    assert!(engine.save_rule(&Actor::operator(), r#"{"id": "rule-1"}"#).is_ok());
    assert!(engine.scoped_rules(&Actor::operator()).is_ok());
}

/// Verifies an absent flag resolves to enabled.
#[test]
fn absent_flags_default_to_enabled() {
    let engine = engine();
    assert!(engine.save_rule(&tenant(), r#"{"id": "rule-1"}"#).is_ok());
}

// ============================================================================
// SECTION: Read Resilience and Hooks
// ============================================================================

/// Verifies malformed store entries are skipped instead of failing the read.
#[test]
fn scoped_rules_skips_malformed_store_entries() {
    let store = InMemoryRuleStore::new();
    store.upsert(Collection::DynamicRules, "bad", json!("not an object")).unwrap();
    store
        .upsert(Collection::DynamicRules, "good", json!({"id": "good"}))
        .unwrap();
    let engine = ScopingEngine::new(MapSettings::default(), store);
    let visible = engine.scoped_rules(&Actor::operator()).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].rule_id().unwrap().as_str(), "good");
}

/// Verifies hooks run after scoping, in registration order.
#[test]
fn option_hooks_apply_in_registration_order() {
    let mut engine = engine();
    engine.hooks_mut().rule_types.register(|options: OptionSet, _actor| {
        let mut pairs: Vec<(String, String)> = options
            .entries()
            .iter()
            .map(|entry| (entry.key.clone(), entry.label.clone()))
            .collect();
        pairs.push(("custom_rule".to_string(), "Custom Rule".to_string()));
        OptionSet::from_pairs(pairs)
    });
    engine.hooks_mut().rule_types.register(|options: OptionSet, _actor| {
        let pairs: Vec<(String, String)> = options
            .entries()
            .iter()
            .filter(|entry| entry.key != "custom_rule")
            .map(|entry| (entry.key.clone(), entry.label.clone()))
            .collect();
        OptionSet::from_pairs(pairs)
    });

    let all = OptionSet::from_pairs([
        ("product_discount", "Product Discount"),
        ("cart_discount", "Cart Discount"),
    ]);
    // Second hook removes what the first added; scoping already ran.
    let scoped = engine.rule_type_options(&tenant(), &all);
    assert!(!scoped.contains("custom_rule"));
    assert!(!scoped.contains("cart_discount"));
    assert!(scoped.contains("product_discount"));
}

/// Verifies the schema seam receives the section-hooked schema.
#[test]
fn schema_hooks_run_after_section_hooks() {
    let mut engine = engine();
    engine.hooks_mut().b2b_section.register(|mut section, _actor| {
        section.label = format!("{} (hooked)", section.label);
        section
    });
    let schema = engine.product_schema(&Actor::operator(), &[], &[]);
    assert_eq!(schema.b2b_section.label, "B2B Special (hooked)");
}

// ============================================================================
// SECTION: Product Discounts
// ============================================================================

/// Scenario: variable product with children A and B; A carries one wholesaler
/// row, B has no payload. Exactly one set is written, keyed by A.
#[test]
fn save_product_discounts_writes_one_set_per_supplied_target() {
    let store = InMemoryRuleStore::new();
    let engine = ScopingEngine::new(MapSettings::default(), store.clone());
    let shape = ProductShape::Variable {
        product_id: ProductId::new("parent-1"),
        children: vec![ProductId::new("var-a"), ProductId::new("var-b")],
    };
    let payload = r#"{"wholesaler": [
        {"discount_type": "percentage", "discount_amount": "15", "min_quantity": "3"}
    ]}"#;
    let payloads = vec![(ProductId::new("var-a"), payload.to_string())];

    let saved = engine.save_product_discounts(&tenant(), &shape, &payloads).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0.as_str(), "var-a");

    let rows = saved[0].1.rows_for(&RoleId::new("wholesaler")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].discount_type, DiscountType::Percentage);
    assert_eq!(rows[0].discount_amount, "15");
    assert_eq!(rows[0].min_quantity, "3");

    assert_eq!(store.len(Collection::ProductDiscounts).unwrap(), 1);
}

/// Verifies a simple product is keyed by its own id and payloads for unknown
/// targets are ignored.
#[test]
fn save_product_discounts_ignores_unknown_targets() {
    let store = InMemoryRuleStore::new();
    let engine = ScopingEngine::new(MapSettings::default(), store.clone());
    let shape = ProductShape::Simple {
        product_id: ProductId::new("prod-1"),
    };
    let payloads = vec![
        (ProductId::new("prod-1"), r#"{"retailer": []}"#.to_string()),
        (ProductId::new("stranger"), r#"{"retailer": []}"#.to_string()),
    ];
    let saved = engine.save_product_discounts(&tenant(), &shape, &payloads).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0.as_str(), "prod-1");
    assert_eq!(store.len(Collection::ProductDiscounts).unwrap(), 1);
}

/// Verifies a rejected payload aborts the whole save with nothing written.
#[test]
fn save_product_discounts_rejects_mixed_payloads_without_partial_writes() {
    let store = InMemoryRuleStore::new();
    let engine = ScopingEngine::new(MapSettings::default(), store.clone());
    let shape = ProductShape::Variable {
        product_id: ProductId::new("parent-1"),
        children: vec![ProductId::new("var-a"), ProductId::new("var-b")],
    };
    let payloads = vec![
        (ProductId::new("var-a"), r#"{"wholesaler": []}"#.to_string()),
        (ProductId::new("var-b"), "{broken".to_string()),
    ];
    let result = engine.save_product_discounts(&tenant(), &shape, &payloads);
    assert!(matches!(result, Err(EngineError::Sanitize(_))));
    assert!(store.is_empty(Collection::ProductDiscounts).unwrap());
}

/// Verifies tier row order survives save and store read-back for one role.
#[test]
fn save_product_discounts_preserves_row_order() {
    let store = InMemoryRuleStore::new();
    let engine = ScopingEngine::new(MapSettings::default(), store.clone());
    let shape = ProductShape::Simple {
        product_id: ProductId::new("prod-1"),
    };
    let payload = r#"{"wholesaler": [
        {"discount_type": "amount", "discount_amount": "5", "min_quantity": "10"},
        {"discount_type": "percentage", "discount_amount": "10", "min_quantity": "25"},
        {"discount_type": "fixed_price", "discount_amount": "80", "min_quantity": "100"}
    ]}"#;
    let payloads = vec![(ProductId::new("prod-1"), payload.to_string())];
    let saved = engine.save_product_discounts(&tenant(), &shape, &payloads).unwrap();

    let expected_types =
        [DiscountType::Amount, DiscountType::Percentage, DiscountType::FixedPrice];
    let expected_amounts = ["5", "10", "80"];
    let returned = saved[0].1.rows_for(&RoleId::new("wholesaler")).unwrap();
    assert_eq!(returned.len(), 3);
    for (index, row) in returned.iter().enumerate() {
        assert_eq!(row.discount_type, expected_types[index]);
        assert_eq!(row.discount_amount, expected_amounts[index]);
    }

    let documents = store.read_all(Collection::ProductDiscounts).unwrap();
    assert_eq!(documents.len(), 1);
    let read_back: ProductDiscountSet =
        serde_json::from_value(documents[0].clone()).unwrap();
    let rows = read_back.rows_for(&RoleId::new("wholesaler")).unwrap();
    assert_eq!(rows.len(), 3);
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row.discount_type, expected_types[index]);
        assert_eq!(row.discount_amount, expected_amounts[index]);
    }
}

/// Verifies discount payloads pass through the sanitizer before parsing.
#[test]
fn save_product_discounts_sanitizes_payloads() {
    let engine = engine();
    let shape = ProductShape::Simple {
        product_id: ProductId::new("prod-1"),
    };
    let payload = r#"{"retailer": [
        {"discount_type": "amount", "discount_amount": "<b>10</b>", "min_quantity": " 2 "}
    ]}"#;
    let payloads = vec![(ProductId::new("prod-1"), payload.to_string())];
    let saved = engine.save_product_discounts(&tenant(), &shape, &payloads).unwrap();
    let rows = saved[0].1.rows_for(&RoleId::new("retailer")).unwrap();
    assert_eq!(rows[0].discount_amount, "10");
    assert_eq!(rows[0].min_quantity, "2");
}

// ============================================================================
// SECTION: Conversations
// ============================================================================

/// Verifies tenant saves stamp the vendor id and reads stay vendor-scoped.
#[test]
fn conversations_are_scoped_per_vendor() {
    let engine = engine();
    let vendor_seven = Actor::tenant_in_rule_editor(VendorId::new("7"));
    let saved = engine.save_conversation(&vendor_seven, conversation("conv-1")).unwrap();
    assert_eq!(saved.vendor_id, Some(VendorId::new("7")));

    let for_seven = engine.conversations(&vendor_seven, Surface::TenantFrontend).unwrap();
    assert_eq!(for_seven.len(), 1);

    let vendor_nine = Actor::tenant_in_rule_editor(VendorId::new("9"));
    let for_nine = engine.conversations(&vendor_nine, Surface::TenantFrontend).unwrap();
    assert!(for_nine.is_empty());

    let for_operator = engine.conversations(&Actor::operator(), Surface::Operator).unwrap();
    assert!(for_operator.is_empty());
}

/// Verifies operator saves stay untagged and operator-visible only.
#[test]
fn operator_conversations_stay_untagged() {
    let engine = engine();
    let saved = engine.save_conversation(&Actor::operator(), conversation("conv-2")).unwrap();
    assert!(saved.vendor_id.is_none());

    let for_operator = engine.conversations(&Actor::operator(), Surface::Operator).unwrap();
    assert_eq!(for_operator.len(), 1);

    let vendor_seven = Actor::tenant_in_rule_editor(VendorId::new("7"));
    let for_seven = engine.conversations(&vendor_seven, Surface::TenantFrontend).unwrap();
    assert!(for_seven.is_empty());
}

/// Verifies the conversations flag gates the tenant surface only.
#[test]
fn conversations_flag_gates_the_tenant_surface() {
    let settings = MapSettings::disabled(SETTING_VENDOR_CONVERSATIONS);
    let engine = ScopingEngine::new(settings, InMemoryRuleStore::new());
    let vendor_seven = Actor::tenant_in_rule_editor(VendorId::new("7"));
    assert!(matches!(
        engine.conversations(&vendor_seven, Surface::TenantFrontend),
        Err(EngineError::FeatureDisabled { .. })
    ));
    assert!(engine.conversations(&Actor::operator(), Surface::Operator).is_ok());
}

// ============================================================================
// SECTION: Identity and Role Providers
// ============================================================================

/// Identity provider returning one fixed actor.
struct FixedIdentity {
    actor: Actor,
}

impl IdentityProvider for FixedIdentity {
    fn current_actor(&self) -> Actor {
        self.actor.clone()
    }
}

/// Role source parsing loose catalog documents per category.
struct CatalogRoleSource {
    b2b: Vec<serde_json::Value>,
    b2c: Vec<serde_json::Value>,
}

impl RoleSource for CatalogRoleSource {
    fn get_roles(&self, category: RoleCategory) -> Result<Vec<Role>, RoleSourceError> {
        let documents = match category {
            RoleCategory::B2b => &self.b2b,
            RoleCategory::B2c => &self.b2c,
        };
        Ok(roles_from_documents(documents, category))
    }
}

/// Role source whose catalog is unreachable.
struct UnavailableRoleSource;

impl RoleSource for UnavailableRoleSource {
    fn get_roles(&self, _category: RoleCategory) -> Result<Vec<Role>, RoleSourceError> {
        Err(RoleSourceError::Unavailable("catalog offline".to_string()))
    }
}

/// Verifies a role source and identity provider feed the schema builder,
/// with malformed catalog entries skipped on the way in.
#[test]
fn role_source_and_identity_feed_the_schema_builder() {
    let identity = FixedIdentity {
        actor: Actor::tenant_in_rule_editor(VendorId::new("7")),
    };
    let source = CatalogRoleSource {
        b2b: vec![
            json!({"value": "wholesaler", "name": "Wholesaler"}),
            json!({"name": "missing value key"}),
        ],
        b2c: vec![json!({"value": "retailer", "name": "Retailer"})],
    };

    let actor = identity.current_actor();
    let b2b = source.get_roles(RoleCategory::B2b).unwrap();
    let b2c = source.get_roles(RoleCategory::B2c).unwrap();
    assert_eq!(b2b.len(), 1);
    assert_eq!(b2c.len(), 1);

    let schema = engine().product_schema(&actor, &b2b, &b2c);
    assert_eq!(schema.b2b_section.entries.len(), 1);
    assert_eq!(schema.b2b_section.entries[0].role.as_str(), "wholesaler");
    assert_eq!(schema.b2c_section.entries[0].role.as_str(), "retailer");
}

/// Verifies an unavailable role catalog surfaces verbatim.
#[test]
fn unavailable_role_source_surfaces_the_error() {
    let result = UnavailableRoleSource.get_roles(RoleCategory::B2b);
    assert!(matches!(result, Err(RoleSourceError::Unavailable(_))));
}
