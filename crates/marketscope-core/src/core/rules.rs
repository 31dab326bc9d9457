// marketscope-core/src/core/rules.rs
// ============================================================================
// Module: Marketscope Dynamic Rules
// Description: Rule documents, provenance tagging, and tenant scoping filters.
// Purpose: Keep tenant-visible rule and option sets a subset of the broad set.
// Dependencies: crate::core::{actor, identifiers}, serde, serde_json
// ============================================================================

//! ## Overview
//! Dynamic rules are loose JSON documents with one reserved key,
//! `created_from`, stamped at creation time. The filters in this module
//! narrow option catalogs and rule collections for restricted tenants in the
//! tenant rule editor and leave every other actor's view unchanged. All
//! filters are subset-only: scoping can shrink a visible set, never expand
//! it, so a missing context check cannot leak privileged options.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::actor::Actor;
use crate::core::identifiers::RuleId;

// ============================================================================
// SECTION: Provenance
// ============================================================================

/// Reserved rule key carrying the provenance marker.
pub const CREATED_FROM_KEY: &str = "created_from";

/// Provenance value stamped on rules created from a vendor dashboard.
pub const CREATED_FROM_VENDOR_DASHBOARD: &str = "vendor_dashboard";

// ============================================================================
// SECTION: Denylists
// ============================================================================

/// Rule type keys withheld from restricted tenants in the rule editor.
pub const TENANT_DENIED_RULE_TYPES: &[&str] = &[
    "cart_discount",
    "payment_discount",
    "payment_order_qty",
    "extra_charge",
    "pro_extra_charge",
    "pro_restrict_product_visibility",
    "restrict_product_visibility",
];

/// Product filter keys withheld from restricted tenants in the rule editor.
pub const TENANT_DENIED_PRODUCT_FILTERS: &[&str] =
    &["all_products", "cat_in_list", "cat_not_in_list"];

/// Condition keys withheld from restricted tenants in the rule editor.
pub const TENANT_DENIED_CONDITIONS: &[&str] =
    &["cart_total_qty", "cart_total_value", "cart_total_weight"];

// ============================================================================
// SECTION: Dynamic Rule
// ============================================================================

/// Dynamic rule document: arbitrary configuration keys plus the reserved
/// provenance marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicRule {
    /// Underlying JSON object, key order preserved.
    fields: Map<String, Value>,
}

impl DynamicRule {
    /// Creates an empty rule document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: Map::new(),
        }
    }

    /// Wraps an existing JSON object.
    #[must_use]
    pub const fn from_map(fields: Map<String, Value>) -> Self {
        Self {
            fields,
        }
    }

    /// Extracts a rule from a loose JSON value.
    ///
    /// Returns `None` when the value is not an object; malformed store
    /// entries are skipped by callers rather than aborting a read.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|fields| Self::from_map(fields.clone()))
    }

    /// Returns the rule identifier from the `id` key when present.
    #[must_use]
    pub fn rule_id(&self) -> Option<RuleId> {
        match self.fields.get("id") {
            Some(Value::String(id)) => Some(RuleId::new(id.clone())),
            Some(Value::Number(id)) => Some(RuleId::new(id.to_string())),
            _ => None,
        }
    }

    /// Returns a configuration value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets a configuration value by key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Returns the provenance marker when present and non-empty.
    #[must_use]
    pub fn created_from(&self) -> Option<&str> {
        self.fields
            .get(CREATED_FROM_KEY)
            .and_then(Value::as_str)
            .filter(|marker| !marker.is_empty())
    }

    /// Returns true when the rule was created from a vendor dashboard.
    #[must_use]
    pub fn is_vendor_created(&self) -> bool {
        self.created_from() == Some(CREATED_FROM_VENDOR_DASHBOARD)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the rule and returns a JSON value for persistence.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Default for DynamicRule {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Provenance Tagger
// ============================================================================

/// Stamps creation provenance onto a rule.
///
/// When the creator is a restricted tenant actor, sets
/// `created_from = "vendor_dashboard"`. Otherwise the field is left
/// untouched: tagging is additive, so an operator editing a vendor-created
/// rule never erases its provenance. Pure transform over a copy.
#[must_use]
pub fn tag_rule(rule: &DynamicRule, created_by_restricted_actor: bool) -> DynamicRule {
    let mut tagged = rule.clone();
    if created_by_restricted_actor {
        tagged.set(CREATED_FROM_KEY, Value::String(CREATED_FROM_VENDOR_DASHBOARD.to_string()));
    }
    tagged
}

// ============================================================================
// SECTION: Option Sets
// ============================================================================

/// One configurable option offered in a rule editor catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// Stored option key.
    pub key: String,
    /// Display label.
    pub label: String,
}

/// Ordered catalog of configurable options (rule types, filter predicates,
/// condition predicates).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    /// Entries in display order.
    entries: Vec<OptionEntry>,
}

impl OptionSet {
    /// Creates an empty option set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an option set from ordered `(key, label)` pairs.
    #[must_use]
    pub fn from_pairs<K, L>(pairs: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(key, label)| OptionEntry {
                    key: key.into(),
                    label: label.into(),
                })
                .collect(),
        }
    }

    /// Returns the entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Returns true when the set offers the given key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Returns the number of offered options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no options are offered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the allowed subset by subtracting a denylist.
    ///
    /// Absent denylist keys are tolerated. Order of surviving entries is
    /// preserved; the result is always a subset of `self`.
    #[must_use]
    pub fn without(&self, denylist: &[&str]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| !denylist.contains(&entry.key.as_str()))
                .cloned()
                .collect(),
        }
    }
}

// ============================================================================
// SECTION: Scoping Filters
// ============================================================================

/// Narrows the rule type catalog for restricted tenants in the rule editor.
///
/// Every other actor receives the input unchanged.
#[must_use]
pub fn filter_rule_types(all_types: &OptionSet, actor: &Actor) -> OptionSet {
    scope_options(all_types, actor, TENANT_DENIED_RULE_TYPES)
}

/// Narrows the product filter catalog for restricted tenants in the rule
/// editor.
#[must_use]
pub fn filter_product_filters(all_filters: &OptionSet, actor: &Actor) -> OptionSet {
    scope_options(all_filters, actor, TENANT_DENIED_PRODUCT_FILTERS)
}

/// Narrows the condition catalog for restricted tenants in the rule editor.
#[must_use]
pub fn filter_conditions(all_conditions: &OptionSet, actor: &Actor) -> OptionSet {
    scope_options(all_conditions, actor, TENANT_DENIED_CONDITIONS)
}

/// Applies one denylist when the actor is scoped to the tenant editor.
fn scope_options(options: &OptionSet, actor: &Actor, denylist: &[&str]) -> OptionSet {
    if actor.is_scoped_to_tenant_editor() {
        options.without(denylist)
    } else {
        options.clone()
    }
}

/// Narrows a rule collection for restricted tenants in the rule editor.
///
/// Tenant editors see only rules stamped `created_from = "vendor_dashboard"`;
/// operators and non-matching contexts see the full collection unchanged.
/// The provenance marker is carried through untouched on every returned rule.
#[must_use]
pub fn filter_rule_collection(all_rules: &[DynamicRule], actor: &Actor) -> Vec<DynamicRule> {
    if actor.is_scoped_to_tenant_editor() {
        all_rules.iter().filter(|rule| rule.is_vendor_created()).cloned().collect()
    } else {
        all_rules.to_vec()
    }
}
