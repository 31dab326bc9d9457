// marketscope-core/src/interfaces/mod.rs
// ============================================================================
// Module: Marketscope Interfaces
// Description: Backend-agnostic interfaces for settings, identity, roles, and storage.
// Purpose: Define the contract surfaces consumed by the Marketscope engine.
// Dependencies: crate::core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Marketscope integrates with its host platform
//! without embedding backend-specific details. The engine owns no persisted
//! state: the rule store adapter is the sole owner, and every component here
//! operates on snapshots passed by value. Implementations must be
//! deterministic for a given store state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::actor::Actor;
use crate::core::roles::Role;
use crate::core::roles::RoleCategory;

// ============================================================================
// SECTION: Settings Provider
// ============================================================================

/// Feature flag enabling the tenant-facing dynamic rule editor.
pub const SETTING_VENDOR_DYNAMIC_RULES: &str = "vendor_dynamic_rules";

/// Feature flag enabling tenant-facing conversations.
pub const SETTING_VENDOR_CONVERSATIONS: &str = "vendor_conversations";

/// Feature flag enabling role-based pricing on vendor products.
pub const SETTING_VENDOR_ROLE_BASED_PRICING: &str = "vendor_role_based_pricing";

/// Feature flag enabling the product options section for vendors.
pub const SETTING_VENDOR_PRODUCT_SECTION: &str = "vendor_product_section";

/// Loosely typed setting value returned by a settings provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean flag.
    Flag(bool),
    /// Free-form text value.
    Text(String),
}

impl SettingValue {
    /// Interprets the value as an enabled/disabled flag.
    ///
    /// Text values follow the host convention: `"yes"` means enabled and
    /// anything else means disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Flag(enabled) => *enabled,
            Self::Text(text) => text == "yes",
        }
    }
}

/// Configuration provider injected into every component that reads a flag.
///
/// Absence of a setting must resolve to the supplied default, never to a
/// silent "disabled".
pub trait SettingsProvider {
    /// Returns the setting for `key`, or `default` when the key is absent.
    fn get_setting(&self, key: &str, default: SettingValue) -> SettingValue;

    /// Returns true when the named feature flag resolves to enabled.
    ///
    /// All Marketscope feature flags default to enabled.
    fn is_feature_enabled(&self, key: &str) -> bool {
        self.get_setting(key, SettingValue::Flag(true)).is_enabled()
    }
}

// ============================================================================
// SECTION: Identity Provider
// ============================================================================

/// Identity source for the requesting actor.
pub trait IdentityProvider {
    /// Returns the current actor's identity and scoping facts.
    fn current_actor(&self) -> Actor;
}

// ============================================================================
// SECTION: Role Source
// ============================================================================

/// Role catalog errors.
#[derive(Debug, Error)]
pub enum RoleSourceError {
    /// Role catalog is unavailable; surfaced verbatim to the caller.
    #[error("role catalog unavailable: {0}")]
    Unavailable(String),
}

/// External role catalog lookup.
pub trait RoleSource {
    /// Returns the roles for a category.
    ///
    /// Malformed catalog entries are skipped by the implementation, never
    /// surfaced as errors.
    ///
    /// # Errors
    ///
    /// Returns [`RoleSourceError`] when the catalog itself is unavailable.
    fn get_roles(&self, category: RoleCategory) -> Result<Vec<Role>, RoleSourceError>;
}

// ============================================================================
// SECTION: Rule Store
// ============================================================================

/// Named collections in the shared rule/record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Dynamic rule documents.
    DynamicRules,
    /// Conversation records.
    Conversations,
    /// Per-product/variation discount sets.
    ProductDiscounts,
}

/// Rule store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("rule store io error: {0}")]
    Io(String),
    /// Store data is invalid.
    #[error("rule store invalid data: {0}")]
    Invalid(String),
}

/// Append/update/read access to the shared rule and record collections.
///
/// Every write is a single atomic upsert keyed by document identifier;
/// concurrency control (last-write-wins or optimistic versioning) is the
/// adapter's responsibility. The engine never performs read-modify-write
/// cycles across requests.
pub trait RuleStore {
    /// Reads all documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable or corrupt.
    fn read_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    /// Upserts one document keyed by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails; no partial write occurs.
    fn upsert(&self, collection: Collection, id: &str, document: Value) -> Result<(), StoreError>;
}
