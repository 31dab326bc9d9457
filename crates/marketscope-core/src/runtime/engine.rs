// marketscope-core/src/runtime/engine.rs
// ============================================================================
// Module: Marketscope Scoping Engine
// Description: Composition root for schema building, scoping, and persistence.
// Purpose: Apply the fixed order base computation -> scoping filter -> hooks.
// Dependencies: crate::{core, interfaces, runtime::pipeline}
// ============================================================================

//! ## Overview
//! The scoping engine wires the pure core functions to a settings provider
//! and a rule store. Reads narrow the raw collection before anything is
//! returned, making unauthorized access unreachable by construction. Writes
//! go through exactly one path: sanitize, tag, upsert. Store failures
//! surface verbatim; every operation is pure over explicit inputs and
//! idempotent to re-invoke.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::actor::Actor;
use crate::core::actor::Surface;
use crate::core::conversation::ConversationQuery;
use crate::core::conversation::ConversationRecord;
use crate::core::conversation::scope_conversation_query;
use crate::core::discounts::ProductDiscountSet;
use crate::core::discounts::ProductShape;
use crate::core::identifiers::ProductId;
use crate::core::roles::Role;
use crate::core::rules::DynamicRule;
use crate::core::rules::OptionSet;
use crate::core::rules::filter_conditions;
use crate::core::rules::filter_product_filters;
use crate::core::rules::filter_rule_collection;
use crate::core::rules::filter_rule_types;
use crate::core::rules::tag_rule;
use crate::core::sanitize::SanitizeError;
use crate::core::sanitize::sanitize_document;
use crate::core::schema::ProductSchema;
use crate::core::schema::TierCaps;
use crate::core::schema::build_schema;
use crate::interfaces::Collection;
use crate::interfaces::RuleStore;
use crate::interfaces::SETTING_VENDOR_CONVERSATIONS;
use crate::interfaces::SETTING_VENDOR_DYNAMIC_RULES;
use crate::interfaces::SETTING_VENDOR_ROLE_BASED_PRICING;
use crate::interfaces::SettingsProvider;
use crate::interfaces::StoreError;
use crate::runtime::pipeline::ScopingHooks;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scoping engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The feature flag gating this operation resolves to disabled.
    #[error("feature disabled: {key}")]
    FeatureDisabled {
        /// Feature flag key.
        key: String,
    },
    /// Rule store failure, surfaced verbatim.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Input failed sanitization; the write was rejected whole.
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),
    /// Rule document is structurally unusable.
    #[error("invalid rule document: {0}")]
    InvalidRule(String),
}

// ============================================================================
// SECTION: Scoping Engine
// ============================================================================

/// Composition root binding settings, storage, and extension hooks.
pub struct ScopingEngine<S, R> {
    /// Injected configuration provider.
    settings: S,
    /// Shared rule/record store adapter.
    store: R,
    /// Extension seams applied after scoping.
    hooks: ScopingHooks,
    /// Tier caps applied by the schema builder.
    tier_caps: TierCaps,
}

impl<S: SettingsProvider, R: RuleStore> ScopingEngine<S, R> {
    /// Creates an engine with default tier caps and no registered hooks.
    #[must_use]
    pub fn new(settings: S, store: R) -> Self {
        Self {
            settings,
            store,
            hooks: ScopingHooks::new(),
            tier_caps: TierCaps::default(),
        }
    }

    /// Replaces the tier caps applied by the schema builder.
    #[must_use]
    pub fn with_tier_caps(mut self, tier_caps: TierCaps) -> Self {
        self.tier_caps = tier_caps;
        self
    }

    /// Returns the extension hooks for registration.
    pub fn hooks_mut(&mut self) -> &mut ScopingHooks {
        &mut self.hooks
    }

    // ------------------------------------------------------------------
    // Schema composition
    // ------------------------------------------------------------------

    /// Builds the product discount schema for the supplied role catalogs.
    ///
    /// Each section passes through its own extension seam before the merged
    /// schema passes through the schema seam.
    #[must_use]
    pub fn product_schema(
        &self,
        actor: &Actor,
        b2b_roles: &[Role],
        b2c_roles: &[Role],
    ) -> ProductSchema {
        let built = build_schema(b2b_roles, b2c_roles, &self.tier_caps);
        let merged = ProductSchema {
            b2c_section: self.hooks.b2c_section.apply(built.b2c_section, actor),
            b2b_section: self.hooks.b2b_section.apply(built.b2b_section, actor),
        };
        self.hooks.schema.apply(merged, actor)
    }

    // ------------------------------------------------------------------
    // Option scoping
    // ------------------------------------------------------------------

    /// Returns the rule type options visible to the actor.
    #[must_use]
    pub fn rule_type_options(&self, actor: &Actor, all_types: &OptionSet) -> OptionSet {
        let scoped = filter_rule_types(all_types, actor);
        self.hooks.rule_types.apply(scoped, actor)
    }

    /// Returns the product filter options visible to the actor.
    #[must_use]
    pub fn product_filter_options(&self, actor: &Actor, all_filters: &OptionSet) -> OptionSet {
        let scoped = filter_product_filters(all_filters, actor);
        self.hooks.product_filters.apply(scoped, actor)
    }

    /// Returns the condition options visible to the actor.
    #[must_use]
    pub fn condition_options(&self, actor: &Actor, all_conditions: &OptionSet) -> OptionSet {
        let scoped = filter_conditions(all_conditions, actor);
        self.hooks.conditions.apply(scoped, actor)
    }

    // ------------------------------------------------------------------
    // Rule collection
    // ------------------------------------------------------------------

    /// Returns the dynamic rules visible to the actor.
    ///
    /// The raw collection is narrowed by provenance before it is returned;
    /// malformed store entries are skipped. Restricted tenants require the
    /// dynamic rules feature flag.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FeatureDisabled`] or a verbatim store failure.
    pub fn scoped_rules(&self, actor: &Actor) -> Result<Vec<DynamicRule>, EngineError> {
        self.ensure_tenant_feature(actor, SETTING_VENDOR_DYNAMIC_RULES)?;
        let documents = self.store.read_all(Collection::DynamicRules)?;
        let rules: Vec<DynamicRule> =
            documents.iter().filter_map(DynamicRule::from_value).collect();
        let scoped = filter_rule_collection(&rules, actor);
        Ok(self.hooks.rule_collection.apply(scoped, actor))
    }

    /// Persists a dynamic rule from untrusted input.
    ///
    /// The single write path: sanitize, tag provenance, upsert. Returns the
    /// tagged rule as persisted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Sanitize`] when the input is not valid
    /// structured data (no partial write occurs),
    /// [`EngineError::InvalidRule`] when the document is not an object or
    /// carries no identifier, and verbatim store failures otherwise.
    pub fn save_rule(&self, actor: &Actor, raw: &str) -> Result<DynamicRule, EngineError> {
        self.ensure_tenant_feature(actor, SETTING_VENDOR_DYNAMIC_RULES)?;
        let sanitized = sanitize_document(raw)?;
        let rule = DynamicRule::from_value(&sanitized)
            .ok_or_else(|| EngineError::InvalidRule("rule document must be an object".to_string()))?;
        let tagged = tag_rule(&rule, actor.is_restricted_tenant);
        let rule_id = tagged
            .rule_id()
            .ok_or_else(|| EngineError::InvalidRule("rule document has no id".to_string()))?;
        self.store.upsert(
            Collection::DynamicRules,
            rule_id.as_str(),
            tagged.clone().into_value(),
        )?;
        Ok(tagged)
    }

    // ------------------------------------------------------------------
    // Product discounts
    // ------------------------------------------------------------------

    /// Persists discount sets for every target of a product shape.
    ///
    /// A simple product writes one set keyed by its product id; a variable
    /// product writes one set per child variation. Targets without a payload
    /// are skipped; payloads for unknown targets are ignored. Every payload
    /// passes through the sanitizer and is parsed before the first upsert,
    /// so a rejected payload leaves no partial state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Sanitize`] when any payload fails to parse
    /// (nothing is written) and verbatim store failures.
    pub fn save_product_discounts(
        &self,
        actor: &Actor,
        shape: &ProductShape,
        payloads: &[(ProductId, String)],
    ) -> Result<Vec<(ProductId, ProductDiscountSet)>, EngineError> {
        self.ensure_tenant_feature(actor, SETTING_VENDOR_ROLE_BASED_PRICING)?;
        let mut validated = Vec::new();
        for target in shape.discount_targets() {
            let Some((_, raw)) = payloads.iter().find(|(id, _)| id == &target) else {
                continue;
            };
            let sanitized = sanitize_document(raw)?;
            let discounts = ProductDiscountSet::from_value(&sanitized);
            let document = serde_json::to_value(&discounts)
                .map_err(|err| StoreError::Invalid(err.to_string()))?;
            validated.push((target, discounts, document));
        }
        let mut saved = Vec::with_capacity(validated.len());
        for (target, discounts, document) in validated {
            self.store.upsert(Collection::ProductDiscounts, target.as_str(), document)?;
            saved.push((target, discounts));
        }
        Ok(saved)
    }

    // ------------------------------------------------------------------
    // Conversations
    // ------------------------------------------------------------------

    /// Returns the conversation records visible on a surface.
    ///
    /// Tenant frontend queries are pinned to the actor's vendor id; operator
    /// queries exclude vendor-tagged records. Malformed store entries are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FeatureDisabled`] on the tenant surface when
    /// conversations are disabled, and verbatim store failures.
    pub fn conversations(
        &self,
        actor: &Actor,
        surface: Surface,
    ) -> Result<Vec<ConversationRecord>, EngineError> {
        if surface == Surface::TenantFrontend {
            self.ensure_feature(SETTING_VENDOR_CONVERSATIONS)?;
        }
        let documents = self.store.read_all(Collection::Conversations)?;
        let query =
            scope_conversation_query(ConversationQuery::new(), surface, actor.vendor_id.as_ref());
        Ok(documents
            .into_iter()
            .filter_map(|document| serde_json::from_value::<ConversationRecord>(document).ok())
            .filter(|record| query.matches(record))
            .collect())
    }

    /// Persists a conversation record.
    ///
    /// A restricted tenant author stamps the record with their vendor id;
    /// the tag is write-once and an existing tag is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FeatureDisabled`] for restricted tenants when
    /// conversations are disabled, and verbatim store failures.
    pub fn save_conversation(
        &self,
        actor: &Actor,
        record: ConversationRecord,
    ) -> Result<ConversationRecord, EngineError> {
        self.ensure_tenant_feature(actor, SETTING_VENDOR_CONVERSATIONS)?;
        let record = match (&actor.vendor_id, actor.is_restricted_tenant) {
            (Some(vendor_id), true) => record.assign_vendor_recipient(vendor_id.clone()),
            _ => record,
        };
        let document: Value = serde_json::to_value(&record)
            .map_err(|err| StoreError::Invalid(err.to_string()))?;
        self.store.upsert(
            Collection::Conversations,
            record.conversation_id.as_str(),
            document,
        )?;
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Feature gating
    // ------------------------------------------------------------------

    /// Requires a feature flag for restricted tenant actors.
    ///
    /// Operators are never gated; flags scope tenant-facing features only.
    fn ensure_tenant_feature(&self, actor: &Actor, key: &str) -> Result<(), EngineError> {
        if actor.is_restricted_tenant {
            self.ensure_feature(key)?;
        }
        Ok(())
    }

    /// Requires a feature flag unconditionally.
    fn ensure_feature(&self, key: &str) -> Result<(), EngineError> {
        if self.settings.is_feature_enabled(key) {
            Ok(())
        } else {
            Err(EngineError::FeatureDisabled {
                key: key.to_string(),
            })
        }
    }
}
