// marketscope-core/src/lib.rs
// ============================================================================
// Module: Marketscope Core Library
// Description: Public API surface for the Marketscope core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Marketscope core provides tenant-scoped views over shared marketplace
//! rule and record collections: deterministic discount schema building,
//! creation provenance tagging, subset-only scoping filters, and recursive
//! input sanitization. It is backend-agnostic and integrates through
//! explicit interfaces rather than embedding into a host platform.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Collection;
pub use interfaces::IdentityProvider;
pub use interfaces::RoleSource;
pub use interfaces::RoleSourceError;
pub use interfaces::RuleStore;
pub use interfaces::SETTING_VENDOR_CONVERSATIONS;
pub use interfaces::SETTING_VENDOR_DYNAMIC_RULES;
pub use interfaces::SETTING_VENDOR_PRODUCT_SECTION;
pub use interfaces::SETTING_VENDOR_ROLE_BASED_PRICING;
pub use interfaces::SettingValue;
pub use interfaces::SettingsProvider;
pub use interfaces::StoreError;
pub use runtime::EngineError;
pub use runtime::InMemoryRuleStore;
pub use runtime::ScopingEngine;
pub use runtime::ScopingHooks;
pub use runtime::SharedRuleStore;
pub use runtime::TransformPipeline;
