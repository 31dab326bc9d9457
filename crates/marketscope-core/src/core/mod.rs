// marketscope-core/src/core/mod.rs
// ============================================================================
// Module: Marketscope Core Types
// Description: Core data model for scoping, schemas, rules, and sanitization.
// Purpose: Re-export the core type surface for the crate root.
// Dependencies: crate::core submodules
// ============================================================================

//! ## Overview
//! Core types are pure data and pure functions: identifiers, actors, roles,
//! schema descriptors, rule documents and filters, conversation records and
//! query scoping, discount tiers, and the sanitizer. Nothing in this tree
//! touches storage or holds state across calls.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod actor;
pub mod conversation;
pub mod discounts;
pub mod hashing;
pub mod identifiers;
pub mod roles;
pub mod rules;
pub mod sanitize;
pub mod schema;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use actor::Actor;
pub use actor::Surface;
pub use actor::ViewContext;
pub use conversation::ConversationQuery;
pub use conversation::ConversationRecord;
pub use conversation::ConversationStatus;
pub use conversation::MetaPredicate;
pub use conversation::allowed_authors;
pub use conversation::can_view_conversation;
pub use conversation::scope_conversation_query;
pub use discounts::DiscountType;
pub use discounts::ProductDiscountSet;
pub use discounts::ProductShape;
pub use discounts::RoleTiers;
pub use discounts::TierRow;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::ConversationId;
pub use identifiers::ProductId;
pub use identifiers::RoleId;
pub use identifiers::RuleId;
pub use identifiers::VendorId;
pub use roles::Role;
pub use roles::RoleCategory;
pub use roles::roles_from_documents;
pub use rules::CREATED_FROM_KEY;
pub use rules::CREATED_FROM_VENDOR_DASHBOARD;
pub use rules::DynamicRule;
pub use rules::OptionEntry;
pub use rules::OptionSet;
pub use rules::TENANT_DENIED_CONDITIONS;
pub use rules::TENANT_DENIED_PRODUCT_FILTERS;
pub use rules::TENANT_DENIED_RULE_TYPES;
pub use rules::filter_conditions;
pub use rules::filter_product_filters;
pub use rules::filter_rule_collection;
pub use rules::filter_rule_types;
pub use rules::tag_rule;
pub use sanitize::SanitizeError;
pub use sanitize::sanitize_document;
pub use sanitize::sanitize_text;
pub use sanitize::sanitize_value;
pub use schema::ButtonField;
pub use schema::ExtraField;
pub use schema::FieldKind;
pub use schema::NumberField;
pub use schema::PricesBlock;
pub use schema::ProductSchema;
pub use schema::RoleSectionEntry;
pub use schema::RoleTierSection;
pub use schema::SchemaSection;
pub use schema::SelectField;
pub use schema::SelectOption;
pub use schema::TierCapAnnotation;
pub use schema::TierCaps;
pub use schema::TierRowFields;
pub use schema::TierTable;
pub use schema::build_schema;
pub use time::Timestamp;
