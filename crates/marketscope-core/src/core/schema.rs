// marketscope-core/src/core/schema.rs
// ============================================================================
// Module: Marketscope Schema Builder
// Description: Nested field-schema construction for discount tier inputs.
// Purpose: Build deterministic, typed schemas describing per-role tier fields.
// Dependencies: crate::core::{hashing, identifiers, roles}, serde
// ============================================================================

//! ## Overview
//! The schema builder emits one tier section per role describing the
//! configurable discount inputs: discount type, amount, and minimum quantity,
//! plus per-role tier caps and action buttons. B2B roles additionally carry a
//! prices sub-block. Output is partitioned into a b2c section and a b2b
//! section; callers transform each section through named pipeline seams
//! before merging. Field descriptors are a closed set of tagged variants so
//! schema construction is exhaustively checkable.
//!
//! Construction is pure and deterministic: identical role inputs always
//! produce an identical schema, witnessed by [`ProductSchema::canonical_hash`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::RoleId;
use crate::core::roles::Role;
use crate::core::roles::RoleCategory;

// ============================================================================
// SECTION: Field Descriptors
// ============================================================================

/// Single option in a select field, ordered as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Stored option key (empty string for the placeholder option).
    pub key: String,
    /// Display label.
    pub label: String,
}

/// Numeric input field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberField {
    /// Display label.
    pub label: String,
    /// Placeholder text shown when empty.
    pub placeholder: String,
    /// Default value as a raw string.
    pub default: String,
}

impl NumberField {
    /// Creates a number field with an empty placeholder and default.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            placeholder: String::new(),
            default: String::new(),
        }
    }
}

/// Select input field descriptor with a fixed, ordered option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectField {
    /// Display label.
    pub label: String,
    /// Ordered options.
    pub options: Vec<SelectOption>,
    /// Default option key.
    pub default: String,
}

/// Action button descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonField {
    /// Display label.
    pub label: String,
}

/// Closed set of field kinds emitted by the schema builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Numeric input.
    Number(NumberField),
    /// Select input.
    Select(SelectField),
    /// Action button.
    Button(ButtonField),
}

// ============================================================================
// SECTION: Tier Table
// ============================================================================

/// Per-row field definitions for one tier table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRowFields {
    /// Discount type select with the four fixed options.
    pub discount_type: SelectField,
    /// Discount amount numeric field.
    pub discount_amount: NumberField,
    /// Minimum quantity numeric field.
    pub min_quantity: NumberField,
}

/// Tier table descriptor for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    /// Column headers in display order.
    pub columns: Vec<String>,
    /// Field definitions applied to every row.
    pub data: TierRowFields,
    /// Row-append action.
    pub add: ButtonField,
    /// Upgrade action shown when the tier cap is reached.
    pub upgrade_pro: ButtonField,
}

/// Base and sale price fields offered to b2b roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricesBlock {
    /// Base price field.
    pub base_price: NumberField,
    /// Sale price field.
    pub sale_price: NumberField,
}

/// Tier cap annotation for non-privileged editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCapAnnotation {
    /// Maximum number of tier rows offered.
    pub limit: u32,
}

// ============================================================================
// SECTION: Role Sections
// ============================================================================

/// Named extra field injected into a role section by an extension hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraField {
    /// Field key within the section.
    pub key: String,
    /// Field descriptor.
    pub field: FieldKind,
}

/// Schema section emitted for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTierSection {
    /// Section label (role display name).
    pub label: String,
    /// Tier cap for non-privileged editors.
    pub pro_data: TierCapAnnotation,
    /// Prices sub-block, present for b2b roles only.
    pub prices: Option<PricesBlock>,
    /// Tier table definition.
    pub tier: TierTable,
    /// Extra fields appended by section extension hooks; empty when built.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<ExtraField>,
}

/// One role entry inside a schema section, ordered as the catalog supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSectionEntry {
    /// Role identifier keying the section.
    pub role: RoleId,
    /// Section body.
    pub section: RoleTierSection,
}

/// Ordered collection of role sections under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSection {
    /// Section heading label.
    pub label: String,
    /// Role entries in catalog order.
    pub entries: Vec<RoleSectionEntry>,
}

/// Complete product discount schema, partitioned by role category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSchema {
    /// B2C role sections.
    pub b2c_section: SchemaSection,
    /// B2B role sections.
    pub b2b_section: SchemaSection,
}

impl ProductSchema {
    /// Computes the canonical fingerprint of the schema.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn canonical_hash(&self) -> Result<HashDigest, HashError> {
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, self)
    }
}

// ============================================================================
// SECTION: Tier Caps
// ============================================================================

/// Configurable tier caps applied when a role carries no explicit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCaps {
    /// Cap for b2b roles.
    pub b2b: u32,
    /// Cap for b2c roles.
    pub b2c: u32,
}

impl Default for TierCaps {
    fn default() -> Self {
        Self {
            b2b: RoleCategory::B2b.default_tier_limit(),
            b2c: RoleCategory::B2c.default_tier_limit(),
        }
    }
}

impl TierCaps {
    /// Returns the cap for the given role category.
    #[must_use]
    pub const fn for_category(&self, category: RoleCategory) -> u32 {
        match category {
            RoleCategory::B2b => self.b2b,
            RoleCategory::B2c => self.b2c,
        }
    }
}

// ============================================================================
// SECTION: Schema Construction
// ============================================================================

/// B2B section heading label.
const B2B_SECTION_LABEL: &str = "B2B Special";

/// Builds the complete product discount schema for the supplied role catalogs.
///
/// Emits one tier section per role, in catalog order. Roles were parsed by
/// [`crate::core::roles::roles_from_documents`], which already skipped
/// malformed catalog entries. No side effects; deterministic for identical
/// inputs.
#[must_use]
pub fn build_schema(b2b_roles: &[Role], b2c_roles: &[Role], caps: &TierCaps) -> ProductSchema {
    let b2c_entries = b2c_roles.iter().map(|role| role_entry(role, caps)).collect();
    let b2b_entries = b2b_roles.iter().map(|role| role_entry(role, caps)).collect();
    ProductSchema {
        b2c_section: SchemaSection {
            label: String::new(),
            entries: b2c_entries,
        },
        b2b_section: SchemaSection {
            label: B2B_SECTION_LABEL.to_string(),
            entries: b2b_entries,
        },
    }
}

/// Builds the section entry for one role.
fn role_entry(role: &Role, caps: &TierCaps) -> RoleSectionEntry {
    let limit = role.tier_limit.unwrap_or_else(|| caps.for_category(role.category));
    let prices = match role.category {
        RoleCategory::B2b => Some(PricesBlock {
            base_price: NumberField::new("Base Price"),
            sale_price: NumberField::new("Sale Price"),
        }),
        RoleCategory::B2c => None,
    };
    RoleSectionEntry {
        role: role.value.clone(),
        section: RoleTierSection {
            label: role.name.clone(),
            pro_data: TierCapAnnotation {
                limit,
            },
            prices,
            tier: tier_table(&role.name),
            extra: Vec::new(),
        },
    }
}

/// Builds the tier table descriptor for one role.
fn tier_table(role_name: &str) -> TierTable {
    TierTable {
        columns: vec![
            "Discount Type".to_string(),
            format!("{role_name} Price"),
            "Min Quantity".to_string(),
        ],
        data: TierRowFields {
            discount_type: SelectField {
                label: "Discount Type".to_string(),
                options: discount_type_options(),
                default: String::new(),
            },
            discount_amount: NumberField::new(format!("{role_name} Price")),
            min_quantity: NumberField::new("Min Quantity"),
        },
        add: ButtonField {
            label: "Add Price Tier".to_string(),
        },
        upgrade_pro: ButtonField {
            label: "Go For Unlimited Price Tiers".to_string(),
        },
    }
}

/// Returns the four fixed discount type options.
fn discount_type_options() -> Vec<SelectOption> {
    vec![
        SelectOption {
            key: String::new(),
            label: "Choose Discount Type...".to_string(),
        },
        SelectOption {
            key: "amount".to_string(),
            label: "Discount Amount".to_string(),
        },
        SelectOption {
            key: "percentage".to_string(),
            label: "Discount Percentage".to_string(),
        },
        SelectOption {
            key: "fixed_price".to_string(),
            label: "Fixed Price".to_string(),
        },
    ]
}
