// marketscope-core/src/core/discounts.rs
// ============================================================================
// Module: Marketscope Discount Tiers
// Description: Tier rows and per-product discount sets.
// Purpose: Model ordered role-based discount schedules for products and variations.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! A tier row is one configurable discount line; rows are ordered and the
//! order is semantically meaningful (evaluated top-to-bottom at price
//! resolution, outside this core). A product discount set maps role ids to
//! ordered tier rows for one product or variation identifier. A variable
//! product owns one set per child variation; a simple product owns exactly
//! one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ProductId;
use crate::core::identifiers::RoleId;

// ============================================================================
// SECTION: Discount Types
// ============================================================================

/// Discount type for one tier row.
///
/// Serialized in the stored document encoding: the unset variant is the
/// empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    /// No discount type chosen yet.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Flat amount off the base price.
    #[serde(rename = "amount")]
    Amount,
    /// Percentage off the base price.
    #[serde(rename = "percentage")]
    Percentage,
    /// Fixed replacement price.
    #[serde(rename = "fixed_price")]
    FixedPrice,
}

// ============================================================================
// SECTION: Tier Rows
// ============================================================================

/// One configurable discount line.
///
/// Amount and quantity stay raw strings until they pass through the
/// sanitizer; numeric interpretation happens at price resolution, outside
/// this core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRow {
    /// Discount type.
    #[serde(default)]
    pub discount_type: DiscountType,
    /// Discount amount as a numeric string.
    #[serde(default)]
    pub discount_amount: String,
    /// Minimum quantity as a numeric string.
    #[serde(default)]
    pub min_quantity: String,
}

// ============================================================================
// SECTION: Product Discount Sets
// ============================================================================

/// Ordered tier rows for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTiers {
    /// Role identifier.
    pub role: RoleId,
    /// Tier rows in evaluation order.
    pub rows: Vec<TierRow>,
}

/// Discount schedule scoped to one product or variation identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDiscountSet {
    /// Role entries in authored order.
    pub roles: Vec<RoleTiers>,
}

impl ProductDiscountSet {
    /// Creates an empty discount set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roles: Vec::new(),
        }
    }

    /// Returns the tier rows for a role when present.
    #[must_use]
    pub fn rows_for(&self, role: &RoleId) -> Option<&[TierRow]> {
        self.roles
            .iter()
            .find(|entry| &entry.role == role)
            .map(|entry| entry.rows.as_slice())
    }

    /// Parses a discount set from a sanitized document.
    ///
    /// The document maps role ids to arrays of tier row objects. Entries
    /// that are not arrays and rows that are not objects are skipped; one
    /// malformed row never rejects the whole set.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::new();
        };
        let mut roles = Vec::with_capacity(object.len());
        for (role_key, rows_value) in object {
            let Some(items) = rows_value.as_array() else {
                continue;
            };
            let rows = items
                .iter()
                .filter_map(|item| serde_json::from_value::<TierRow>(item.clone()).ok())
                .collect();
            roles.push(RoleTiers {
                role: RoleId::new(role_key.clone()),
                rows,
            });
        }
        Self {
            roles,
        }
    }
}

// ============================================================================
// SECTION: Product Shapes
// ============================================================================

/// Shape of a product for discount targeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductShape {
    /// Simple product; the product id is the single discount target.
    Simple {
        /// Product identifier.
        product_id: ProductId,
    },
    /// Variable product; each child variation is a discount target.
    Variable {
        /// Parent product identifier.
        product_id: ProductId,
        /// Child variation identifiers.
        children: Vec<ProductId>,
    },
}

impl ProductShape {
    /// Returns the identifiers discount sets are keyed by.
    ///
    /// A simple product yields its own id; a variable product yields its
    /// child variation ids (zero or more) and never the parent id.
    #[must_use]
    pub fn discount_targets(&self) -> Vec<ProductId> {
        match self {
            Self::Simple {
                product_id,
            } => vec![product_id.clone()],
            Self::Variable {
                children, ..
            } => children.clone(),
        }
    }
}
