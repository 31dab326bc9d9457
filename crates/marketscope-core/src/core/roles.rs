// marketscope-core/src/core/roles.rs
// ============================================================================
// Module: Marketscope Role Catalog
// Description: Role definitions consumed by the schema builder.
// Purpose: Parse externally supplied role documents, skipping malformed entries.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! Roles are supplied by an external catalog as loose JSON documents. A role
//! document missing its `value` key is malformed and is skipped entirely;
//! schema construction must never abort because one catalog entry is bad.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::RoleId;

// ============================================================================
// SECTION: Role Category
// ============================================================================

/// Default tier cap offered to non-privileged editors of b2b role tiers.
pub const DEFAULT_B2B_TIER_LIMIT: u32 = 3;

/// Default tier cap offered to non-privileged editors of b2c role tiers.
pub const DEFAULT_B2C_TIER_LIMIT: u32 = 2;

/// Category tag for a marketplace role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    /// Business-to-business roles (wholesale buyers).
    B2b,
    /// Business-to-consumer roles (retail buyers).
    B2c,
}

impl RoleCategory {
    /// Returns the default tier limit for roles in this category.
    #[must_use]
    pub const fn default_tier_limit(self) -> u32 {
        match self {
            Self::B2b => DEFAULT_B2B_TIER_LIMIT,
            Self::B2c => DEFAULT_B2C_TIER_LIMIT,
        }
    }
}

// ============================================================================
// SECTION: Role
// ============================================================================

/// Role definition consumed by the schema builder.
///
/// Roles are immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role identifier (the catalog `value` key).
    pub value: RoleId,
    /// Display name shown in schema labels.
    pub name: String,
    /// Category tag.
    pub category: RoleCategory,
    /// Explicit per-role override of the tier cap offered to non-privileged
    /// editors. When absent, the schema builder applies the configured cap
    /// for the role's category.
    pub tier_limit: Option<u32>,
}

impl Role {
    /// Parses a role from a loose catalog document.
    ///
    /// Returns `None` when the document is not an object or is missing its
    /// `value` key. The display name falls back to the role id when absent.
    /// An explicit `tier_limit` key overrides the category default.
    #[must_use]
    pub fn from_document(document: &Value, category: RoleCategory) -> Option<Self> {
        let object = document.as_object()?;
        let value = object.get("value")?.as_str()?;
        let name = object.get("name").and_then(Value::as_str).unwrap_or(value);
        let tier_limit = object
            .get("tier_limit")
            .and_then(Value::as_u64)
            .and_then(|raw| u32::try_from(raw).ok());
        Some(Self {
            value: RoleId::new(value),
            name: name.to_string(),
            category,
            tier_limit,
        })
    }
}

// ============================================================================
// SECTION: Catalog Parsing
// ============================================================================

/// Parses a sequence of role documents, skipping malformed entries.
#[must_use]
pub fn roles_from_documents(documents: &[Value], category: RoleCategory) -> Vec<Role> {
    documents
        .iter()
        .filter_map(|document| Role::from_document(document, category))
        .collect()
}
