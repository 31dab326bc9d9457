// marketscope-core/src/core/actor.rs
// ============================================================================
// Module: Marketscope Actor Model
// Description: Requesting actor identity, view context, and query surface.
// Purpose: Carry the facts every scoping decision is made from.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Every scoping function takes an [`Actor`]: who is asking, whether they are
//! a restricted tenant, and which view they are asking from. Scoping narrows
//! the visible option and record sets only for restricted tenants inside the
//! tenant rule editor; every other combination sees the broad set unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::VendorId;

// ============================================================================
// SECTION: View Context
// ============================================================================

/// View the current request originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewContext {
    /// Tenant-facing dynamic rule editor on the vendor dashboard.
    TenantRuleEditor,
    /// Tenant-facing conversation listing on the vendor dashboard.
    TenantConversations,
    /// Operator-facing marketplace dashboard.
    OperatorDashboard,
    /// Public storefront pages.
    Storefront,
    /// Any other named view.
    Other {
        /// Host-defined view name.
        name: String,
    },
}

/// Surface a conversation query is issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Tenant-facing frontend; queries are pinned to the tenant's vendor id.
    TenantFrontend,
    /// Operator-facing backend; queries exclude vendor-tagged records.
    Operator,
}

// ============================================================================
// SECTION: Actor
// ============================================================================

/// Identity and scoping facts for the requesting actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Vendor identifier when the actor belongs to a vendor.
    pub vendor_id: Option<VendorId>,
    /// Whether the actor is a restricted tenant (vendor staff) rather than
    /// an unrestricted marketplace operator.
    pub is_restricted_tenant: bool,
    /// View the current request originates from.
    pub context: ViewContext,
}

impl Actor {
    /// Creates an unrestricted operator actor in the operator dashboard.
    #[must_use]
    pub const fn operator() -> Self {
        Self {
            vendor_id: None,
            is_restricted_tenant: false,
            context: ViewContext::OperatorDashboard,
        }
    }

    /// Creates a restricted tenant actor in the tenant rule editor.
    #[must_use]
    pub const fn tenant_in_rule_editor(vendor_id: VendorId) -> Self {
        Self {
            vendor_id: Some(vendor_id),
            is_restricted_tenant: true,
            context: ViewContext::TenantRuleEditor,
        }
    }

    /// Returns true when scoping filters must narrow option and record sets.
    ///
    /// Both facts are required: a restricted tenant outside the rule editor
    /// and an operator inside it both see the broad set.
    #[must_use]
    pub fn is_scoped_to_tenant_editor(&self) -> bool {
        self.is_restricted_tenant && self.context == ViewContext::TenantRuleEditor
    }
}
