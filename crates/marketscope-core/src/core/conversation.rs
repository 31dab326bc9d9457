// marketscope-core/src/core/conversation.rs
// ============================================================================
// Module: Marketscope Conversations
// Description: Permissioned per-vendor conversation records and query scoping.
// Purpose: Keep vendor-tagged conversations invisible outside their vendor.
// Dependencies: crate::core::{actor, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! A conversation record with no vendor tag is an operator/global
//! conversation. A record tagged with a vendor id is visible only to that
//! vendor and the conversation's declared participants. The two query
//! surfaces partition the store: tenant frontend queries pin the vendor id,
//! operator queries require the tag to be absent, so the surfaces never
//! overlap on vendor-tagged records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::actor::Surface;
use crate::core::identifiers::ConversationId;
use crate::core::identifiers::VendorId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Conversation Records
// ============================================================================

/// Lifecycle status of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Conversation is awaiting replies.
    Open,
    /// Conversation has been marked resolved.
    Resolved,
}

/// Permissioned conversation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Conversation identifier.
    pub conversation_id: ConversationId,
    /// Author identifier (user id as an opaque string).
    pub author: String,
    /// Declared recipient identifiers.
    pub recipients: Vec<String>,
    /// Vendor tag; absent for operator/global conversations.
    pub vendor_id: Option<VendorId>,
    /// Creation time supplied by the host.
    pub created_at: Timestamp,
    /// Lifecycle status.
    pub status: ConversationStatus,
}

impl ConversationRecord {
    /// Assigns the vendor tag on a newly created conversation.
    ///
    /// The tag is write-once: an existing tag is never overwritten.
    #[must_use]
    pub fn assign_vendor_recipient(mut self, vendor_id: VendorId) -> Self {
        if self.vendor_id.is_none() {
            self.vendor_id = Some(vendor_id);
        }
        self
    }
}

// ============================================================================
// SECTION: Query Scoping
// ============================================================================

/// Metadata predicate appended to a conversation query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetaPredicate {
    /// Record's vendor tag must equal the given vendor id.
    VendorEquals {
        /// Required vendor id.
        vendor_id: VendorId,
    },
    /// Record must carry no vendor tag.
    VendorAbsent,
}

impl MetaPredicate {
    /// Evaluates the predicate against a record.
    #[must_use]
    pub fn matches(&self, record: &ConversationRecord) -> bool {
        match self {
            Self::VendorEquals {
                vendor_id,
            } => record.vendor_id.as_ref() == Some(vendor_id),
            Self::VendorAbsent => record.vendor_id.is_none(),
        }
    }
}

/// Conversation query as a conjunction of metadata predicates.
///
/// The predicate list always exists; scoping appends to it rather than
/// conditionally initializing it, so an appended vendor predicate can never
/// be dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationQuery {
    /// Predicates combined with AND.
    pub predicates: Vec<MetaPredicate>,
}

impl ConversationQuery {
    /// Creates an unscoped query matching every record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Evaluates the query against a record.
    #[must_use]
    pub fn matches(&self, record: &ConversationRecord) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(record))
    }
}

/// Appends the surface's vendor predicate to a base query.
///
/// Tenant frontend queries are pinned to the requesting vendor id; operator
/// queries require the vendor tag to be absent. A tenant frontend call with
/// no vendor id yields a query that matches nothing (fail closed) rather
/// than an unscoped query.
#[must_use]
pub fn scope_conversation_query(
    base: ConversationQuery,
    surface: Surface,
    vendor_id: Option<&VendorId>,
) -> ConversationQuery {
    let mut scoped = base;
    match surface {
        Surface::TenantFrontend => match vendor_id {
            Some(vendor_id) => {
                scoped.predicates.push(MetaPredicate::VendorEquals {
                    vendor_id: vendor_id.clone(),
                });
            }
            None => {
                // No vendor identity on the tenant surface: require both an
                // absent and a present tag so nothing matches.
                scoped.predicates.push(MetaPredicate::VendorAbsent);
                scoped.predicates.push(MetaPredicate::VendorEquals {
                    vendor_id: VendorId::new(""),
                });
            }
        },
        Surface::Operator => {
            scoped.predicates.push(MetaPredicate::VendorAbsent);
        }
    }
    scoped
}

// ============================================================================
// SECTION: View Grants
// ============================================================================

/// Additive conversation view grant for vendors.
///
/// Returns true when access was already granted by another rule, or when the
/// requesting vendor id equals the conversation's vendor tag. Never revokes
/// access.
#[must_use]
pub fn can_view_conversation(
    is_currently_allowed: bool,
    conversation_vendor_id: Option<&VendorId>,
    requesting_vendor_id: Option<&VendorId>,
) -> bool {
    if is_currently_allowed {
        return true;
    }
    match (conversation_vendor_id, requesting_vendor_id) {
        (Some(tagged), Some(requesting)) => tagged == requesting,
        _ => false,
    }
}

/// Adds a vendor id to the allowed author set when absent.
///
/// Duplicate entries are never introduced; the existing set is otherwise
/// returned unchanged.
#[must_use]
pub fn allowed_authors(existing: &[String], vendor_id: &VendorId) -> Vec<String> {
    let mut authors = existing.to_vec();
    if !authors.iter().any(|author| author == vendor_id.as_str()) {
        authors.push(vendor_id.as_str().to_string());
    }
    authors
}
