// marketscope-core/src/runtime/store.rs
// ============================================================================
// Module: Marketscope In-Memory Store
// Description: Simple in-memory rule store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`RuleStore`]
//! for tests and local demos. Upserts are last-write-wins per document
//! identifier. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;

use crate::interfaces::Collection;
use crate::interfaces::RuleStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory rule store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRuleStore {
    /// Collection map protected by a mutex; documents keyed by identifier.
    collections: Arc<Mutex<BTreeMap<String, BTreeMap<String, Value>>>>,
}

impl InMemoryRuleStore {
    /// Creates a new in-memory rule store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Returns the number of documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the store mutex is poisoned.
    pub fn len(&self, collection: Collection) -> Result<usize, StoreError> {
        let guard = self
            .collections
            .lock()
            .map_err(|_| StoreError::Io("rule store mutex poisoned".to_string()))?;
        Ok(guard.get(collection_key(collection)).map_or(0, BTreeMap::len))
    }

    /// Returns true when a collection holds no documents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the store mutex is poisoned.
    pub fn is_empty(&self, collection: Collection) -> Result<bool, StoreError> {
        Ok(self.len(collection)? == 0)
    }
}

impl RuleStore for InMemoryRuleStore {
    fn read_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let guard = self
            .collections
            .lock()
            .map_err(|_| StoreError::Io("rule store mutex poisoned".to_string()))?;
        Ok(guard
            .get(collection_key(collection))
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    fn upsert(&self, collection: Collection, id: &str, document: Value) -> Result<(), StoreError> {
        if id.is_empty() {
            return Err(StoreError::Invalid("document id must not be empty".to_string()));
        }
        let mut guard = self
            .collections
            .lock()
            .map_err(|_| StoreError::Io("rule store mutex poisoned".to_string()))?;
        guard
            .entry(collection_key(collection).to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared rule store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedRuleStore {
    /// Inner store implementation.
    inner: Arc<dyn RuleStore + Send + Sync>,
}

impl SharedRuleStore {
    /// Wraps a rule store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl RuleStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn RuleStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl RuleStore for SharedRuleStore {
    fn read_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        self.inner.read_all(collection)
    }

    fn upsert(&self, collection: Collection, id: &str, document: Value) -> Result<(), StoreError> {
        self.inner.upsert(collection, id, document)
    }
}

/// Returns the stable key for a collection.
const fn collection_key(collection: Collection) -> &'static str {
    match collection {
        Collection::DynamicRules => "dynamic_rules",
        Collection::Conversations => "conversations",
        Collection::ProductDiscounts => "product_discounts",
    }
}
