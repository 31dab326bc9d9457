// marketscope-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Marketscope Transform Pipeline
// Description: Ordered transform seams for external extensions.
// Purpose: Apply registered value transforms in registration order.
// Dependencies: crate::core::{actor, rules, schema}
// ============================================================================

//! ## Overview
//! Named extension hooks generalize to ordered transform pipelines: each
//! registered transform takes the current value and the requesting actor and
//! returns a replacement value. The engine applies all transforms for a seam
//! in registration order, after the base computation and the scoping filter.
//! There is no global dispatch table; hooks are owned by the engine instance
//! that applies them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::actor::Actor;
use crate::core::rules::DynamicRule;
use crate::core::rules::OptionSet;
use crate::core::schema::ProductSchema;
use crate::core::schema::SchemaSection;

// ============================================================================
// SECTION: Transform Pipeline
// ============================================================================

/// Boxed transform applied at one seam.
type Transform<T> = Box<dyn Fn(T, &Actor) -> T + Send + Sync>;

/// Ordered pipeline of value transforms for one named seam.
pub struct TransformPipeline<T> {
    /// Transforms in registration order.
    transforms: Vec<Transform<T>>,
}

impl<T> TransformPipeline<T> {
    /// Creates an empty pipeline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Registers a transform at the end of the pipeline.
    pub fn register(&mut self, transform: impl Fn(T, &Actor) -> T + Send + Sync + 'static) {
        self.transforms.push(Box::new(transform));
    }

    /// Applies all registered transforms in registration order.
    #[must_use]
    pub fn apply(&self, value: T, actor: &Actor) -> T {
        self.transforms.iter().fold(value, |current, transform| transform(current, actor))
    }

    /// Returns the number of registered transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true when no transforms are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl<T> Default for TransformPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Scoping Hooks
// ============================================================================

/// Extension seams exposed by the scoping engine.
///
/// Applied in the fixed order: base computation, scoping filter, then the
/// seam's registered transforms.
#[derive(Default)]
pub struct ScopingHooks {
    /// Transforms over the merged product schema.
    pub schema: TransformPipeline<ProductSchema>,
    /// Transforms over the b2c section before merging.
    pub b2c_section: TransformPipeline<SchemaSection>,
    /// Transforms over the b2b section before merging.
    pub b2b_section: TransformPipeline<SchemaSection>,
    /// Transforms over the scoped rule type option set.
    pub rule_types: TransformPipeline<OptionSet>,
    /// Transforms over the scoped product filter option set.
    pub product_filters: TransformPipeline<OptionSet>,
    /// Transforms over the scoped condition option set.
    pub conditions: TransformPipeline<OptionSet>,
    /// Transforms over the final scoped rule collection.
    pub rule_collection: TransformPipeline<Vec<DynamicRule>>,
}

impl ScopingHooks {
    /// Creates an empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
