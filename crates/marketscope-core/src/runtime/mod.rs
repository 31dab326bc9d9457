// marketscope-core/src/runtime/mod.rs
// ============================================================================
// Module: Marketscope Runtime
// Description: Engine composition, extension pipeline, and in-memory store.
// Purpose: Re-export the runtime surface for the crate root.
// Dependencies: crate::runtime submodules
// ============================================================================

//! ## Overview
//! The runtime wires the pure core functions to injected collaborators: a
//! settings provider, a rule store adapter, and ordered extension pipelines.
//! No runtime component holds state across calls beyond the store adapter it
//! delegates to.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;
pub mod pipeline;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::EngineError;
pub use engine::ScopingEngine;
pub use pipeline::ScopingHooks;
pub use pipeline::TransformPipeline;
pub use store::InMemoryRuleStore;
pub use store::SharedRuleStore;
