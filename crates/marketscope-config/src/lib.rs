// marketscope-config/src/lib.rs
// ============================================================================
// Module: Marketscope Config Library
// Description: Public API surface for Marketscope configuration.
// Purpose: Expose the configuration model, loading, and validation.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Marketscope config provides the typed deployment configuration for the
//! scoping engine: tenant-facing feature flags, tier caps, and free-form
//! host settings, loaded from TOML with documented defaults. The loaded
//! document implements the core's settings provider interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::FeatureFlags;
pub use config::MarketscopeConfig;
pub use config::TierCapsConfig;
