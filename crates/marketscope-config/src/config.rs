// marketscope-config/src/config.rs
// ============================================================================
// Module: Marketscope Configuration
// Description: Configuration loading and validation for Marketscope.
// Purpose: Provide strict config parsing with documented defaults.
// Dependencies: marketscope-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a strict size limit. Every
//! feature flag defaults to enabled; absence of a setting resolves to its
//! documented default, never to a silent "disabled". The loaded document
//! implements the core's [`SettingsProvider`] so the engine reads flags
//! through one injected interface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use marketscope_core::SETTING_VENDOR_CONVERSATIONS;
use marketscope_core::SETTING_VENDOR_DYNAMIC_RULES;
use marketscope_core::SETTING_VENDOR_PRODUCT_SECTION;
use marketscope_core::SETTING_VENDOR_ROLE_BASED_PRICING;
use marketscope_core::SettingValue;
use marketscope_core::SettingsProvider;
use marketscope_core::TierCaps;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "marketscope.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "MARKETSCOPE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Marketscope deployment configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketscopeConfig {
    /// Tenant-facing feature flags.
    #[serde(default)]
    pub features: FeatureFlags,
    /// Tier caps applied by the schema builder.
    #[serde(default)]
    pub tier_caps: TierCapsConfig,
    /// Free-form host settings exposed through the settings provider.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// Tenant-facing feature flags, all enabled by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Dynamic rule editor on the vendor dashboard.
    #[serde(default = "enabled")]
    pub vendor_dynamic_rules: bool,
    /// Conversations on the vendor dashboard.
    #[serde(default = "enabled")]
    pub vendor_conversations: bool,
    /// Role-based pricing on vendor products.
    #[serde(default = "enabled")]
    pub vendor_role_based_pricing: bool,
    /// Product options section on the vendor product editor.
    #[serde(default = "enabled")]
    pub vendor_product_section: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            vendor_dynamic_rules: true,
            vendor_conversations: true,
            vendor_role_based_pricing: true,
            vendor_product_section: true,
        }
    }
}

/// Serde default helper for enabled flags.
const fn enabled() -> bool {
    true
}

/// Tier caps configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCapsConfig {
    /// Cap for b2b roles.
    #[serde(default = "default_b2b_cap")]
    pub b2b: u32,
    /// Cap for b2c roles.
    #[serde(default = "default_b2c_cap")]
    pub b2c: u32,
}

impl Default for TierCapsConfig {
    fn default() -> Self {
        Self {
            b2b: default_b2b_cap(),
            b2c: default_b2c_cap(),
        }
    }
}

/// Serde default helper for the b2b tier cap.
const fn default_b2b_cap() -> u32 {
    marketscope_core::roles::DEFAULT_B2B_TIER_LIMIT
}

/// Serde default helper for the b2c tier cap.
const fn default_b2c_cap() -> u32 {
    marketscope_core::roles::DEFAULT_B2C_TIER_LIMIT
}

impl TierCapsConfig {
    /// Converts into the core tier caps value.
    #[must_use]
    pub const fn to_tier_caps(&self) -> TierCaps {
        TierCaps {
            b2b: self.b2b,
            b2c: self.b2c,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(String),
    /// Configuration file failed to parse.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// Configuration content is invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl MarketscopeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from the `MARKETSCOPE_CONFIG` environment variable
    /// when set, otherwise `marketscope.toml` in the working directory. A
    /// missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read,
    /// parsed, or validated.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path =
            env::var_os(CONFIG_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds the
    /// size limit, fails to parse, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if raw.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "config file exceeds size limit: {} bytes (max {MAX_CONFIG_FILE_SIZE})",
                raw.len()
            )));
        }
        Self::from_toml_str(&raw)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a tier cap is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tier_caps.b2b == 0 {
            return Err(ConfigError::Invalid("tier_caps.b2b must be nonzero".to_string()));
        }
        if self.tier_caps.b2c == 0 {
            return Err(ConfigError::Invalid("tier_caps.b2c must be nonzero".to_string()));
        }
        Ok(())
    }

    /// Returns the named feature flag when it is one of the known flags.
    fn feature_flag(&self, key: &str) -> Option<bool> {
        match key {
            SETTING_VENDOR_DYNAMIC_RULES => Some(self.features.vendor_dynamic_rules),
            SETTING_VENDOR_CONVERSATIONS => Some(self.features.vendor_conversations),
            SETTING_VENDOR_ROLE_BASED_PRICING => Some(self.features.vendor_role_based_pricing),
            SETTING_VENDOR_PRODUCT_SECTION => Some(self.features.vendor_product_section),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Settings Provider
// ============================================================================

impl SettingsProvider for MarketscopeConfig {
    fn get_setting(&self, key: &str, default: SettingValue) -> SettingValue {
        if let Some(flag) = self.feature_flag(key) {
            return SettingValue::Flag(flag);
        }
        self.settings.get(key).map_or(default, |text| SettingValue::Text(text.clone()))
    }
}
