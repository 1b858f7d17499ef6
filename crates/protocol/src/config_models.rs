//! Global configuration models for `.config-kit/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls project-wide generation settings.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Schema version written at the top of every generated document.
pub const DEFAULT_SCHEMA_VERSION: f64 = 2.1;

fn default_version() -> f64 {
    DEFAULT_SCHEMA_VERSION
}

/// Represents global settings from `.config-kit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .config-kit/config.toml
/// version = 2.1
/// flatten = true
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GlobalConfig {
    /// Schema version emitted as the document's `version` key.
    #[serde(default = "default_version")]
    pub version: f64,

    /// Generate flattened jobs by default.
    ///
    /// When enabled, parameterized jobs are emitted with every
    /// `<< parameters.* >>` placeholder replaced by its default value and
    /// without a `parameters` section.
    #[serde(default)]
    pub flatten: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_SCHEMA_VERSION,
            flatten: false,
        }
    }
}
