//! Bridge configuration.
//!
//! Every field has a default, so an empty document (or no file at all) is a
//! valid configuration:
//!
//! ```
//! use horizon_a11y::BridgeConfig;
//!
//! let config = BridgeConfig::from_toml_str(r#"
//! max_adapters = 4
//! toolkit_name = "lattice"
//! "#).unwrap();
//!
//! assert_eq!(config.max_adapters, 4);
//! assert!(config.coalesce_updates);
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Tunables for an [`AccessibilityBridge`](crate::AccessibilityBridge).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Maximum number of live adapters; creation fails beyond it.
    pub max_adapters: usize,
    /// Collapse bursts of off-thread update requests per adapter.
    pub coalesce_updates: bool,
    /// Update requests delivered per [`process_pending`] call; 0 drains
    /// everything queued at the time of the call.
    ///
    /// [`process_pending`]: crate::AccessibilityBridge::process_pending
    pub drain_batch_size: usize,
    /// Toolkit name reported with each tree.
    pub toolkit_name: Option<String>,
    /// Toolkit version reported with each tree.
    pub toolkit_version: Option<String>,
    /// Accessible name given to the root node of new adapters.
    pub root_name: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_adapters: 16,
            coalesce_updates: true,
            drain_batch_size: 0,
            toolkit_name: None,
            toolkit_version: None,
            root_name: None,
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: horizon_a11y_core::logging::targets::LIFECYCLE,
            path = %path.display(),
            "loaded bridge configuration"
        );
        Ok(config)
    }
}
