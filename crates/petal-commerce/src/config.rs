//! Storefront configuration.

use serde::{Deserialize, Serialize};

use crate::cart::DEFAULT_SLOT_KEY;
use crate::checkout::DEFAULT_RELAY_ENDPOINT;

/// Top-level storefront configuration.
///
/// Every section is optional in the source file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Cart slot storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Relay handoff.
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Where the cart slot lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the cart is stored under.
    #[serde(default = "default_slot_key")]
    pub slot_key: String,

    /// Directory holding slot files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

fn default_data_dir() -> String {
    ".petal".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            slot_key: default_slot_key(),
            data_dir: default_data_dir(),
        }
    }
}

/// Messaging endpoint for relay handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_RELAY_ENDPOINT.to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: StorefrontConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.storage.slot_key, "petal-cart");
        assert_eq!(config.storage.data_dir, ".petal");
        assert_eq!(config.relay.endpoint, "https://wa.me/919898047431");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: StorefrontConfig =
            serde_json::from_str(r#"{"storage": {"slot_key": "demo-cart"}}"#).unwrap();
        assert_eq!(config.storage.slot_key, "demo-cart");
        assert_eq!(config.storage.data_dir, ".petal");
    }
}
