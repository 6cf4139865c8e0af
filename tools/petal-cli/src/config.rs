//! Loading and saving the storefront configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use petal_commerce::config::StorefrontConfig;

/// File names searched for, nearest directory first.
pub const CONFIG_NAMES: [&str; 3] = ["petal.toml", ".petal.toml", "petal.json"];

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Load config from a file. `.json` files are parsed as JSON, anything else as TOML.
pub fn load(path: &Path) -> Result<StorefrontConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}

/// Save config to a file in the format its extension names.
pub fn save(config: &StorefrontConfig, path: &Path) -> Result<()> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

/// Generate a commented default petal.toml.
pub fn generate_default_config() -> String {
    let defaults = StorefrontConfig::default();
    format!(
        r#"# Petal storefront configuration

[storage]
# Key the cart is stored under.
slot_key = "{slot_key}"
# Directory holding slot files, relative to this file's directory.
data_dir = "{data_dir}"

[relay]
# Messaging endpoint orders are forwarded to with `petal checkout --relay`.
endpoint = "{endpoint}"
"#,
        slot_key = defaults.storage.slot_key,
        data_dir = defaults.storage.data_dir,
        endpoint = defaults.relay.endpoint,
    )
}
