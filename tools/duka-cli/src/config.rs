//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use duka_backend::LatencyProfile;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["duka.toml", ".duka.toml", "duka.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Mock backend behaviour.
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content, is_json(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Cart persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding slot files, relative to the working directory.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Slot the cart lives in.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_storage_dir() -> String {
    ".duka".to_string()
}

fn default_cart_key() -> String {
    duka_commerce::cart::CART_SLOT.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Mock backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Simulated latency per call.
    #[serde(default)]
    pub latency: LatencyProfile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration. `DUKA_LOG` overrides `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default duka.toml config file.
pub fn generate_default_config() -> String {
    let latency = LatencyProfile::default();
    format!(
        r#"# duka storefront configuration

[storage]
dir = ".duka"
cart_key = "{cart_key}"

# Simulated backend latency, in milliseconds
[backend.latency]
product_list_ms = {product_list}
product_detail_ms = {product_detail}
recommendation_ms = {recommendation}
order_list_ms = {order_list}
order_detail_ms = {order_detail}
order_submit_ms = {order_submit}
address_list_ms = {address_list}
address_create_ms = {address_create}

[logging]
# Overridden by DUKA_LOG
level = "info"
# "pretty" or "json"
format = "pretty"
"#,
        cart_key = default_cart_key(),
        product_list = latency.product_list_ms,
        product_detail = latency.product_detail_ms,
        recommendation = latency.recommendation_ms,
        order_list = latency.order_list_ms,
        order_detail = latency.order_detail_ms,
        order_submit = latency.order_submit_ms,
        address_list = latency.address_list_ms,
        address_create = latency.address_create_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = CliConfig::parse(&generate_default_config(), false).unwrap();
        assert_eq!(config.storage.dir, ".duka");
        assert_eq!(config.storage.cart_key, "cart");
        assert_eq!(config.backend.latency, LatencyProfile::default());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_config() {
        let config = CliConfig::parse(
            r#"
[backend.latency]
order_submit_ms = 0

[logging]
format = "json"
"#,
            false,
        )
        .unwrap();
        assert_eq!(config.backend.latency.order_submit_ms, 0);
        assert_eq!(config.backend.latency.product_list_ms, 500);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.storage.cart_key, "cart");
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duka.json");
        std::fs::write(&path, r#"{"storage": {"dir": "state"}}"#).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.storage.dir, "state");
        assert_eq!(loaded.storage.cart_key, "cart");
    }

    #[test]
    fn test_load_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duka.toml");
        std::fs::write(&path, "[storage\n").unwrap();

        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
