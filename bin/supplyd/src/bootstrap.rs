//! Bootstrap — first-start checks and delivery configuration loading.
//!
//! When supplyd starts:
//! 1. Verify the server config points at a usable data directory.
//! 2. Load the market's delivery configuration, falling back to the
//!    built-in defaults when no file is shipped; refuse to start on an
//!    invalid one.

use std::path::Path;

use tracing::info;

use cart::config::{DeliveryConfig, default_config};

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Load the delivery configuration from YAML, or fall back to defaults.
pub fn load_delivery_config(path: &Path) -> anyhow::Result<DeliveryConfig> {
    let config = if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        let config: DeliveryConfig = serde_yml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("cannot parse {}: {}", path.display(), e))?;
        info!("Loaded delivery configuration from {}", path.display());
        config
    } else {
        info!(
            "No delivery configuration at {}, using built-in defaults",
            path.display()
        );
        default_config()
    };

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid delivery configuration: {}", e))?;
    Ok(config)
}
