//! Server configuration, loaded from a TOML file.
//!
//! The context name resolves to `/etc/supply/<name>.toml`; a value
//! containing `/` or `.` is treated as a path and used directly.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    #[serde(default)]
    pub flow: FlowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the redb database and the delivery config file.
    pub data_dir: String,

    /// Delivery configuration file (YAML). Defaults to
    /// `{data_dir}/delivery.yaml`; the built-in defaults apply when the
    /// file does not exist.
    #[serde(default)]
    pub delivery_config: Option<String>,
}

/// Which slot fields this deployment's checkout flow requires. Date is
/// always required; these two toggles replace per-flow duplicated screens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub require_time: bool,

    #[serde(default)]
    pub require_vehicle_type: bool,
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/supply/{name_or_path}.toml"))
        }
    }

    /// Load and parse the TOML config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("cannot parse config {}: {}", path.display(), e))?;
        Ok(config)
    }
}
