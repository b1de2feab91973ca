use std::path::PathBuf;

/// Common configuration shared by all service binaries.
///
/// Each binary resolves these from its own config file or command-line
/// arguments, then passes them to storage layer initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding all persistent data for the service.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/data.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Path to the delivery configuration file (YAML).
    /// Defaults to `{data_dir}/delivery.yaml` if not specified.
    pub delivery_config_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            delivery_config_path: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/data.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("data.redb"))
    }

    /// Resolve the delivery config path, falling back to `{data_dir}/delivery.yaml`.
    pub fn resolve_delivery_config_path(&self) -> PathBuf {
        self.delivery_config_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("delivery.yaml"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
