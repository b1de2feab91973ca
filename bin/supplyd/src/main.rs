//! `supplyd` — the Supply marketplace server binary.
//!
//! Usage:
//!   supplyd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/supply/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use supply_core::Module;
use tracing::info;

use cart::allocation::SlotRequirements;
use config::ServerConfig;

/// Supply marketplace server.
#[derive(Parser, Debug)]
#[command(name = "supplyd", about = "Supply marketplace server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = supply_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        delivery_config_path: server_config
            .storage
            .delivery_config
            .as_ref()
            .map(std::path::PathBuf::from),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    // Embedded KV store (shared by all modules).
    let kv: Arc<dyn supply_kv::KVStore> = Arc::new(
        supply_kv::RedbStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );

    // Market delivery configuration.
    let delivery_config =
        bootstrap::load_delivery_config(&core_config.resolve_delivery_config_path())?;

    let requirements = SlotRequirements {
        require_time: server_config.flow.require_time,
        require_vehicle_type: server_config.flow.require_vehicle_type,
    };

    let cart_service = cart::service::CartService::new(
        Arc::clone(&kv),
        delivery_config,
        requirements,
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize cart service: {}", e))?;
    let cart_module = cart::CartModule::new(cart_service);
    info!("Cart module initialized");

    let module_routes = vec![(cart_module.name(), cart_module.routes())];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Supply server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
