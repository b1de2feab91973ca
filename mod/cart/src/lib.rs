pub mod allocation;
pub mod api;
pub mod config;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use supply_core::Module;

use service::CartService;

/// Cart module — cart assembly, delivery-slot scheduling, and order
/// submission for the materials marketplace.
pub struct CartModule {
    service: Arc<CartService>,
}

impl CartModule {
    pub fn new(service: CartService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl Module for CartModule {
    fn name(&self) -> &str {
        "cart"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
