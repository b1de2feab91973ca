pub mod cart;
pub mod checkout;

use std::sync::Arc;

use supply_core::ServiceError;
use supply_kv::KVStore;

use crate::allocation::SlotRequirements;
use crate::config::DeliveryConfig;
use crate::store::CartStore;

pub use cart::AddItemInput;

/// Cart service — owns the persistence boundary and the delivery
/// configuration, and provides the ordering business logic.
///
/// Every operation runs to completion within one call and rewrites whole
/// ledgers; callers never mutate slots behind its back.
pub struct CartService {
    pub(crate) store: CartStore,
    pub(crate) config: DeliveryConfig,
    pub(crate) requirements: SlotRequirements,
}

impl CartService {
    pub fn new(
        kv: Arc<dyn KVStore>,
        config: DeliveryConfig,
        requirements: SlotRequirements,
    ) -> Result<Self, ServiceError> {
        config
            .validate()
            .map_err(|e| ServiceError::Validation(format!("delivery config: {e}")))?;
        let store = CartStore::new(kv, config.clone());
        Ok(Self {
            store,
            config,
            requirements,
        })
    }
}
