//! Persistent storage for carts and orders, backed by the KVStore boundary.
//!
//! Keys: `cart:{customer}:{product_id}` (one record per distinct product in
//! a cart) and `order:{customer}:{order_id}`. Records are whole JSON
//! documents — every write replaces the full ledger, so `total_quantity`
//! and `slots` can never land in storage half-updated.

use std::sync::Arc;

use tracing::{debug, warn};

use supply_core::ServiceError;
use supply_kv::KVStore;

use crate::allocation::ledger::default_slot;
use crate::config::DeliveryConfig;
use crate::model::{CartItem, Order};

pub struct CartStore {
    kv: Arc<dyn KVStore>,
    config: DeliveryConfig,
}

impl CartStore {
    pub fn new(kv: Arc<dyn KVStore>, config: DeliveryConfig) -> Self {
        Self { kv, config }
    }

    fn cart_key(customer: &str, product_id: &str) -> String {
        format!("cart:{customer}:{product_id}")
    }

    fn cart_prefix(customer: &str) -> String {
        format!("cart:{customer}:")
    }

    fn order_key(customer: &str, order_id: &str) -> String {
        format!("order:{customer}:{order_id}")
    }

    fn order_prefix(customer: &str) -> String {
        format!("order:{customer}:")
    }

    // ── Cart items ──

    /// Load a customer's full cart, oldest item first.
    ///
    /// Records written before slot scheduling existed carry no slots; they
    /// are upgraded in memory with a single default slot covering the full
    /// quantity. The upgraded form is persisted on the next write.
    pub fn load_cart(&self, customer: &str) -> Result<Vec<CartItem>, ServiceError> {
        let entries = self
            .kv
            .scan(&Self::cart_prefix(customer))
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut items = Vec::with_capacity(entries.len());
        let mut upgraded = 0;
        for (key, value) in &entries {
            let mut item: CartItem = serde_json::from_slice(value)
                .map_err(|e| ServiceError::Internal(format!("bad cart record {key}: {e}")))?;
            if self.upgrade_legacy(&mut item) {
                upgraded += 1;
            }
            items.push(item);
        }

        if upgraded > 0 {
            warn!("upgraded {} legacy cart records for {}", upgraded, customer);
        }
        debug!("loaded {} cart items for {}", items.len(), customer);

        // Scan order is key order; display order is add order.
        items.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(items)
    }

    /// Load a single cart item, `None` when the product is not in the cart.
    pub fn load_item(
        &self,
        customer: &str,
        product_id: &str,
    ) -> Result<Option<CartItem>, ServiceError> {
        let key = Self::cart_key(customer, product_id);
        let Some(value) = self
            .kv
            .get(&key)
            .map_err(|e| ServiceError::Storage(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut item: CartItem = serde_json::from_slice(&value)
            .map_err(|e| ServiceError::Internal(format!("bad cart record {key}: {e}")))?;
        if self.upgrade_legacy(&mut item) {
            warn!("upgraded legacy cart record {}", key);
        }
        Ok(Some(item))
    }

    /// Write one item as a whole record.
    pub fn save_item(&self, customer: &str, item: &CartItem) -> Result<(), ServiceError> {
        let data =
            serde_json::to_vec(item).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.kv
            .set(&Self::cart_key(customer, &item.product_id), &data)
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    pub fn delete_item(&self, customer: &str, product_id: &str) -> Result<(), ServiceError> {
        self.kv
            .delete(&Self::cart_key(customer, product_id))
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Delete every item in the customer's cart in one batch.
    pub fn clear_cart(&self, customer: &str) -> Result<(), ServiceError> {
        let entries = self
            .kv
            .scan(&Self::cart_prefix(customer))
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        if keys.is_empty() {
            return Ok(());
        }
        self.kv
            .batch_delete(&keys)
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Forward-compatibility: synthesize the allocation ledger for records
    /// persisted before slot scheduling. Returns whether the record changed.
    fn upgrade_legacy(&self, item: &mut CartItem) -> bool {
        if !item.slots.is_empty() {
            return false;
        }
        item.slots
            .push(default_slot(item.total_quantity, &self.config));
        true
    }

    // ── Orders ──

    pub fn save_order(&self, order: &Order) -> Result<(), ServiceError> {
        let data =
            serde_json::to_vec(order).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.kv
            .set(&Self::order_key(&order.customer, &order.id), &data)
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    pub fn load_order(&self, customer: &str, order_id: &str) -> Result<Order, ServiceError> {
        let key = Self::order_key(customer, order_id);
        let value = self
            .kv
            .get(&key)
            .map_err(|e| ServiceError::Storage(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("order {customer}/{order_id}")))?;
        serde_json::from_slice(&value)
            .map_err(|e| ServiceError::Internal(format!("bad order record {key}: {e}")))
    }

    /// All of a customer's orders, newest first.
    pub fn load_orders(&self, customer: &str) -> Result<Vec<Order>, ServiceError> {
        let entries = self
            .kv
            .scan(&Self::order_prefix(customer))
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut orders = Vec::with_capacity(entries.len());
        for (key, value) in &entries {
            let order: Order = serde_json::from_slice(value)
                .map_err(|e| ServiceError::Internal(format!("bad order record {key}: {e}")))?;
            orders.push(order);
        }

        orders.sort_by(|a, b| b.create_at.cmp(&a.create_at));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supply_kv::MemoryStore;

    use crate::config::default_config;
    use crate::model::{OrderForm, OrderStatus, OrderSubmission};

    fn test_store() -> CartStore {
        CartStore::new(Arc::new(MemoryStore::new()), default_config())
    }

    fn make_item(product_id: &str, total: f64, added_at: &str) -> CartItem {
        let config = default_config();
        CartItem {
            product_id: product_id.into(),
            product_name: product_id.into(),
            product_image_url: None,
            product_type: None,
            unit: "t".into(),
            total_quantity: total,
            slots: vec![default_slot(total, &config)],
            note: None,
            added_at: Some(added_at.into()),
            updated_at: None,
        }
    }

    fn make_order(id: &str, customer: &str, create_at: &str) -> Order {
        Order {
            id: id.into(),
            customer: customer.into(),
            status: OrderStatus::Processing,
            submission: OrderSubmission {
                form: OrderForm::default(),
                items: Vec::new(),
            },
            create_at: Some(create_at.into()),
            update_at: None,
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let store = test_store();
        let item = make_item("cement", 10.0, "2025-03-01T10:00:00+00:00");
        store.save_item("c1", &item).unwrap();

        let loaded = store.load_item("c1", "cement").unwrap().unwrap();
        assert_eq!(loaded, item);
        assert!(store.load_item("c1", "sand").unwrap().is_none());
    }

    #[test]
    fn load_cart_orders_by_add_time() {
        let store = test_store();
        // Key order (cement < sand) differs from add order.
        store
            .save_item("c1", &make_item("sand", 3.0, "2025-03-01T09:00:00+00:00"))
            .unwrap();
        store
            .save_item("c1", &make_item("cement", 10.0, "2025-03-01T11:00:00+00:00"))
            .unwrap();

        let cart = store.load_cart("c1").unwrap();
        let ids: Vec<&str> = cart.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["sand", "cement"]);
    }

    #[test]
    fn carts_are_isolated_per_customer() {
        let store = test_store();
        store
            .save_item("c1", &make_item("cement", 10.0, "t1"))
            .unwrap();
        store
            .save_item("c2", &make_item("sand", 5.0, "t2"))
            .unwrap();

        assert_eq!(store.load_cart("c1").unwrap().len(), 1);
        assert_eq!(store.load_cart("c2").unwrap().len(), 1);
    }

    #[test]
    fn legacy_record_gets_a_full_quantity_slot() {
        let store = test_store();
        let mut legacy = make_item("cement", 7.5, "t1");
        legacy.slots.clear();
        store.save_item("c1", &legacy).unwrap();

        let loaded = store.load_item("c1", "cement").unwrap().unwrap();
        assert_eq!(loaded.slots.len(), 1);
        assert_eq!(loaded.slots[0].quantity, 7.5);
        assert!(loaded.slots[0].delivery_date.is_none());
        assert!(loaded.allocation_status().is_balanced);
    }

    #[test]
    fn clear_cart_removes_everything() {
        let store = test_store();
        store
            .save_item("c1", &make_item("cement", 10.0, "t1"))
            .unwrap();
        store.save_item("c1", &make_item("sand", 3.0, "t2")).unwrap();

        store.clear_cart("c1").unwrap();
        assert!(store.load_cart("c1").unwrap().is_empty());

        // Clearing an already-empty cart is fine.
        store.clear_cart("c1").unwrap();
    }

    #[test]
    fn delete_item_removes_one_record() {
        let store = test_store();
        store
            .save_item("c1", &make_item("cement", 10.0, "t1"))
            .unwrap();
        store.save_item("c1", &make_item("sand", 3.0, "t2")).unwrap();

        store.delete_item("c1", "cement").unwrap();
        let cart = store.load_cart("c1").unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].product_id, "sand");
    }

    #[test]
    fn orders_load_newest_first() {
        let store = test_store();
        store
            .save_order(&make_order("o1", "c1", "2025-03-01T10:00:00+00:00"))
            .unwrap();
        store
            .save_order(&make_order("o2", "c1", "2025-03-02T10:00:00+00:00"))
            .unwrap();

        let orders = store.load_orders("c1").unwrap();
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o2", "o1"]);

        assert_eq!(store.load_order("c1", "o1").unwrap().id, "o1");
        assert!(store.load_order("c1", "missing").is_err());
    }
}
