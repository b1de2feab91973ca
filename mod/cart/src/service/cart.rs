use supply_core::{ServiceError, now_rfc3339};

use crate::allocation::ledger::default_slot;
use crate::model::{CartItem, DeliverySlot, SlotPatch};

use super::CartService;

pub struct AddItemInput {
    pub product_id: String,
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub product_type: Option<String>,
    pub unit: String,
    pub quantity: f64,
    pub note: Option<String>,
}

impl CartService {
    // ── Items ──

    pub fn get_cart(&self, customer: &str) -> Result<Vec<CartItem>, ServiceError> {
        self.store.load_cart(customer)
    }

    pub fn get_item(&self, customer: &str, product_id: &str) -> Result<CartItem, ServiceError> {
        self.store
            .load_item(customer, product_id)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("cart item {customer}/{product_id}"))
            })
    }

    /// Add a product to the cart with a single full-quantity default slot.
    /// Adding a product that is already in the cart updates its quantity
    /// (proportional rescale) and note instead of duplicating the line.
    pub fn add_item(&self, customer: &str, input: AddItemInput) -> Result<CartItem, ServiceError> {
        if input.quantity <= 0.0 {
            return Err(ServiceError::Validation(format!(
                "quantity must be positive, got {}",
                input.quantity
            )));
        }

        let now = now_rfc3339();
        let item = match self.store.load_item(customer, &input.product_id)? {
            Some(mut existing) => {
                existing.set_total_quantity(input.quantity);
                if input.note.is_some() {
                    existing.note = input.note;
                }
                existing.updated_at = Some(now);
                existing
            }
            None => CartItem {
                product_id: input.product_id,
                product_name: input.product_name,
                product_image_url: input.product_image_url,
                product_type: input.product_type,
                unit: input.unit,
                total_quantity: input.quantity,
                slots: vec![default_slot(input.quantity, &self.config)],
                note: input.note,
                added_at: Some(now.clone()),
                updated_at: Some(now),
            },
        };

        self.store.save_item(customer, &item)?;
        Ok(item)
    }

    /// Change an item's total quantity, rescaling its slots proportionally.
    /// A quantity of 0 removes the item and returns `None`.
    pub fn set_quantity(
        &self,
        customer: &str,
        product_id: &str,
        quantity: f64,
    ) -> Result<Option<CartItem>, ServiceError> {
        if quantity < 0.0 {
            return Err(ServiceError::Validation(format!(
                "quantity must not be negative, got {quantity}"
            )));
        }

        let mut item = self.get_item(customer, product_id)?;

        if quantity == 0.0 {
            self.store.delete_item(customer, product_id)?;
            return Ok(None);
        }

        item.set_total_quantity(quantity);
        item.updated_at = Some(now_rfc3339());
        self.store.save_item(customer, &item)?;
        Ok(Some(item))
    }

    pub fn update_note(
        &self,
        customer: &str,
        product_id: &str,
        note: Option<String>,
    ) -> Result<CartItem, ServiceError> {
        let mut item = self.get_item(customer, product_id)?;
        item.note = note;
        item.updated_at = Some(now_rfc3339());
        self.store.save_item(customer, &item)?;
        Ok(item)
    }

    pub fn remove_item(&self, customer: &str, product_id: &str) -> Result<(), ServiceError> {
        // Surface a NotFound for a product that was never in the cart.
        self.get_item(customer, product_id)?;
        self.store.delete_item(customer, product_id)
    }

    pub fn clear_cart(&self, customer: &str) -> Result<(), ServiceError> {
        self.store.clear_cart(customer)
    }

    // ── Slots ──

    /// Add a delivery slot to an item. The slot takes the unallocated
    /// remainder (capped at 1 unit) and the configured defaults.
    pub fn add_slot(
        &self,
        customer: &str,
        product_id: &str,
    ) -> Result<DeliverySlot, ServiceError> {
        let mut item = self.get_item(customer, product_id)?;
        let slot = item.add_slot(&self.config);
        item.updated_at = Some(now_rfc3339());
        self.store.save_item(customer, &item)?;
        Ok(slot)
    }

    /// Edit one slot's fields. Sibling slots are never rebalanced.
    pub fn patch_slot(
        &self,
        customer: &str,
        product_id: &str,
        slot_id: &str,
        patch: &SlotPatch,
    ) -> Result<CartItem, ServiceError> {
        if let Some(quantity) = patch.quantity {
            if quantity <= 0.0 {
                return Err(ServiceError::Validation(format!(
                    "slot quantity must be positive, got {quantity}"
                )));
            }
        }
        if let Some(vehicle) = &patch.vehicle_type {
            if !self.config.has_vehicle(vehicle) {
                return Err(ServiceError::Validation(format!(
                    "unknown vehicle type '{vehicle}'"
                )));
            }
        }

        let mut item = self.get_item(customer, product_id)?;
        if !item.patch_slot(slot_id, patch) {
            return Err(ServiceError::NotFound(format!(
                "slot {slot_id} on cart item {customer}/{product_id}"
            )));
        }
        item.updated_at = Some(now_rfc3339());
        self.store.save_item(customer, &item)?;
        Ok(item)
    }

    /// Remove a slot by id. Removing the last slot is a no-op: the item is
    /// returned unchanged, because a line item always keeps at least one
    /// slot.
    pub fn remove_slot(
        &self,
        customer: &str,
        product_id: &str,
        slot_id: &str,
    ) -> Result<CartItem, ServiceError> {
        let mut item = self.get_item(customer, product_id)?;

        if item.slots.len() <= 1 {
            return Ok(item);
        }

        if !item.remove_slot(slot_id) {
            return Err(ServiceError::NotFound(format!(
                "slot {slot_id} on cart item {customer}/{product_id}"
            )));
        }
        item.updated_at = Some(now_rfc3339());
        self.store.save_item(customer, &item)?;
        Ok(item)
    }
}
