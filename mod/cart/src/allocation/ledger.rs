//! Ledger arithmetic: the one place where "does this line item balance?"
//! is computed, and the only code that rewrites slot quantities in bulk.

use serde::Serialize;

use supply_core::new_id;

use crate::config::DeliveryConfig;
use crate::model::{CartItem, DeliverySlot, SlotPatch};

/// Absolute tolerance for the sum invariant. Proportional rescaling rounds
/// to 2 decimals, so repeated edits accumulate float drift; balance checks
/// never use exact equality.
pub const BALANCE_EPSILON: f64 = 0.01;

/// Round a quantity to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Snapshot of how an item's slot quantities relate to its declared total.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStatus {
    /// Sum of all slot quantities.
    pub allocated: f64,
    /// `total_quantity - allocated`; positive means under-allocated.
    pub remaining: f64,
    /// `allocated / total_quantity * 100`, 0 when the total is 0.
    pub percentage: f64,
    /// `|remaining| < 0.01`.
    pub is_balanced: bool,
}

/// Build a slot with the configured defaults. The date starts unset: picking
/// a date is the one choice the flow always forces on the user.
pub(crate) fn default_slot(quantity: f64, config: &DeliveryConfig) -> DeliverySlot {
    DeliverySlot {
        id: new_id(),
        quantity: round2(quantity),
        delivery_date: None,
        delivery_time: Some(config.default_time),
        vehicle_type: config.default_vehicle.clone(),
    }
}

impl CartItem {
    /// Sum of all slot quantities.
    pub fn allocated(&self) -> f64 {
        self.slots.iter().map(|s| s.quantity).sum()
    }

    pub fn allocation_status(&self) -> AllocationStatus {
        let allocated = self.allocated();
        let remaining = self.total_quantity - allocated;
        let percentage = if self.total_quantity > 0.0 {
            allocated / self.total_quantity * 100.0
        } else {
            0.0
        };
        AllocationStatus {
            allocated,
            remaining,
            percentage,
            is_balanced: remaining.abs() < BALANCE_EPSILON,
        }
    }

    /// Change the item's total and rescale every slot proportionally, so a
    /// split the user already entered (say 60/40 over two delivery days)
    /// survives the quantity edit instead of collapsing back to one slot.
    ///
    /// A zero previous total has no proportions to preserve: the new total
    /// is spread evenly across the existing slots, with the final slot
    /// absorbing the rounding remainder so the ledger balances.
    pub fn set_total_quantity(&mut self, new_total: f64) {
        let old_total = self.total_quantity;

        if old_total == 0.0 {
            let n = self.slots.len();
            if n > 0 {
                let share = round2(new_total / n as f64);
                let mut assigned = 0.0;
                for slot in &mut self.slots[..n - 1] {
                    slot.quantity = share;
                    assigned += share;
                }
                self.slots[n - 1].quantity = round2(new_total - assigned);
            }
            self.total_quantity = new_total;
            return;
        }

        let ratio = new_total / old_total;
        for slot in &mut self.slots {
            slot.quantity = round2(slot.quantity * ratio);
        }
        self.total_quantity = new_total;
    }

    /// Append a new slot holding whatever quantity is still unallocated
    /// (capped at 1 unit), or 1 unit when nothing remains — the user always
    /// gets a non-zero row to edit, even though the fallback produces a
    /// visible over-allocation they must then resolve.
    pub fn add_slot(&mut self, config: &DeliveryConfig) -> DeliverySlot {
        let remaining = self.total_quantity - self.allocated();
        let quantity = if remaining > 0.0 { remaining.min(1.0) } else { 1.0 };
        let slot = default_slot(quantity, config);
        self.slots.push(slot.clone());
        slot
    }

    /// Remove a slot by id. The last remaining slot is non-deletable: a
    /// line item always has at least one slot. Returns whether a slot was
    /// actually removed.
    pub fn remove_slot(&mut self, slot_id: &str) -> bool {
        if self.slots.len() <= 1 {
            return false;
        }
        let before = self.slots.len();
        self.slots.retain(|s| s.id != slot_id);
        self.slots.len() < before
    }

    /// Replace only the supplied fields on the slot matching `slot_id`.
    /// Unlike a total-quantity change, editing one slot never rebalances
    /// its siblings. Returns false when no slot has that id.
    pub fn patch_slot(&mut self, slot_id: &str, patch: &SlotPatch) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == slot_id) else {
            return false;
        };
        if let Some(quantity) = patch.quantity {
            slot.quantity = quantity;
        }
        if let Some(date) = patch.delivery_date {
            slot.delivery_date = Some(date);
        }
        if let Some(time) = patch.delivery_time {
            slot.delivery_time = Some(time);
        }
        if let Some(vehicle) = &patch.vehicle_type {
            slot.vehicle_type = Some(vehicle.clone());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    fn item_with_slots(total: f64, quantities: &[f64]) -> CartItem {
        let config = default_config();
        CartItem {
            product_id: "cement-m500".into(),
            product_name: "Cement M500".into(),
            product_image_url: None,
            product_type: None,
            unit: "t".into(),
            total_quantity: total,
            slots: quantities
                .iter()
                .map(|&q| default_slot(q, &config))
                .collect(),
            note: None,
            added_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn round2_rounds_to_two_places() {
        assert_eq!(round2(2.444), 2.44);
        assert_eq!(round2(2.446), 2.45);
        assert_eq!(round2(6.666666666666667), 6.67);
        assert_eq!(round2(5.0), 5.0);
    }

    #[test]
    fn rescale_preserves_single_slot() {
        // Scenario: total=5, one slot of 5, then the total becomes 10.
        let mut item = item_with_slots(5.0, &[5.0]);
        item.set_total_quantity(10.0);

        assert_eq!(item.total_quantity, 10.0);
        assert_eq!(item.slots[0].quantity, 10.0);
        assert!(item.allocation_status().is_balanced);
    }

    #[test]
    fn rescale_preserves_proportions() {
        // Scenario: total=10 split 6/4, halved to 5 → 3/2.
        let mut item = item_with_slots(10.0, &[6.0, 4.0]);
        item.set_total_quantity(5.0);

        assert_eq!(item.slots[0].quantity, 3.0);
        assert_eq!(item.slots[1].quantity, 2.0);
        assert!(item.allocation_status().is_balanced);
    }

    #[test]
    fn rescale_sum_stays_within_epsilon() {
        let mut item = item_with_slots(9.0, &[3.0, 3.0, 3.0]);
        item.set_total_quantity(10.0);

        let allocated = item.allocated();
        assert!((allocated - 10.0).abs() <= BALANCE_EPSILON + 1e-9);
        for slot in &item.slots {
            assert!((slot.quantity - 3.33).abs() < 1e-9);
        }
    }

    #[test]
    fn rescale_from_zero_total_spreads_evenly() {
        // Scenario: total=0 must not divide by zero; the new total is
        // distributed across the existing slots deterministically.
        let mut item = item_with_slots(0.0, &[0.0]);
        item.set_total_quantity(5.0);

        assert_eq!(item.slots.len(), 1);
        assert_eq!(item.slots[0].quantity, 5.0);
        assert!(item.allocation_status().is_balanced);
    }

    #[test]
    fn rescale_from_zero_total_balances_across_slots() {
        let mut item = item_with_slots(0.0, &[0.0, 0.0, 0.0]);
        item.set_total_quantity(10.0);

        assert_eq!(item.slots[0].quantity, 3.33);
        assert_eq!(item.slots[1].quantity, 3.33);
        assert_eq!(item.slots[2].quantity, 3.34);
        assert!(item.allocation_status().is_balanced);
    }

    #[test]
    fn rescale_to_zero_zeroes_slots() {
        let mut item = item_with_slots(8.0, &[5.0, 3.0]);
        item.set_total_quantity(0.0);

        assert_eq!(item.slots[0].quantity, 0.0);
        assert_eq!(item.slots[1].quantity, 0.0);
        assert!(item.allocation_status().is_balanced);
    }

    #[test]
    fn status_balance_epsilon_boundaries() {
        // 0.009 off is balanced, 0.011 off is not.
        let item = item_with_slots(10.0, &[9.991]);
        assert!(item.allocation_status().is_balanced);

        let item = item_with_slots(10.0, &[9.989]);
        assert!(!item.allocation_status().is_balanced);
    }

    #[test]
    fn status_percentage_guards_zero_total() {
        let item = item_with_slots(0.0, &[0.0]);
        let status = item.allocation_status();
        assert_eq!(status.percentage, 0.0);
        assert!(status.is_balanced);
    }

    #[test]
    fn status_reports_over_allocation() {
        // Scenario: total=5, slots=[5], add a slot → [5, 1], over by 1.
        let mut item = item_with_slots(5.0, &[5.0]);
        item.add_slot(&default_config());

        let status = item.allocation_status();
        assert_eq!(status.allocated, 6.0);
        assert_eq!(status.remaining, -1.0);
        assert!(!status.is_balanced);
    }

    #[test]
    fn add_slot_takes_remaining_up_to_one() {
        let mut item = item_with_slots(10.0, &[9.5]);
        let slot = item.add_slot(&default_config());
        assert_eq!(slot.quantity, 0.5);

        let mut item = item_with_slots(10.0, &[7.0]);
        let slot = item.add_slot(&default_config());
        assert_eq!(slot.quantity, 1.0);
    }

    #[test]
    fn add_slot_on_balanced_ledger_over_allocates_by_one() {
        // total=10 with one slot of 10: the new slot still gets 1 to edit,
        // leaving the ledger visibly over-allocated. Expected, not a bug.
        let mut item = item_with_slots(10.0, &[10.0]);
        let slot = item.add_slot(&default_config());

        assert_eq!(slot.quantity, 1.0);
        assert_eq!(item.allocated(), 11.0);
        assert!(!item.allocation_status().is_balanced);
    }

    #[test]
    fn add_slot_inherits_configured_defaults() {
        let config = default_config();
        let mut item = item_with_slots(10.0, &[10.0]);
        let slot = item.add_slot(&config);

        assert_eq!(slot.delivery_time, Some(config.default_time));
        assert_eq!(slot.vehicle_type, config.default_vehicle);
        assert!(slot.delivery_date.is_none());
    }

    #[test]
    fn slot_ids_are_unique() {
        let mut item = item_with_slots(10.0, &[10.0]);
        let a = item.add_slot(&default_config());
        let b = item.add_slot(&default_config());
        assert_ne!(a.id, b.id);
        assert_ne!(item.slots[0].id, a.id);
    }

    #[test]
    fn remove_slot_by_id() {
        let mut item = item_with_slots(10.0, &[6.0, 4.0]);
        let id = item.slots[1].id.clone();

        assert!(item.remove_slot(&id));
        assert_eq!(item.slots.len(), 1);
        assert_eq!(item.slots[0].quantity, 6.0);
    }

    #[test]
    fn last_slot_is_not_deletable() {
        let mut item = item_with_slots(10.0, &[10.0]);
        let id = item.slots[0].id.clone();

        assert!(!item.remove_slot(&id));
        assert_eq!(item.slots.len(), 1);
    }

    #[test]
    fn remove_unknown_id_is_false() {
        let mut item = item_with_slots(10.0, &[6.0, 4.0]);
        assert!(!item.remove_slot("nope"));
        assert_eq!(item.slots.len(), 2);
    }

    #[test]
    fn patch_replaces_only_named_fields() {
        let mut item = item_with_slots(10.0, &[6.0, 4.0]);
        let id = item.slots[0].id.clone();

        let patch = SlotPatch {
            quantity: Some(7.0),
            ..Default::default()
        };
        assert!(item.patch_slot(&id, &patch));

        // The edited slot changed; its sibling did not rebalance.
        assert_eq!(item.slots[0].quantity, 7.0);
        assert_eq!(item.slots[1].quantity, 4.0);
        assert_eq!(item.allocation_status().remaining, -1.0);
    }

    #[test]
    fn patch_unknown_slot_is_false() {
        let mut item = item_with_slots(10.0, &[10.0]);
        assert!(!item.patch_slot("nope", &SlotPatch::default()));
    }
}
