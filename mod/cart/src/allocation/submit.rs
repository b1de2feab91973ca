//! Mapper from a validated cart to the order-creation wire payload.

use crate::model::{CartItem, OrderForm, OrderSubmission, SubmissionItem, SubmissionSlot};

/// Translate the cart plus the order-level form into the payload the
/// external order-creation API consumes.
///
/// Performs no re-validation — validation and mapping are separate
/// concerns, and the checkout path validates before calling this. Undated
/// slots (impossible after validation) are skipped rather than invented.
pub fn build_submission(items: &[CartItem], form: OrderForm) -> OrderSubmission {
    let items = items
        .iter()
        .map(|item| SubmissionItem {
            product_id: item.product_id.clone(),
            quantity: item.total_quantity,
            custom_note: item.note.clone(),
            slots: item
                .slots
                .iter()
                .filter_map(|slot| {
                    slot.delivery_date.map(|date| SubmissionSlot {
                        quantity: slot.quantity,
                        date,
                        time: slot.delivery_time,
                        vehicle_type: slot.vehicle_type.clone(),
                    })
                })
                .collect(),
        })
        .collect();

    OrderSubmission { form, items }
}
