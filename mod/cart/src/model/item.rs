use serde::{Deserialize, Serialize};

use super::slot::DeliverySlot;

/// One line item in a cart: a product snapshot plus its delivery allocation
/// ledger (total quantity + slots).
///
/// Product display fields are copied at add-time, not re-fetched live, so a
/// cart renders the product the customer actually added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique, permanent product identifier; also the persistence key
    /// suffix (one record per distinct product in a cart).
    pub product_id: String,

    pub product_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    /// Unit label shown next to quantities (e.g. "t", "m3", "pcs").
    pub unit: String,

    /// Ordered quantity for the whole line item; owned here, never by any
    /// single slot.
    pub total_quantity: f64,

    /// Delivery slots in insertion order. Display order follows this
    /// sequence, not a derived sort; a live ledger keeps at least one slot.
    /// Legacy records persisted before slot scheduling existed have none —
    /// the store synthesizes one on load.
    #[serde(default)]
    pub slots: Vec<DeliverySlot>,

    /// Free-text customization (e.g. a custom concrete mix), independent of
    /// the allocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
