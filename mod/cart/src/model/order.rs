use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::slot::hhmm_opt;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Processing,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Processing
    }
}

/// Order-level form data captured at checkout, independent of the
/// per-item allocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    /// Construction project the delivery belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Saved delivery address reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Wire payload for the external order-creation API. Consumed verbatim —
/// the mapper builds it, nothing downstream reshapes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    #[serde(flatten)]
    pub form: OrderForm,
    pub items: Vec<SubmissionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionItem {
    pub product_id: String,

    /// The line item's total quantity — the slot quantities below are its
    /// split, not an addition to it.
    pub quantity: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_note: Option<String>,

    pub slots: Vec<SubmissionSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSlot {
    pub quantity: f64,
    pub date: NaiveDate,

    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
}

/// A submitted order as persisted: the payload that went out plus status
/// bookkeeping. Pricing, payment, and supplier assignment live in other
/// systems.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: String,

    pub customer: String,

    #[serde(default)]
    pub status: OrderStatus,

    pub submission: OrderSubmission,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}
