use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One scheduled delivery event carrying a portion of a line item's total
/// quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySlot {
    /// Stable identity, assigned once at creation and never reused. Slots
    /// are edited and removed by id, not by position.
    pub id: String,

    /// Portion of the item's total quantity, in the item's unit.
    pub quantity: f64,

    /// Delivery date (ISO `YYYY-MM-DD` on the wire). Empty until the user
    /// picks one — the "incomplete" state the validator reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,

    /// Delivery time of day (`HH:MM` on the wire). Optional in flows
    /// without time selection.
    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<NaiveTime>,

    /// Vehicle code from the configured catalog. Optional in flows without
    /// truck selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
}

/// Field-wise edit of a single slot. Only the supplied fields are replaced;
/// sibling slots are never rebalanced by a slot edit — the user owns the
/// remainder.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotPatch {
    pub quantity: Option<f64>,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt")]
    pub delivery_time: Option<NaiveTime>,
    pub vehicle_type: Option<String>,
}

/// Serde adapter for `Option<NaiveTime>` as a zero-padded 24-hour `HH:MM`
/// string — the schedule view sorts these keys lexicographically, which is
/// also chronological.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => NaiveTime::parse_from_str(&s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Serde adapter for a required `NaiveTime` in the same `HH:MM` format.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(super::hhmm_opt::FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, super::hhmm_opt::FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> DeliverySlot {
        DeliverySlot {
            id: "s1".into(),
            quantity: 2.5,
            delivery_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            delivery_time: NaiveTime::from_hms_opt(8, 0, 0),
            vehicle_type: Some("truck10".into()),
        }
    }

    #[test]
    fn slot_json_roundtrip() {
        let s = slot();
        let json = serde_json::to_string(&s).unwrap();
        let back: DeliverySlot = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn time_is_hh_mm_on_the_wire() {
        let json = serde_json::to_value(slot()).unwrap();
        assert_eq!(json["deliveryTime"], "08:00");
        assert_eq!(json["deliveryDate"], "2025-03-01");
    }

    #[test]
    fn empty_fields_are_elided() {
        let s = DeliverySlot {
            id: "s2".into(),
            quantity: 1.0,
            delivery_date: None,
            delivery_time: None,
            vehicle_type: None,
        };
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("deliveryDate").is_none());
        assert!(json.get("deliveryTime").is_none());
        assert!(json.get("vehicleType").is_none());

        let back: DeliverySlot = serde_json::from_value(json).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn bad_time_is_rejected() {
        let err = serde_json::from_str::<DeliverySlot>(
            r#"{"id":"s3","quantity":1.0,"deliveryTime":"8am"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn patch_deserializes_partial_bodies() {
        let patch: SlotPatch = serde_json::from_str(r#"{"quantity":3.0}"#).unwrap();
        assert_eq!(patch.quantity, Some(3.0));
        assert!(patch.delivery_date.is_none());
        assert!(patch.delivery_time.is_none());
        assert!(patch.vehicle_type.is_none());
    }
}
