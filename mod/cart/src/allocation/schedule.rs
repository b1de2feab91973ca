//! The review-step projection: flatten every item's slots and regroup them
//! into a date → time → deliveries tree. Purely derived — the ledgers stay
//! the system of record and this output is rebuilt on every render.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::config::DeliveryConfig;
use crate::model::slot::hhmm_opt;
use crate::model::CartItem;

/// One product's contribution to a (date, time) delivery window.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// All deliveries sharing one time of day within a date. `time` is empty in
/// flows without time selection; untimed deliveries head the day.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTime {
    #[serde(with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,

    pub entries: Vec<ScheduleEntry>,
}

/// All deliveries on one calendar date.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub date: NaiveDate,

    /// Day heading formatted with the configured market format string.
    pub label: String,

    pub times: Vec<ScheduleTime>,
}

/// Project the cart's ledgers into the schedule shown on the review step.
///
/// Slots are grouped by exact (date, time) key; date groups and time groups
/// come out strictly ascending, and entries inside a window keep cart
/// order. Slots with no date are omitted — validation gates the review step
/// before this runs, so a complete cart never loses a slot here.
pub fn build_schedule(items: &[CartItem], config: &DeliveryConfig) -> Vec<ScheduleDay> {
    let mut days: BTreeMap<NaiveDate, BTreeMap<Option<NaiveTime>, Vec<ScheduleEntry>>> =
        BTreeMap::new();

    for item in items {
        for slot in &item.slots {
            let Some(date) = slot.delivery_date else {
                continue;
            };
            days.entry(date)
                .or_default()
                .entry(slot.delivery_time)
                .or_default()
                .push(ScheduleEntry {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: slot.quantity,
                    unit: item.unit.clone(),
                    vehicle_type: slot.vehicle_type.clone(),
                    note: item.note.clone(),
                });
        }
    }

    days.into_iter()
        .map(|(date, times)| ScheduleDay {
            date,
            label: day_label(date, &config.date_label_format),
            times: times
                .into_iter()
                .map(|(time, entries)| ScheduleTime { time, entries })
                .collect(),
        })
        .collect()
}

/// Format the day heading. Config validation rejects unrenderable format
/// strings up front; the ISO date is the fallback if one slips through.
fn day_label(date: NaiveDate, format: &str) -> String {
    use std::fmt::Write;
    let mut label = String::new();
    if write!(label, "{}", date.format(format)).is_err() {
        return date.to_string();
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use crate::model::DeliverySlot;

    fn slot(id: &str, quantity: f64, date: (i32, u32, u32), time: Option<(u32, u32)>) -> DeliverySlot {
        DeliverySlot {
            id: id.into(),
            quantity,
            delivery_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            delivery_time: time.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            vehicle_type: None,
        }
    }

    fn item(product_id: &str, total: f64, slots: Vec<DeliverySlot>) -> CartItem {
        CartItem {
            product_id: product_id.into(),
            product_name: format!("{product_id} (display)"),
            product_image_url: None,
            product_type: None,
            unit: "t".into(),
            total_quantity: total,
            slots,
            note: None,
            added_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn groups_shared_windows_across_items() {
        // ItemA delivers 2025-03-01 08:00; ItemB delivers at that same
        // window and again 2025-03-02 09:00.
        let items = vec![
            item("rebar", 5.0, vec![slot("a1", 5.0, (2025, 3, 1), Some((8, 0)))]),
            item(
                "cement",
                10.0,
                vec![
                    slot("b1", 6.0, (2025, 3, 1), Some((8, 0))),
                    slot("b2", 4.0, (2025, 3, 2), Some((9, 0))),
                ],
            ),
        ];

        let schedule = build_schedule(&items, &default_config());

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(schedule[1].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());

        let day1 = &schedule[0];
        assert_eq!(day1.times.len(), 1);
        assert_eq!(day1.times[0].time, NaiveTime::from_hms_opt(8, 0, 0));
        let products: Vec<&str> = day1.times[0]
            .entries
            .iter()
            .map(|e| e.product_id.as_str())
            .collect();
        assert_eq!(products, vec!["rebar", "cement"]);

        let day2 = &schedule[1];
        assert_eq!(day2.times.len(), 1);
        assert_eq!(day2.times[0].entries.len(), 1);
        assert_eq!(day2.times[0].entries[0].product_id, "cement");
        assert_eq!(day2.times[0].entries[0].quantity, 4.0);
    }

    #[test]
    fn days_and_times_are_strictly_ascending() {
        let items = vec![item(
            "gravel",
            30.0,
            vec![
                slot("a", 10.0, (2025, 3, 2), Some((14, 0))),
                slot("b", 10.0, (2025, 3, 1), Some((16, 0))),
                slot("c", 10.0, (2025, 3, 1), Some((8, 0))),
            ],
        )];

        let schedule = build_schedule(&items, &default_config());

        let dates: Vec<NaiveDate> = schedule.iter().map(|d| d.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(dates, sorted);

        for day in &schedule {
            let times: Vec<Option<NaiveTime>> = day.times.iter().map(|t| t.time).collect();
            let mut sorted = times.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(times, sorted);
        }
    }

    #[test]
    fn flattening_back_loses_nothing() {
        // The projection must carry exactly the input multiset of
        // (date, time, product, quantity) — no slot dropped or duplicated.
        let items = vec![
            item(
                "rebar",
                12.0,
                vec![
                    slot("a", 5.0, (2025, 3, 1), Some((8, 0))),
                    slot("b", 5.0, (2025, 3, 1), Some((8, 0))),
                    slot("c", 2.0, (2025, 3, 3), None),
                ],
            ),
            item("cement", 4.0, vec![slot("d", 4.0, (2025, 3, 1), Some((12, 30)))]),
        ];

        let schedule = build_schedule(&items, &default_config());

        let mut flattened: Vec<(NaiveDate, Option<NaiveTime>, String, String)> = Vec::new();
        for day in &schedule {
            for window in &day.times {
                for entry in &window.entries {
                    flattened.push((
                        day.date,
                        window.time,
                        entry.product_id.clone(),
                        format!("{}", entry.quantity),
                    ));
                }
            }
        }

        let mut expected: Vec<(NaiveDate, Option<NaiveTime>, String, String)> = items
            .iter()
            .flat_map(|item| {
                item.slots.iter().map(|s| {
                    (
                        s.delivery_date.unwrap(),
                        s.delivery_time,
                        item.product_id.clone(),
                        format!("{}", s.quantity),
                    )
                })
            })
            .collect();

        flattened.sort();
        expected.sort();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn undated_slots_are_omitted() {
        let mut undated = slot("a", 5.0, (2025, 3, 1), None);
        undated.delivery_date = None;
        let items = vec![item("rebar", 5.0, vec![undated])];

        assert!(build_schedule(&items, &default_config()).is_empty());
    }

    #[test]
    fn untimed_window_heads_the_day() {
        let items = vec![item(
            "gravel",
            20.0,
            vec![
                slot("a", 10.0, (2025, 3, 1), Some((8, 0))),
                slot("b", 10.0, (2025, 3, 1), None),
            ],
        )];

        let schedule = build_schedule(&items, &default_config());
        assert_eq!(schedule[0].times[0].time, None);
        assert_eq!(schedule[0].times[1].time, NaiveTime::from_hms_opt(8, 0, 0));
    }

    #[test]
    fn label_uses_configured_format() {
        let mut config = default_config();
        config.date_label_format = "%Y-%m-%d".into();
        let items = vec![item("rebar", 5.0, vec![slot("a", 5.0, (2025, 3, 1), None)])];

        let schedule = build_schedule(&items, &config);
        assert_eq!(schedule[0].label, "2025-03-01");
    }
}
