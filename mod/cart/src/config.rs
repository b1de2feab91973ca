//! Delivery configuration — defaults for new slots and the vehicle catalog.
//!
//! Supplied per market (YAML/JSON), never hard-coded: the same engine serves
//! deployments with different truck fleets, working hours, and date
//! conventions.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::model::slot::hhmm;

/// One vehicle capacity class offered during slot scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    /// Stable code stored on slots (e.g. "truck10").
    pub code: String,
    /// Human-readable label (e.g. "Truck 10 t").
    pub label: String,
}

/// The top-level delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfig {
    /// Time of day given to newly created slots.
    #[serde(with = "hhmm")]
    pub default_time: NaiveTime,

    /// Vehicle code given to newly created slots. Must appear in
    /// `vehicle_types` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vehicle: Option<String>,

    /// Ordered catalog of vehicle capacity classes. Order is display order.
    pub vehicle_types: Vec<VehicleType>,

    /// chrono format string for day headings in the review schedule
    /// (the market/locale knob, e.g. `"%A, %d %B %Y"`).
    #[serde(default = "default_date_label_format")]
    pub date_label_format: String,
}

fn default_date_label_format() -> String {
    "%A, %d %B %Y".into()
}

impl DeliveryConfig {
    /// Validate the config: the catalog must be non-empty with unique codes,
    /// and the default vehicle must be one of them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vehicle_types.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        for (i, vt) in self.vehicle_types.iter().enumerate() {
            if vt.code.is_empty() {
                return Err(ConfigError::EmptyCode(i));
            }
            if self.vehicle_types[..i].iter().any(|other| other.code == vt.code) {
                return Err(ConfigError::DuplicateCode(vt.code.clone()));
            }
        }

        if let Some(code) = &self.default_vehicle {
            if !self.has_vehicle(code) {
                return Err(ConfigError::UnknownDefaultVehicle(code.clone()));
            }
        }

        if self.date_label_format.is_empty() {
            return Err(ConfigError::EmptyDateFormat);
        }
        // chrono reports a bad specifier only when the formatted value is
        // rendered, so probe with a fixed date here instead of failing at
        // schedule render time.
        let mut probe = String::new();
        use std::fmt::Write;
        if write!(
            probe,
            "{}",
            chrono::NaiveDate::default().format(&self.date_label_format)
        )
        .is_err()
        {
            return Err(ConfigError::BadDateFormat(self.date_label_format.clone()));
        }

        Ok(())
    }

    /// Whether `code` names a vehicle type in the catalog.
    pub fn has_vehicle(&self, code: &str) -> bool {
        self.vehicle_types.iter().any(|vt| vt.code == code)
    }
}

/// Delivery config validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("vehicle catalog is empty")]
    EmptyCatalog,

    #[error("vehicle type at index {0} has an empty code")]
    EmptyCode(usize),

    #[error("duplicate vehicle code '{0}'")]
    DuplicateCode(String),

    #[error("default vehicle '{0}' is not in the catalog")]
    UnknownDefaultVehicle(String),

    #[error("date label format is empty")]
    EmptyDateFormat,

    #[error("date label format '{0}' is not a valid chrono format string")]
    BadDateFormat(String),
}

/// Construct the default delivery configuration used when a deployment
/// ships no market-specific file.
pub fn default_config() -> DeliveryConfig {
    DeliveryConfig {
        default_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        default_vehicle: Some("truck10".into()),
        vehicle_types: vec![
            VehicleType {
                code: "van15".into(),
                label: "Van 1.5 t".into(),
            },
            VehicleType {
                code: "truck5".into(),
                label: "Truck 5 t".into(),
            },
            VehicleType {
                code: "truck10".into(),
                label: "Truck 10 t".into(),
            },
            VehicleType {
                code: "truck20".into(),
                label: "Semi-trailer 20 t".into(),
            },
            VehicleType {
                code: "crane10".into(),
                label: "Crane truck 10 t".into(),
            },
        ],
        date_label_format: default_date_label_format(),
    }
}
