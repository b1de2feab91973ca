//! Completeness gate for the checkout wizard: every finding is data, never
//! an error — an unbalanced ledger is an expected, displayable state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::CartItem;

use super::ledger::round2;

/// Which slot fields the current flow requires. The delivery date is always
/// required; time and vehicle selection only exist in some flows, so one
/// injected knob replaces per-flow duplicated checks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequirements {
    #[serde(default)]
    pub require_time: bool,

    #[serde(default)]
    pub require_vehicle_type: bool,
}

/// One blocking finding on a line item.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Issue {
    /// Slot quantities sum below the item total; `remaining` is what is
    /// still unassigned, in the item's unit.
    #[serde(rename_all = "camelCase")]
    Unallocated { remaining: f64, unit: String },

    /// Slot quantities sum above the item total by `excess`.
    #[serde(rename_all = "camelCase")]
    OverAllocated { excess: f64, unit: String },

    /// One or more slots are missing a required field. `slots` counts the
    /// offending slots; the field class is reported generically.
    #[serde(rename_all = "camelCase")]
    IncompleteSlotFields { slots: usize },

    /// The item total itself is zero or negative; no split can balance it.
    DegenerateTotal,
}

/// Per-cart validation outcome; `ok` gates the step transition.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub ok: bool,

    /// product_id → findings. Items with no findings are absent. Each item
    /// keeps *all* of its findings — a completeness finding never displaces
    /// an allocation finding.
    pub items: BTreeMap<String, Vec<Issue>>,
}

impl ValidationReport {
    /// Findings for one item, empty when it passed.
    pub fn for_item(&self, product_id: &str) -> &[Issue] {
        self.items.get(product_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Check every line item for allocation balance and slot completeness.
pub fn validate_items(items: &[CartItem], requirements: &SlotRequirements) -> ValidationReport {
    let mut findings = BTreeMap::new();

    for item in items {
        let mut issues = Vec::new();

        if item.total_quantity <= 0.0 {
            issues.push(Issue::DegenerateTotal);
        } else {
            let status = item.allocation_status();
            if !status.is_balanced {
                if status.remaining > 0.0 {
                    issues.push(Issue::Unallocated {
                        remaining: round2(status.remaining),
                        unit: item.unit.clone(),
                    });
                } else {
                    issues.push(Issue::OverAllocated {
                        excess: round2(-status.remaining),
                        unit: item.unit.clone(),
                    });
                }
            }
        }

        let incomplete = item
            .slots
            .iter()
            .filter(|slot| {
                slot.delivery_date.is_none()
                    || (requirements.require_time && slot.delivery_time.is_none())
                    || (requirements.require_vehicle_type && slot.vehicle_type.is_none())
            })
            .count();
        if incomplete > 0 {
            issues.push(Issue::IncompleteSlotFields { slots: incomplete });
        }

        if !issues.is_empty() {
            findings.insert(item.product_id.clone(), issues);
        }
    }

    ValidationReport {
        ok: findings.is_empty(),
        items: findings,
    }
}
