//! The quantity-to-delivery-slot allocation engine.
//!
//! A line item's ordered quantity is split across one or more delivery
//! slots. This module owns the arithmetic that keeps the split consistent
//! (`ledger`), the completeness gate for the checkout wizard (`validator`),
//! the date → time → deliveries review projection (`schedule`), and the
//! mapper to the order-creation wire payload (`submit`).

pub mod ledger;
pub mod schedule;
pub mod submit;
pub mod validator;

pub use ledger::{AllocationStatus, BALANCE_EPSILON, round2};
pub use schedule::{ScheduleDay, ScheduleEntry, ScheduleTime, build_schedule};
pub use submit::build_submission;
pub use validator::{Issue, SlotRequirements, ValidationReport, validate_items};
