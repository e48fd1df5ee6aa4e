//! Duty-assignment state machine: week assignments, rotation, reporting flags,
//! overrides, swaps and replacements, plus the read-only monthly derivation.

pub mod derivation;
pub mod domain;
mod overrides;
pub mod selection;
mod store;

#[cfg(test)]
mod tests;

pub use derivation::{
    derive_month, CreditPolicy, DayDuty, DayKind, DutyDate, EmployeeTally, MonthDuty, Occupant,
    WEEKDAY_DUTY_HOURS, WEEKEND_DUTY_HOURS,
};
pub use domain::{ScheduleError, Slot};
pub use selection::{Selection, SelectionStep};
pub use store::{ReportingKey, ScheduleState, MAX_CADENCE_STEPS};
