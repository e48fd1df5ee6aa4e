use crate::calendar::WeekKey;
use crate::roster::EmployeeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One employee entry inside one week's assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub week: WeekKey,
    pub employee: EmployeeId,
}

impl Slot {
    pub fn new(week: WeekKey, employee: impl Into<String>) -> Self {
        Self {
            week,
            employee: EmployeeId::new(employee),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.week, self.employee)
    }
}

/// Rejected schedule operations. None of these leave partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("employee {0} cannot substitute for themselves")]
    InvalidOverride(EmployeeId),
    #[error("employee {employee} is not on duty in {week}; swap aborted")]
    SwapTargetMissing { week: WeekKey, employee: EmployeeId },
    #[error("covering employee {employee} is not on duty in {week}; replacement aborted")]
    ReplacementSourceMissing { week: WeekKey, employee: EmployeeId },
    #[error("employee {employee} to be replaced is no longer on duty in {week}")]
    ReplacementTargetMissing { week: WeekKey, employee: EmployeeId },
    #[error("employee {employee} is not on duty in {week}; override rejected")]
    OverrideTargetMissing { week: WeekKey, employee: EmployeeId },
    #[error("employee {0} cannot cover their own duty")]
    SelfReplacement(EmployeeId),
    #[error("unknown group '{0}'")]
    UnknownGroup(String),
    #[error("unknown employee '{0}'")]
    UnknownEmployee(EmployeeId),
    #[error("no swap source has been selected")]
    NoPendingSwap,
    #[error("no employee has been marked for replacement")]
    NoPendingReplacement,
    #[error("rotation cadence must be at least one week")]
    InvalidCadence,
}
