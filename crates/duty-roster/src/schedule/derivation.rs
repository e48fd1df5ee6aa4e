use super::store::ScheduleState;
use crate::calendar::{is_weekend, WeekKey, YearMonth};
use crate::roster::{Employee, EmployeeId, RosterCatalog};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const WEEKDAY_DUTY_HOURS: u32 = 16;
pub const WEEKEND_DUTY_HOURS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Weekday,
    WeekendOrHoliday,
}

impl DayKind {
    pub const fn hours(self) -> u32 {
        match self {
            Self::Weekday => WEEKDAY_DUTY_HOURS,
            Self::WeekendOrHoliday => WEEKEND_DUTY_HOURS,
        }
    }
}

/// Which days count towards an employee's duty tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditPolicy {
    /// Every member of the week's effective roster is credited for every day.
    #[default]
    Standby,
    /// Only the member the daily cycle puts on call is credited.
    OnCall,
}

impl FromStr for CreditPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standby" => Ok(Self::Standby),
            "on_call" | "on-call" | "oncall" => Ok(Self::OnCall),
            other => Err(format!("unknown credit policy '{other}'")),
        }
    }
}

impl fmt::Display for CreditPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standby => f.write_str("standby"),
            Self::OnCall => f.write_str("on_call"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub employee: Employee,
    pub is_reporting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDuty {
    pub date: NaiveDate,
    pub week: WeekKey,
    pub kind: DayKind,
    /// Effective roster of the day's week, in assignment order.
    pub occupants: Vec<Occupant>,
    /// Index into `occupants` of the member on call that day.
    pub on_call: Option<usize>,
}

impl DayDuty {
    pub fn on_call(&self) -> Option<&Occupant> {
        self.on_call.and_then(|index| self.occupants.get(index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyDate {
    pub date: NaiveDate,
    pub kind: DayKind,
}

impl DutyDate {
    pub const fn hours(&self) -> u32 {
        self.kind.hours()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeTally {
    pub employee: Employee,
    pub dates: Vec<DutyDate>,
    pub weekday_days: u32,
    pub weekend_days: u32,
    pub weekday_hours: u32,
    pub weekend_hours: u32,
}

impl EmployeeTally {
    fn new(employee: Employee) -> Self {
        Self {
            employee,
            dates: Vec::new(),
            weekday_days: 0,
            weekend_days: 0,
            weekday_hours: 0,
            weekend_hours: 0,
        }
    }

    fn credit(&mut self, date: NaiveDate, kind: DayKind) {
        self.dates.push(DutyDate { date, kind });
        match kind {
            DayKind::Weekday => {
                self.weekday_days += 1;
                self.weekday_hours += kind.hours();
            }
            DayKind::WeekendOrHoliday => {
                self.weekend_days += 1;
                self.weekend_hours += kind.hours();
            }
        }
    }

    pub fn total_hours(&self) -> u32 {
        self.weekday_hours + self.weekend_hours
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthDuty {
    pub period: YearMonth,
    pub policy: CreditPolicy,
    pub days: Vec<DayDuty>,
    /// One tally per catalog employee in catalog order, followed by anyone on
    /// duty who is no longer in the catalog.
    pub tallies: Vec<EmployeeTally>,
}

impl MonthDuty {
    pub fn tally(&self, employee: &EmployeeId) -> Option<&EmployeeTally> {
        self.tallies
            .iter()
            .find(|tally| &tally.employee.id == employee)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayDuty> {
        self.days.iter().find(|day| day.date == date)
    }
}

/// Day-by-day duty for `period`.
///
/// The on-call member cycles through the week's effective roster one day at a
/// time, restarting at the first member whenever a new ISO week begins.
pub fn derive_month(
    state: &ScheduleState,
    catalog: &RosterCatalog,
    period: YearMonth,
    policy: CreditPolicy,
) -> MonthDuty {
    let mut tallies: Vec<EmployeeTally> = catalog
        .employees()
        .cloned()
        .map(EmployeeTally::new)
        .collect();
    let mut tally_index: HashMap<EmployeeId, usize> = tallies
        .iter()
        .enumerate()
        .map(|(index, tally)| (tally.employee.id.clone(), index))
        .collect();

    let mut days = Vec::new();
    let mut current_week: Option<WeekKey> = None;
    let mut cycle = 0usize;

    for date in period.days() {
        let week = WeekKey::of(date);
        if current_week != Some(week) {
            current_week = Some(week);
            cycle = 0;
        }

        let kind = if is_weekend(date) || catalog.is_holiday(date) {
            DayKind::WeekendOrHoliday
        } else {
            DayKind::Weekday
        };

        let occupants: Vec<Occupant> = state
            .effective_roster(week)
            .into_iter()
            .map(|employee| Occupant {
                is_reporting: state.is_reporting(week, &employee.id),
                employee: employee.clone(),
            })
            .collect();

        let on_call = if occupants.is_empty() {
            None
        } else {
            let index = cycle % occupants.len();
            cycle += 1;
            Some(index)
        };

        let credited: Vec<&Employee> = match policy {
            CreditPolicy::Standby => {
                let mut unique: Vec<&Employee> = Vec::with_capacity(occupants.len());
                for occupant in &occupants {
                    if !unique.iter().any(|e| e.id == occupant.employee.id) {
                        unique.push(&occupant.employee);
                    }
                }
                unique
            }
            CreditPolicy::OnCall => on_call
                .and_then(|index| occupants.get(index))
                .map(|occupant| vec![&occupant.employee])
                .unwrap_or_default(),
        };

        for employee in credited {
            let index = *tally_index.entry(employee.id.clone()).or_insert_with(|| {
                tallies.push(EmployeeTally::new(employee.clone()));
                tallies.len() - 1
            });
            tallies[index].credit(date, kind);
        }

        days.push(DayDuty {
            date,
            week,
            kind,
            occupants,
            on_call,
        });
    }

    MonthDuty {
        period,
        policy,
        days,
        tallies,
    }
}
