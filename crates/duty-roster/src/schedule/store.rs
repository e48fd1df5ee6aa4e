use super::domain::ScheduleError;
use crate::calendar::{weeks_in_month, weeks_in_year, WeekInfo, WeekKey, YearMonth};
use crate::roster::{Employee, EmployeeId, Group, RosterCatalog};
use chrono::Datelike;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Hard stop for cadence rotation, independent of the calendar cutoff.
pub const MAX_CADENCE_STEPS: usize = 60;

pub type ReportingKey = (WeekKey, EmployeeId);

/// The single owned schedule: per-week assignment snapshots, reporting flags
/// and per-week substitutions. Everything that mutates duty goes through here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleState {
    pub(super) assignments: BTreeMap<WeekKey, Vec<Employee>>,
    pub(super) reporting: BTreeSet<ReportingKey>,
    pub(super) overrides: BTreeMap<WeekKey, BTreeMap<EmployeeId, Employee>>,
}

impl ScheduleState {
    pub fn from_parts(
        assignments: BTreeMap<WeekKey, Vec<Employee>>,
        reporting: BTreeSet<ReportingKey>,
        overrides: BTreeMap<WeekKey, BTreeMap<EmployeeId, Employee>>,
    ) -> Self {
        let mut state = Self {
            assignments,
            reporting,
            overrides,
        };
        state.assignments.retain(|_, members| !members.is_empty());
        let weeks: Vec<WeekKey> = state.overrides.keys().copied().collect();
        for week in weeks {
            state.prune_overrides(week);
        }
        state
    }

    pub fn assignments(&self) -> &BTreeMap<WeekKey, Vec<Employee>> {
        &self.assignments
    }

    pub fn reporting(&self) -> &BTreeSet<ReportingKey> {
        &self.reporting
    }

    pub fn overrides(&self) -> &BTreeMap<WeekKey, BTreeMap<EmployeeId, Employee>> {
        &self.overrides
    }

    /// Raw assignment for `week`, ignoring overrides. Empty when unassigned.
    pub fn week(&self, week: WeekKey) -> &[Employee] {
        self.assignments
            .get(&week)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_assigned(&self, week: WeekKey) -> bool {
        !self.week(week).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.reporting.is_empty() && self.overrides.is_empty()
    }

    /// Replaces the week's assignment with a fresh copy of the group's members.
    /// Overrides recorded for the week are discarded; reporting flags are kept.
    pub fn assign_group(&mut self, week: WeekKey, group: &Group) {
        self.assignments.insert(week, group.members.clone());
        if self.overrides.remove(&week).is_some() {
            debug!(%week, "cleared overrides on reassignment");
        }
        info!(%week, group = %group.name, "group assigned");
    }

    /// Fills the weeks after `start` in round-robin group order, leaving any
    /// week that already has an assignment untouched. Returns the weeks filled.
    pub fn rotate_forward(
        &mut self,
        catalog: &RosterCatalog,
        start: WeekKey,
        start_group: &str,
        weeks: &[WeekInfo],
    ) -> Result<Vec<WeekKey>, ScheduleError> {
        let group_index = catalog
            .group_index(start_group)
            .ok_or_else(|| ScheduleError::UnknownGroup(start_group.to_string()))?;
        let Some(start_index) = weeks.iter().position(|week| week.key == start) else {
            return Ok(Vec::new());
        };

        let groups = catalog.groups();
        let mut filled = Vec::new();
        for (index, week) in weeks.iter().enumerate().skip(start_index + 1) {
            if self.is_assigned(week.key) {
                continue;
            }
            let distance = index - start_index;
            let group = &groups[(group_index + distance) % groups.len()];
            self.assign_group(week.key, group);
            filled.push(week.key);
        }

        info!(%start, filled = filled.len(), "rotation applied");
        Ok(filled)
    }

    /// Multi-week duty cycle: every `cadence` ISO weeks after `start` the next
    /// group in order takes over, wrapping into the following ISO year.
    ///
    /// Stops after [`MAX_CADENCE_STEPS`], or once the projected Monday lies
    /// beyond January of `target_year + 1`. Assigned weeks are never overwritten.
    pub fn rotate_every(
        &mut self,
        catalog: &RosterCatalog,
        start: WeekKey,
        start_group: &str,
        cadence: u32,
        target_year: i32,
    ) -> Result<Vec<WeekKey>, ScheduleError> {
        if cadence == 0 {
            return Err(ScheduleError::InvalidCadence);
        }
        let group_index = catalog
            .group_index(start_group)
            .ok_or_else(|| ScheduleError::UnknownGroup(start_group.to_string()))?;

        let groups = catalog.groups();
        let (mut year, mut week) = (start.year(), start.week());
        let mut filled = Vec::new();

        for step in 1..=MAX_CADENCE_STEPS {
            week += cadence;
            let mut year_weeks = weeks_in_year(year);
            while week > year_weeks {
                week -= year_weeks;
                year += 1;
                year_weeks = weeks_in_year(year);
            }

            let Ok(key) = WeekKey::new(year, week) else {
                break;
            };
            let monday = key.monday();
            let past_cutoff = monday.year() > target_year + 1
                || (monday.year() == target_year + 1 && monday.month() > 1);
            if past_cutoff {
                debug!(%key, target_year, "cadence rotation reached cutoff");
                break;
            }

            if !self.is_assigned(key) {
                let group = &groups[(group_index + step) % groups.len()];
                self.assign_group(key, group);
                filled.push(key);
            }
        }

        info!(%start, cadence, filled = filled.len(), "cadence rotation applied");
        Ok(filled)
    }

    /// Drops every assignment, reporting flag and override.
    pub fn clear(&mut self) {
        self.assignments.clear();
        self.reporting.clear();
        self.overrides.clear();
        info!("schedule cleared");
    }

    /// Drops assignments, reporting flags and overrides for every ISO week
    /// overlapping `period`, including boundary weeks shared with the
    /// neighbouring months.
    pub fn clear_month(&mut self, period: YearMonth) {
        let weeks: BTreeSet<WeekKey> = weeks_in_month(period)
            .into_iter()
            .map(|week| week.key)
            .collect();

        self.assignments.retain(|week, _| !weeks.contains(week));
        self.overrides.retain(|week, _| !weeks.contains(week));
        self.reporting.retain(|(week, _)| !weeks.contains(week));
        info!(%period, weeks = weeks.len(), "month cleared");
    }

    /// Removes overrides whose original employee no longer sits in the week.
    pub(super) fn prune_overrides(&mut self, week: WeekKey) {
        let present: BTreeSet<EmployeeId> =
            self.week(week).iter().map(|e| e.id.clone()).collect();
        if let Some(entries) = self.overrides.get_mut(&week) {
            entries.retain(|original, _| present.contains(original));
            if entries.is_empty() {
                self.overrides.remove(&week);
            }
        }
    }
}
