use super::domain::{ScheduleError, Slot};
use super::store::ScheduleState;
use crate::calendar::WeekKey;
use crate::roster::{Employee, EmployeeId};
use tracing::{info, warn};

impl ScheduleState {
    /// Flips the reporting flag for the slot and returns the new value.
    pub fn toggle_reporting(&mut self, week: WeekKey, employee: &EmployeeId) -> bool {
        let key = (week, employee.clone());
        let reporting = if self.reporting.remove(&key) {
            false
        } else {
            self.reporting.insert(key);
            true
        };
        info!(%week, %employee, reporting, "reporting flag toggled");
        reporting
    }

    pub fn is_reporting(&self, week: WeekKey, employee: &EmployeeId) -> bool {
        self.reporting.contains(&(week, employee.clone()))
    }

    /// Records that `substitute` stands in for `original` during `week`. The
    /// underlying assignment keeps `original`, so the override can be cleared
    /// or replaced later.
    pub fn set_override(
        &mut self,
        week: WeekKey,
        original: &EmployeeId,
        substitute: &Employee,
    ) -> Result<(), ScheduleError> {
        if &substitute.id == original {
            warn!(%week, %original, "override onto the same employee rejected");
            return Err(ScheduleError::InvalidOverride(original.clone()));
        }
        if !self.week(week).iter().any(|e| &e.id == original) {
            return Err(ScheduleError::OverrideTargetMissing {
                week,
                employee: original.clone(),
            });
        }

        self.overrides
            .entry(week)
            .or_default()
            .insert(original.clone(), substitute.clone());
        info!(%week, %original, substitute = %substitute.id, "override recorded");
        Ok(())
    }

    pub fn clear_override(&mut self, week: WeekKey, original: &EmployeeId) -> bool {
        let removed = self
            .overrides
            .get_mut(&week)
            .and_then(|entries| entries.remove(original))
            .is_some();
        if self.overrides.get(&week).is_some_and(|entries| entries.is_empty()) {
            self.overrides.remove(&week);
        }
        removed
    }

    pub fn override_for(&self, week: WeekKey, original: &EmployeeId) -> Option<&Employee> {
        self.overrides
            .get(&week)
            .and_then(|entries| entries.get(original))
    }

    /// The week's occupants after substitutions, in assignment order.
    pub fn effective_roster(&self, week: WeekKey) -> Vec<&Employee> {
        self.week(week)
            .iter()
            .map(|raw| self.override_for(week, &raw.id).unwrap_or(raw))
            .collect()
    }

    /// Exchanges two entries between (or within) week assignments.
    ///
    /// Each slot is matched against the effective occupant first; a matched
    /// substitute is written into the assignment before the exchange so the
    /// person actually shown is the one who moves.
    pub fn swap(&mut self, first: &Slot, second: &Slot) -> Result<(), ScheduleError> {
        let first_index =
            self.locate(first.week, &first.employee)
                .ok_or_else(|| ScheduleError::SwapTargetMissing {
                    week: first.week,
                    employee: first.employee.clone(),
                })?;
        let second_index =
            self.locate(second.week, &second.employee)
                .ok_or_else(|| ScheduleError::SwapTargetMissing {
                    week: second.week,
                    employee: second.employee.clone(),
                })?;

        if first.week == second.week && first_index == second_index {
            return Ok(());
        }

        self.materialize(first.week, first_index);
        self.materialize(second.week, second_index);

        if first.week == second.week {
            if let Some(members) = self.assignments.get_mut(&first.week) {
                members.swap(first_index, second_index);
            }
        } else {
            let first_entry = self.entry(first.week, first_index).cloned();
            let second_entry = self.entry(second.week, second_index).cloned();
            if let (Some(first_entry), Some(second_entry)) = (first_entry, second_entry) {
                self.put(first.week, first_index, second_entry);
                self.put(second.week, second_index, first_entry);
            }
        }

        info!(%first, %second, "duty swapped");
        Ok(())
    }

    /// `source`'s occupant covers `target`: a copy of the coverer joins the
    /// target week and the covered employee leaves it. The coverer keeps their
    /// own week.
    pub fn replace(&mut self, target: &Slot, source: &Slot) -> Result<(), ScheduleError> {
        let source_index = self.locate(source.week, &source.employee).ok_or_else(|| {
            ScheduleError::ReplacementSourceMissing {
                week: source.week,
                employee: source.employee.clone(),
            }
        })?;
        let target_index = self.locate(target.week, &target.employee).ok_or_else(|| {
            ScheduleError::ReplacementTargetMissing {
                week: target.week,
                employee: target.employee.clone(),
            }
        })?;
        if source.week == target.week && source_index == target_index {
            return Err(ScheduleError::SelfReplacement(target.employee.clone()));
        }

        let coverer = self
            .effective_roster(source.week)
            .get(source_index)
            .map(|employee| (*employee).clone())
            .ok_or_else(|| ScheduleError::ReplacementSourceMissing {
                week: source.week,
                employee: source.employee.clone(),
            })?;

        self.materialize(target.week, target_index);
        if let Some(members) = self.assignments.get_mut(&target.week) {
            members.remove(target_index);
        }
        self.prune_overrides(target.week);

        let already_on_duty = self
            .effective_roster(target.week)
            .iter()
            .any(|employee| employee.id == coverer.id);
        if !already_on_duty {
            self.assignments
                .entry(target.week)
                .or_default()
                .push(coverer);
        }
        if self.week(target.week).is_empty() {
            self.assignments.remove(&target.week);
        }

        info!(%target, %source, "replacement recorded");
        Ok(())
    }

    /// Position of the employee shown as `employee` in the week, matching the
    /// effective occupant before the raw entry.
    fn locate(&self, week: WeekKey, employee: &EmployeeId) -> Option<usize> {
        let members = self.week(week);
        members
            .iter()
            .position(|raw| {
                self.override_for(week, &raw.id)
                    .is_some_and(|substitute| &substitute.id == employee)
            })
            .or_else(|| {
                members.iter().position(|raw| {
                    &raw.id == employee && self.override_for(week, &raw.id).is_none()
                })
            })
    }

    /// Writes a substitute into the assignment and drops its override.
    fn materialize(&mut self, week: WeekKey, index: usize) {
        let Some(original) = self.entry(week, index).map(|e| e.id.clone()) else {
            return;
        };
        let substitute = self
            .overrides
            .get_mut(&week)
            .and_then(|entries| entries.remove(&original));
        if let Some(substitute) = substitute {
            self.put(week, index, substitute);
        }
        if self.overrides.get(&week).is_some_and(|entries| entries.is_empty()) {
            self.overrides.remove(&week);
        }
    }

    fn entry(&self, week: WeekKey, index: usize) -> Option<&Employee> {
        self.week(week).get(index)
    }

    fn put(&mut self, week: WeekKey, index: usize, employee: Employee) {
        if let Some(slot) = self
            .assignments
            .get_mut(&week)
            .and_then(|members| members.get_mut(index))
        {
            *slot = employee;
        }
    }
}
