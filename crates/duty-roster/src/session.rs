//! Interactive session: owns the schedule, the pending selection and the
//! snapshot store, and turns every user action into a [`Notice`].
//!
//! Mutations are persisted right after they succeed. Rejected actions leave
//! the schedule untouched and come back as error notices instead of errors.

use crate::calendar::{weeks_in_month, WeekInfo, WeekKey, YearMonth};
use crate::config::ScheduleConfig;
use crate::export::ExportSnapshot;
use crate::persistence::{self, SnapshotStore};
use crate::roster::{EmployeeId, RosterCatalog, RosterError};
use crate::schedule::{
    derive_month, MonthDuty, ScheduleError, ScheduleState, Selection, SelectionStep, Slot,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing message produced by a session action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

const READ_ONLY_MESSAGE: &str = "Roster configuration failed to load; the schedule is read-only";

pub struct Session<S> {
    catalog: Option<RosterCatalog>,
    startup: Option<Notice>,
    state: ScheduleState,
    selection: Selection,
    period: YearMonth,
    settings: ScheduleConfig,
    store: S,
}

impl<S: SnapshotStore> Session<S> {
    /// Restores the persisted schedule. A failed roster load keeps the session
    /// readable but rejects every mutating action.
    pub fn open(
        catalog: Result<RosterCatalog, RosterError>,
        store: S,
        settings: ScheduleConfig,
        today: NaiveDate,
    ) -> Self {
        let restored = persistence::load(&store);
        let period = restored.period.unwrap_or_else(|| YearMonth::of(today));

        let (catalog, startup) = match catalog {
            Ok(catalog) => {
                info!(%period, "session opened");
                (Some(catalog), Notice::success("Schedule loaded"))
            }
            Err(err) => {
                error!(error = %err, "roster configuration unavailable, session is read-only");
                (None, Notice::error(format!("{READ_ONLY_MESSAGE}: {err}")))
            }
        };

        Self {
            catalog,
            startup: Some(startup),
            state: restored.state,
            selection: Selection::default(),
            period,
            settings,
            store,
        }
    }

    /// The load outcome, reported once.
    pub fn take_startup_notice(&mut self) -> Option<Notice> {
        self.startup.take()
    }

    pub fn catalog(&self) -> Option<&RosterCatalog> {
        self.catalog.as_ref()
    }

    pub fn is_read_only(&self) -> bool {
        self.catalog.is_none()
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn period(&self) -> YearMonth {
        self.period
    }

    pub fn settings(&self) -> ScheduleConfig {
        self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_auto_rotation(&mut self, enabled: bool) {
        self.settings.auto_rotation = enabled;
    }

    pub fn weeks(&self) -> Vec<WeekInfo> {
        weeks_in_month(self.period)
    }

    pub fn select_period(&mut self, period: YearMonth) -> Notice {
        self.period = period;
        self.selection.cancel();
        self.persist();
        Notice::info(format!("Showing {period}"))
    }

    /// Drops a group onto a week and, when auto-rotation is on, fills the rest
    /// of the selected month.
    pub fn drop_group(&mut self, week: WeekKey, group_name: &str) -> Notice {
        let auto_rotation = self.settings.auto_rotation;
        let weeks = self.weeks();
        self.mutate(|catalog, state, _| {
            let group = catalog
                .group(group_name)
                .ok_or_else(|| ScheduleError::UnknownGroup(group_name.to_string()))?;
            state.assign_group(week, group);

            if !auto_rotation {
                return Ok(Notice::success(format!("{group_name} assigned to {week}")));
            }
            let filled = state.rotate_forward(catalog, week, group_name, &weeks)?;
            Ok(Notice::success(format!(
                "{group_name} assigned to {week}; rotation filled {} following week(s)",
                filled.len()
            )))
        })
    }

    /// Multi-week cycle from `start`, bounded by the selected year.
    pub fn rotate_every(&mut self, start: WeekKey, group_name: &str, cadence: u32) -> Notice {
        let target_year = self.period.year();
        self.mutate(|catalog, state, _| {
            let group = catalog
                .group(group_name)
                .ok_or_else(|| ScheduleError::UnknownGroup(group_name.to_string()))?;
            if cadence == 0 {
                return Err(ScheduleError::InvalidCadence);
            }
            if !state.is_assigned(start) {
                state.assign_group(start, group);
            }
            let filled = state.rotate_every(catalog, start, group_name, cadence, target_year)?;
            Ok(Notice::success(format!(
                "Every-{cadence}-week rotation filled {} week(s)",
                filled.len()
            )))
        })
    }

    /// Plain click on an occupant.
    pub fn click(&mut self, slot: Slot) -> Notice {
        self.mutate(|_, state, selection| Ok(step_notice(selection.click(state, slot)?)))
    }

    pub fn toggle_reporting(&mut self, slot: Slot) -> Notice {
        self.mutate(|_, state, _| {
            let reporting = state.toggle_reporting(slot.week, &slot.employee);
            Ok(step_notice(SelectionStep::ReportingToggled { slot, reporting }))
        })
    }

    /// Swap gesture: first call selects, second call commits.
    pub fn swap(&mut self, slot: Slot) -> Notice {
        self.mutate(|_, state, selection| Ok(step_notice(selection.swap_with(state, slot)?)))
    }

    pub fn begin_replacement(&mut self, slot: Slot) -> Notice {
        self.mutate(|_, _, selection| Ok(step_notice(selection.begin_replacement(slot))))
    }

    pub fn complete_replacement(&mut self, coverer: Slot) -> Notice {
        self.mutate(|_, state, selection| {
            Ok(step_notice(selection.complete_replacement(state, coverer)?))
        })
    }

    pub fn cancel_selection(&mut self) -> Notice {
        step_notice(self.selection.cancel())
    }

    pub fn set_override(
        &mut self,
        week: WeekKey,
        original: &EmployeeId,
        substitute: &EmployeeId,
    ) -> Notice {
        self.mutate(|catalog, state, _| {
            let employee = catalog
                .employee(substitute)
                .ok_or_else(|| ScheduleError::UnknownEmployee(substitute.clone()))?;
            state.set_override(week, original, employee)?;
            Ok(Notice::success(format!(
                "{} stands in for {original} in {week}",
                employee.name
            )))
        })
    }

    pub fn clear_override(&mut self, week: WeekKey, original: &EmployeeId) -> Notice {
        self.mutate(|_, state, _| {
            if state.clear_override(week, original) {
                Ok(Notice::success(format!("Override for {original} in {week} removed")))
            } else {
                Ok(Notice::info(format!("No override for {original} in {week}")))
            }
        })
    }

    /// Clears every week overlapping the selected month.
    pub fn clear_month(&mut self) -> Notice {
        let period = self.period;
        self.mutate(|_, state, selection| {
            state.clear_month(period);
            selection.cancel();
            Ok(Notice::success(format!("Schedule for {period} cleared")))
        })
    }

    pub fn clear_all(&mut self) -> Notice {
        self.mutate(|_, state, selection| {
            state.clear();
            selection.cancel();
            Ok(Notice::success("Schedule cleared"))
        })
    }

    pub fn derive(&self) -> Option<MonthDuty> {
        self.catalog.as_ref().map(|catalog| {
            derive_month(&self.state, catalog, self.period, self.settings.credit_policy)
        })
    }

    /// Point-in-time copy for exports; later edits do not reach it.
    pub fn export_snapshot(&self) -> Option<ExportSnapshot> {
        self.catalog.as_ref().map(|catalog| ExportSnapshot {
            catalog: catalog.clone(),
            state: self.state.clone(),
            period: self.period,
            policy: self.settings.credit_policy,
        })
    }

    fn mutate<F>(&mut self, action: F) -> Notice
    where
        F: FnOnce(&RosterCatalog, &mut ScheduleState, &mut Selection) -> Result<Notice, ScheduleError>,
    {
        let Some(catalog) = self.catalog.as_ref() else {
            warn!("mutation rejected: session is read-only");
            return Notice::error(READ_ONLY_MESSAGE);
        };

        match action(catalog, &mut self.state, &mut self.selection) {
            Ok(notice) => {
                self.persist();
                notice
            }
            Err(err) => {
                warn!(error = %err, "schedule action rejected");
                Notice::error(err.to_string())
            }
        }
    }

    fn persist(&mut self) {
        if let Err(err) = persistence::save(&mut self.store, &self.state, self.period) {
            warn!(error = %err, "failed to persist schedule snapshot");
        }
    }
}

fn step_notice(step: SelectionStep) -> Notice {
    match step {
        SelectionStep::AwaitingSwapPartner(slot) => {
            Notice::info(format!("Select the second employee to swap with {slot}"))
        }
        SelectionStep::Swapped { first, second } => {
            Notice::success(format!("Swapped {first} with {second}"))
        }
        SelectionStep::AwaitingCoverer(slot) => {
            Notice::info(format!("Select the employee who will cover {slot}"))
        }
        SelectionStep::Replaced { replaced, coverer } => Notice::success(format!(
            "{} covers {replaced}",
            coverer.employee
        )),
        SelectionStep::ReportingToggled { slot, reporting } => {
            let verb = if reporting { "added" } else { "removed" };
            Notice::info(format!("Reporting {verb} for {slot}"))
        }
        SelectionStep::Cancelled => Notice::info("Selection cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemorySnapshotStore, ASSIGNMENTS_KEY};
    use crate::roster::{GroupDocument, MemberDocument, RosterDocument};

    fn member(id: &str, name: &str) -> MemberDocument {
        MemberDocument {
            id: EmployeeId::new(id),
            name: name.to_string(),
            phone: None,
            personnel_number: None,
        }
    }

    fn catalog() -> RosterCatalog {
        RosterCatalog::from_document(RosterDocument {
            title: "Session".to_string(),
            groups: vec![
                GroupDocument {
                    name: "Alpha".to_string(),
                    members: vec![member("e1", "Eva Novak"), member("e2", "Jan Kral")],
                },
                GroupDocument {
                    name: "Bravo".to_string(),
                    members: vec![member("e3", "Ivan Bela"), member("e4", "Lucia Mraz")],
                },
                GroupDocument {
                    name: "Charlie".to_string(),
                    members: vec![member("e5", "Peter Sova")],
                },
            ],
            signatories: Default::default(),
            holidays: Vec::new(),
        })
        .expect("catalog is valid")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 10).expect("valid date")
    }

    fn week(raw: &str) -> WeekKey {
        raw.parse().expect("valid week key")
    }

    fn manual() -> ScheduleConfig {
        ScheduleConfig {
            auto_rotation: false,
            ..ScheduleConfig::default()
        }
    }

    fn session(settings: ScheduleConfig) -> Session<MemorySnapshotStore> {
        Session::open(Ok(catalog()), MemorySnapshotStore::default(), settings, today())
    }

    fn ids(session: &Session<MemorySnapshotStore>, raw: &str) -> Vec<String> {
        session
            .state()
            .week(week(raw))
            .iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    #[test]
    fn drop_with_rotation_fills_month_and_survives_reopen() {
        let mut session = session(ScheduleConfig::default());
        assert_eq!(session.period(), YearMonth::new(2025, 11).expect("month"));
        assert_eq!(
            session.take_startup_notice().map(|n| n.level),
            Some(NoticeLevel::Success)
        );
        assert!(session.take_startup_notice().is_none());

        let notice = session.drop_group(week("2025-W44"), "Alpha");
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.message.contains("4 following"));
        assert_eq!(ids(&session, "2025-W46"), vec!["e5"]);
        assert_eq!(ids(&session, "2025-W48"), vec!["e3", "e4"]);
        assert!(session.store().entries().contains_key(ASSIGNMENTS_KEY));

        let reopened = Session::open(
            Ok(catalog()),
            session.store().clone(),
            manual(),
            NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
        );
        assert_eq!(reopened.state(), session.state());
        assert_eq!(reopened.period(), session.period());
    }

    #[test]
    fn read_only_session_rejects_mutations() {
        let mut session = Session::open(
            Err(RosterError::NoGroups),
            MemorySnapshotStore::default(),
            ScheduleConfig::default(),
            today(),
        );
        assert!(session.is_read_only());
        assert!(session
            .take_startup_notice()
            .is_some_and(|notice| notice.is_error()));

        let notice = session.drop_group(week("2025-W45"), "Alpha");
        assert!(notice.is_error());
        assert!(session.state().is_empty());
        assert!(session.store().entries().is_empty());
        assert!(session.derive().is_none());
        assert!(session.export_snapshot().is_none());
    }

    #[test]
    fn swap_gesture_selects_then_commits() {
        let mut session = session(manual());
        session.drop_group(week("2025-W45"), "Alpha");
        session.drop_group(week("2025-W46"), "Bravo");

        let first = session.swap(Slot::new(week("2025-W45"), "e1"));
        assert_eq!(first.level, NoticeLevel::Info);
        assert!(session.selection().pending_swap().is_some());
        assert_eq!(session.cancel_selection().level, NoticeLevel::Info);
        assert!(session.selection().is_idle());
        session.swap(Slot::new(week("2025-W45"), "e1"));

        let second = session.swap(Slot::new(week("2025-W46"), "e3"));
        assert_eq!(second.level, NoticeLevel::Success);
        assert!(session.selection().is_idle());
        assert_eq!(ids(&session, "2025-W45"), vec!["e3", "e2"]);
        assert_eq!(ids(&session, "2025-W46"), vec!["e1", "e4"]);
    }

    #[test]
    fn click_completes_pending_replacement() {
        let mut session = session(manual());
        session.drop_group(week("2025-W45"), "Alpha");
        session.drop_group(week("2025-W46"), "Bravo");

        session.begin_replacement(Slot::new(week("2025-W45"), "e1"));
        let notice = session.click(Slot::new(week("2025-W46"), "e3"));
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(ids(&session, "2025-W45"), vec!["e2", "e3"]);
        assert_eq!(ids(&session, "2025-W46"), vec!["e3", "e4"]);

        let toggled = session.click(Slot::new(week("2025-W46"), "e4"));
        assert_eq!(toggled.level, NoticeLevel::Info);
        assert!(session
            .state()
            .is_reporting(week("2025-W46"), &EmployeeId::new("e4")));
    }

    #[test]
    fn rejected_override_leaves_schedule_untouched() {
        let mut session = session(manual());
        session.drop_group(week("2025-W45"), "Alpha");
        let before = session.state().clone();

        assert!(session
            .set_override(week("2025-W45"), &EmployeeId::new("e1"), &EmployeeId::new("e9"))
            .is_error());
        assert!(session
            .set_override(week("2025-W45"), &EmployeeId::new("e1"), &EmployeeId::new("e1"))
            .is_error());
        assert_eq!(session.state(), &before);

        let notice =
            session.set_override(week("2025-W45"), &EmployeeId::new("e1"), &EmployeeId::new("e5"));
        assert_eq!(notice.level, NoticeLevel::Success);
        let shown: Vec<&str> = session
            .state()
            .effective_roster(week("2025-W45"))
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(shown, vec!["e5", "e2"]);
    }

    #[test]
    fn clear_month_keeps_other_months() {
        let mut session = session(manual());
        session.drop_group(week("2025-W45"), "Alpha");
        session.drop_group(week("2025-W50"), "Bravo");

        session.clear_month();
        assert!(!session.state().is_assigned(week("2025-W45")));
        assert!(session.state().is_assigned(week("2025-W50")));

        session.clear_all();
        assert!(session.state().is_empty());
    }
}
