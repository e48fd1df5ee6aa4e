//! Key/value snapshot of the schedule, written after every mutation.
//!
//! Each part of the state lives under its own key so a corrupt entry only
//! resets that part.

mod file;

pub use file::FileSnapshotStore;

use crate::calendar::{WeekKey, YearMonth};
use crate::roster::{Employee, EmployeeId};
use crate::schedule::{ReportingKey, ScheduleState};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub const ASSIGNMENTS_KEY: &str = "duty_assignments";
pub const REPORTING_KEY: &str = "reporting";
pub const OVERRIDES_KEY: &str = "overrides";
pub const SELECTED_MONTH_KEY: &str = "selected_month";
pub const SELECTED_YEAR_KEY: &str = "selected_year";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("snapshot storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage abstraction so sessions can run against memory or a file.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;
    fn write_all(&mut self, entries: Vec<(&'static str, String)>) -> Result<(), PersistenceError> {
        for (key, value) in entries {
            self.write(key, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    entries: BTreeMap<String, String>,
}

impl MemorySnapshotStore {
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Everything restored from a snapshot at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoredSession {
    pub state: ScheduleState,
    pub period: Option<YearMonth>,
}

pub fn save<S: SnapshotStore + ?Sized>(
    store: &mut S,
    state: &ScheduleState,
    period: YearMonth,
) -> Result<(), PersistenceError> {
    store.write_all(vec![
        (ASSIGNMENTS_KEY, serde_json::to_string(state.assignments())?),
        (REPORTING_KEY, serde_json::to_string(state.reporting())?),
        (OVERRIDES_KEY, serde_json::to_string(state.overrides())?),
        (SELECTED_MONTH_KEY, period.month().to_string()),
        (SELECTED_YEAR_KEY, period.year().to_string()),
    ])
}

/// Restores the session; missing or unreadable entries fall back to empty.
pub fn load<S: SnapshotStore + ?Sized>(store: &S) -> RestoredSession {
    let assignments: BTreeMap<WeekKey, Vec<Employee>> = read_json(store, ASSIGNMENTS_KEY);
    let reporting: BTreeSet<ReportingKey> = read_json(store, REPORTING_KEY);
    let overrides: BTreeMap<WeekKey, BTreeMap<EmployeeId, Employee>> =
        read_json(store, OVERRIDES_KEY);

    let month = store
        .read(SELECTED_MONTH_KEY)
        .and_then(|raw| raw.trim().parse::<u32>().ok());
    let year = store
        .read(SELECTED_YEAR_KEY)
        .and_then(|raw| raw.trim().parse::<i32>().ok());
    let period = match (year, month) {
        (Some(year), Some(month)) => YearMonth::new(year, month).ok(),
        _ => None,
    };

    RestoredSession {
        state: ScheduleState::from_parts(assignments, reporting, overrides),
        period,
    }
}

fn read_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: SnapshotStore + ?Sized,
{
    let Some(raw) = store.read(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable snapshot entry");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{GroupDocument, MemberDocument, RosterCatalog, RosterDocument};

    fn catalog() -> RosterCatalog {
        RosterCatalog::from_document(RosterDocument {
            title: "Snapshot".to_string(),
            groups: vec![GroupDocument {
                name: "Alpha".to_string(),
                members: vec![
                    MemberDocument {
                        id: EmployeeId::new("e1"),
                        name: "Eva Novak".to_string(),
                        phone: None,
                        personnel_number: Some("1001".to_string()),
                    },
                    MemberDocument {
                        id: EmployeeId::new("e2"),
                        name: "Jan Kral".to_string(),
                        phone: None,
                        personnel_number: None,
                    },
                ],
            }],
            signatories: Default::default(),
            holidays: Vec::new(),
        })
        .expect("valid catalog")
    }

    #[test]
    fn state_survives_a_save_load_cycle() {
        let catalog = catalog();
        let week: WeekKey = "2025-W45".parse().expect("week");
        let alpha = catalog.group("Alpha").expect("group");
        let mut state = ScheduleState::default();
        state.assign_group(week, alpha);
        state.toggle_reporting(week, &alpha.members[1].id);
        state
            .set_override(week, &alpha.members[0].id, &alpha.members[1])
            .expect("override accepted");

        let period = YearMonth::new(2025, 11).expect("month");
        let mut store = MemorySnapshotStore::default();
        save(&mut store, &state, period).expect("saves");

        assert_eq!(
            store.read(SELECTED_MONTH_KEY).as_deref(),
            Some("11"),
            "month stored as plain text"
        );
        let restored = load(&store);
        assert_eq!(restored.state, state);
        assert_eq!(restored.period, Some(period));
    }

    #[test]
    fn corrupt_entries_default_to_empty() {
        let mut store = MemorySnapshotStore::default();
        store
            .write(ASSIGNMENTS_KEY, "{not json".to_string())
            .expect("memory write");
        store
            .write(REPORTING_KEY, r#"[["2025-W45","e1"]]"#.to_string())
            .expect("memory write");
        store
            .write(SELECTED_MONTH_KEY, "thirteen".to_string())
            .expect("memory write");

        let restored = load(&store);
        assert!(restored.state.assignments().is_empty());
        assert_eq!(restored.state.reporting().len(), 1);
        assert_eq!(restored.period, None);
    }
}
