use chrono::NaiveDate;
use duty_roster::calendar::{WeekKey, YearMonth};
use duty_roster::config::ScheduleConfig;
use duty_roster::persistence::FileSnapshotStore;
use duty_roster::roster::{EmployeeId, RosterCatalog};
use duty_roster::schedule::{CreditPolicy, Slot};
use duty_roster::session::{NoticeLevel, Session};
use std::path::PathBuf;

const ROSTER: &str = r#"{
    "groups": [
        { "name": "Alpha", "members": [ { "id": "e1", "name": "Eva Novak" }, { "id": "e2", "name": "Jan Kral" } ] },
        { "name": "Bravo", "members": [ { "id": "e3", "name": "Ivan Bela" }, { "id": "e4", "name": "Lucia Mraz" } ] },
        { "name": "Charlie", "members": [ { "id": "e5", "name": "Peter Sova" } ] }
    ]
}"#;

fn state_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("duty-roster-session-{}-{name}", std::process::id()))
        .join("roster-state.json");
    let _ = std::fs::remove_file(&path);
    path
}

fn catalog() -> RosterCatalog {
    RosterCatalog::from_reader(ROSTER.as_bytes()).expect("roster parses")
}

fn week(raw: &str) -> WeekKey {
    raw.parse().expect("valid week")
}

fn open(path: &PathBuf, settings: ScheduleConfig) -> Session<FileSnapshotStore> {
    Session::open(
        Ok(catalog()),
        FileSnapshotStore::open(path),
        settings,
        NaiveDate::from_ymd_opt(2025, 11, 12).expect("valid date"),
    )
}

#[test]
fn edits_survive_a_restart() {
    let path = state_path("restart");
    let mut session = open(&path, ScheduleConfig::default());
    assert_eq!(session.catalog().map(|c| c.title()), Some("On-call duty schedule"));

    session.drop_group(week("2025-W45"), "Alpha");
    session.toggle_reporting(Slot::new(week("2025-W46"), "e3"));
    let notice = session.set_override(
        week("2025-W45"),
        &EmployeeId::new("e2"),
        &EmployeeId::new("e5"),
    );
    assert_eq!(notice.level, NoticeLevel::Success);
    session.select_period(YearMonth::new(2025, 12).expect("valid month"));

    let restarted = open(&path, ScheduleConfig::default());
    assert_eq!(restarted.state(), session.state());
    assert_eq!(restarted.period(), YearMonth::new(2025, 12).expect("valid month"));
    assert!(restarted
        .state()
        .is_reporting(week("2025-W46"), &EmployeeId::new("e3")));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn swapping_a_substitute_moves_the_displayed_person() {
    let path = state_path("substitute-swap");
    let mut session = open(
        &path,
        ScheduleConfig {
            auto_rotation: false,
            credit_policy: CreditPolicy::OnCall,
        },
    );
    session.drop_group(week("2025-W45"), "Alpha");
    session.drop_group(week("2025-W46"), "Bravo");
    session.set_override(week("2025-W45"), &EmployeeId::new("e1"), &EmployeeId::new("e5"));

    session.swap(Slot::new(week("2025-W45"), "e5"));
    let notice = session.swap(Slot::new(week("2025-W46"), "e4"));
    assert_eq!(notice.level, NoticeLevel::Success);

    let w45: Vec<&str> = session
        .state()
        .week(week("2025-W45"))
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    let w46: Vec<&str> = session
        .state()
        .week(week("2025-W46"))
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(w45, vec!["e4", "e2"]);
    assert_eq!(w46, vec!["e3", "e5"]);
    assert!(session.state().overrides().is_empty());

    let month = session.derive().expect("catalog loaded");
    let monday = month
        .day(NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date"))
        .expect("day derived");
    assert_eq!(
        monday.on_call().map(|o| o.employee.id.as_str()),
        Some("e4")
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn failed_swap_consumes_the_selection() {
    let path = state_path("failed-swap");
    let mut session = open(&path, ScheduleConfig::default());
    session.drop_group(week("2025-W45"), "Alpha");

    session.swap(Slot::new(week("2025-W45"), "e1"));
    let notice = session.swap(Slot::new(week("2025-W40"), "e9"));
    assert!(notice.is_error());
    assert!(session.selection().is_idle());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn cadence_rotation_stays_within_the_target_year() {
    let path = state_path("cadence");
    let mut session = open(&path, ScheduleConfig::default());
    session.select_period(YearMonth::new(2025, 12).expect("valid month"));

    let notice = session.rotate_every(week("2025-W50"), "Alpha", 3);
    assert_eq!(notice.level, NoticeLevel::Success);
    assert!(session.state().is_assigned(week("2025-W50")));
    assert!(session.state().is_assigned(week("2026-W01")));
    assert!(session.state().is_assigned(week("2026-W04")));
    assert!(!session.state().is_assigned(week("2026-W07")));

    assert!(session.rotate_every(week("2025-W50"), "Alpha", 0).is_error());
    assert!(session.rotate_every(week("2025-W50"), "Delta", 2).is_error());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn rejected_cadence_leaves_start_week_empty() {
    let path = state_path("cadence-rejected");
    let mut session = open(&path, ScheduleConfig::default());
    session.select_period(YearMonth::new(2025, 12).expect("valid month"));

    assert!(session.rotate_every(week("2025-W50"), "Alpha", 0).is_error());
    assert!(!session.state().is_assigned(week("2025-W50")));
    assert!(session.state().is_empty());

    let reopened = open(&path, ScheduleConfig::default());
    assert!(!reopened.state().is_assigned(week("2025-W50")));
    let _ = std::fs::remove_file(&path);
}
