use crate::calendar::{WeekKey, YearMonth};
use crate::roster::{EmployeeId, GroupDocument, MemberDocument, RosterCatalog, RosterDocument};
use crate::schedule::Slot;

pub(super) fn member(id: &str, name: &str) -> MemberDocument {
    MemberDocument {
        id: EmployeeId::new(id),
        name: name.to_string(),
        phone: Some(format!("+421 900 {id}")),
        personnel_number: Some(format!("P-{id}")),
    }
}

pub(super) fn catalog() -> RosterCatalog {
    RosterCatalog::from_document(RosterDocument {
        title: "Test schedule".to_string(),
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
    .expect("test catalog is valid")
}

pub(super) fn week(raw: &str) -> WeekKey {
    raw.parse().expect("valid week key")
}

pub(super) fn november() -> YearMonth {
    YearMonth::new(2025, 11).expect("valid month")
}

pub(super) fn slot(raw_week: &str, employee: &str) -> Slot {
    Slot::new(week(raw_week), employee)
}

pub(super) fn ids(members: &[crate::roster::Employee]) -> Vec<&str> {
    members.iter().map(|e| e.id.as_str()).collect()
}
