//! Read-only catalog of employees, duty groups and signatories.

mod document;

pub use document::{GroupDocument, MemberDocument, RosterDocument};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personnel_number: Option<String>,
    pub group_name: String,
}

/// Ordered members of a duty group. Member order drives both rotation and the
/// daily on-call cycle within a week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub members: Vec<Employee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatories {
    #[serde(default)]
    pub approver: Option<Signatory>,
    #[serde(default)]
    pub endorser: Option<Signatory>,
}

/// Failure to load the roster configuration. Fatal for the session: mutating
/// actions stay disabled until a valid roster is supplied.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed roster configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("roster configuration defines no groups")]
    NoGroups,
    #[error("group '{0}' has no members")]
    EmptyGroup(String),
    #[error("group '{0}' is defined more than once")]
    DuplicateGroup(String),
    #[error("employee id '{0}' is used more than once")]
    DuplicateEmployee(EmployeeId),
}

#[derive(Debug, Clone)]
pub struct RosterCatalog {
    title: String,
    groups: Vec<Group>,
    signatories: Signatories,
    holidays: BTreeSet<NaiveDate>,
}

impl RosterCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let file = std::fs::File::open(path.as_ref())?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            groups = catalog.groups.len(),
            "roster configuration loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RosterError> {
        let document: RosterDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_document(document: RosterDocument) -> Result<Self, RosterError> {
        if document.groups.is_empty() {
            return Err(RosterError::NoGroups);
        }

        let mut group_names = HashSet::new();
        let mut employee_ids = HashSet::new();
        let mut groups = Vec::with_capacity(document.groups.len());

        for group in document.groups {
            if !group_names.insert(group.name.clone()) {
                return Err(RosterError::DuplicateGroup(group.name));
            }
            if group.members.is_empty() {
                return Err(RosterError::EmptyGroup(group.name));
            }

            let mut members = Vec::with_capacity(group.members.len());
            for member in group.members {
                if !employee_ids.insert(member.id.clone()) {
                    return Err(RosterError::DuplicateEmployee(member.id));
                }
                members.push(member.into_employee(&group.name));
            }

            groups.push(Group {
                name: group.name,
                members,
            });
        }

        Ok(Self {
            title: document.title,
            groups,
            signatories: document.signatories,
            holidays: document.holidays.into_iter().collect(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.name == name)
    }

    /// All employees, grouped in configuration order.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.groups.iter().flat_map(|group| group.members.iter())
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees().find(|employee| &employee.id == id)
    }

    pub fn signatories(&self) -> &Signatories {
        &self.signatories
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}
