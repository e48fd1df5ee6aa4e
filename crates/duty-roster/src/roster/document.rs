use super::{Employee, EmployeeId, Signatories};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// On-disk shape of the roster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterDocument {
    #[serde(default = "default_title")]
    pub title: String,
    pub groups: Vec<GroupDocument>,
    #[serde(default)]
    pub signatories: Signatories,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDocument {
    pub name: String,
    pub members: Vec<MemberDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDocument {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub personnel_number: Option<String>,
}

impl MemberDocument {
    pub(super) fn into_employee(self, group_name: &str) -> Employee {
        Employee {
            id: self.id,
            name: self.name,
            phone: self.phone.filter(|phone| !phone.trim().is_empty()),
            personnel_number: self
                .personnel_number
                .filter(|number| !number.trim().is_empty()),
            group_name: group_name.to_string(),
        }
    }
}

fn default_title() -> String {
    "On-call duty schedule".to_string()
}
