use super::ExportError;
use crate::calendar::{weeks_in_month, YearMonth};
use crate::roster::{RosterCatalog, Signatories};
use crate::schedule::ScheduleState;
use serde::Serialize;
use std::io::Write;

pub const UNASSIGNED_LABEL: &str = "Unassigned";
pub const REPORTING_NOTE: &str = "reporting";

/// One printable row: one per occupant per week, or a single placeholder row
/// for an unassigned week. Only the first row of a week carries the week
/// columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub week_label: String,
    pub date_range: String,
    pub weekday_range: String,
    pub name: String,
    pub phone: String,
    pub days_in_month: String,
    pub note: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleTable {
    pub title: String,
    pub period_label: String,
    pub rows: Vec<ScheduleRow>,
    pub signatories: Signatories,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Week")]
    week: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "Σ")]
    days: &'a str,
    #[serde(rename = "Note")]
    note: &'a str,
}

impl ScheduleTable {
    pub fn build(state: &ScheduleState, catalog: &RosterCatalog, period: YearMonth) -> Self {
        let mut rows = Vec::new();

        for week in weeks_in_month(period) {
            let occupants = state.effective_roster(week.key);
            let week_label = week.label();
            let date_range = week.display_range();
            let weekday_range = week.weekday_range();
            let days_in_month = week.days_in_month.to_string();

            if occupants.is_empty() {
                rows.push(ScheduleRow {
                    week_label,
                    date_range,
                    weekday_range,
                    name: UNASSIGNED_LABEL.to_string(),
                    phone: String::new(),
                    days_in_month,
                    note: String::new(),
                    highlighted: true,
                });
                continue;
            }

            for (index, employee) in occupants.into_iter().enumerate() {
                let first = index == 0;
                let note = if state.is_reporting(week.key, &employee.id) {
                    REPORTING_NOTE.to_string()
                } else {
                    String::new()
                };
                rows.push(ScheduleRow {
                    week_label: if first { week_label.clone() } else { String::new() },
                    date_range: if first { date_range.clone() } else { String::new() },
                    weekday_range: if first {
                        weekday_range.clone()
                    } else {
                        String::new()
                    },
                    name: employee.name.clone(),
                    phone: employee.phone.clone().unwrap_or_default(),
                    days_in_month: if first {
                        days_in_month.clone()
                    } else {
                        String::new()
                    },
                    note,
                    highlighted: first,
                });
            }
        }

        Self {
            title: catalog.title().to_string(),
            period_label: period.to_string(),
            rows,
            signatories: catalog.signatories().clone(),
        }
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            let date = if row.date_range.is_empty() {
                String::new()
            } else {
                format!("{}\n{}", row.date_range, row.weekday_range)
            };
            csv_writer.serialize(CsvRow {
                week: &row.week_label,
                date,
                name: &row.name,
                phone: &row.phone,
                days: &row.days_in_month,
                note: &row.note,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }

    /// Plain-text rendering for printing. Highlighted rows are prefixed with `*`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&self.period_label);
        out.push_str("\n\n");
        out.push_str(&format!(
            "  {:<9} {:<23} {:<24} {:<18} {:>2}  {}\n",
            "Week", "Date", "Name", "Phone", "Σ", "Note"
        ));

        for row in &self.rows {
            let marker = if row.highlighted { '*' } else { ' ' };
            let date = if row.date_range.is_empty() {
                String::new()
            } else {
                format!("{} {}", row.date_range, row.weekday_range)
            };
            out.push_str(&format!(
                "{marker} {:<9} {:<23} {:<24} {:<18} {:>2}  {}\n",
                row.week_label, date, row.name, row.phone, row.days_in_month, row.note
            ));
        }

        if let Some(endorser) = &self.signatories.endorser {
            out.push_str(&format!(
                "\nResponsible: {}, {}",
                endorser.name, endorser.title
            ));
        }
        if let Some(approver) = &self.signatories.approver {
            out.push_str(&format!("\nApproved by: {}, {}", approver.name, approver.title));
        }
        out.push('\n');
        out
    }

    /// Suggested download name, e.g. `Schedule_November_2025.csv`.
    pub fn file_name(period: YearMonth) -> String {
        format!("Schedule_{}_{}.csv", period.name(), period.year())
    }
}
