use chrono::NaiveDate;
use duty_roster::calendar::{WeekKey, YearMonth};
use duty_roster::roster::EmployeeId;
use duty_roster::schedule::Slot;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_week(raw: &str) -> Result<WeekKey, String> {
    raw.parse()
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-Www ({err})"))
}

pub(crate) fn parse_month(raw: &str) -> Result<YearMonth, String> {
    let invalid = || format!("failed to parse '{raw}' as YYYY-MM");
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    YearMonth::new(year, month).map_err(|err| format!("{} ({err})", invalid()))
}

/// `2025-W45:e1` names employee `e1` as shown in week 45 of 2025.
pub(crate) fn parse_slot(raw: &str) -> Result<Slot, String> {
    let (week, employee) = raw
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("failed to parse '{raw}' as WEEK:EMPLOYEE"))?;
    if employee.trim().is_empty() {
        return Err(format!("slot '{raw}' is missing an employee id"));
    }
    Ok(Slot::new(parse_week(week)?, employee.trim()))
}

pub(crate) fn parse_employee(raw: &str) -> Result<EmployeeId, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err("employee id must not be empty".to_string())
    } else {
        Ok(EmployeeId::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_parse_week_and_employee() {
        let slot = parse_slot("2025-W45:e1").expect("slot parses");
        assert_eq!(slot.week.to_string(), "2025-W45");
        assert_eq!(slot.employee.as_str(), "e1");

        assert!(parse_slot("2025-W45").is_err());
        assert!(parse_slot("2025-W45:").is_err());
        assert!(parse_slot("2025-W60:e1").is_err());
    }

    #[test]
    fn months_parse_as_year_dash_month() {
        let period = parse_month("2025-11").expect("month parses");
        assert_eq!(period.to_string(), "November 2025");
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("November").is_err());
    }
}
