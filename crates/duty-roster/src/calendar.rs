//! ISO 8601 week arithmetic used to bucket calendar days into duty weeks.
//!
//! Duty is assigned per ISO week rather than per calendar month, so a week that
//! straddles two months resolves to the same [`WeekKey`] from either side.

use chrono::{Datelike, Duration, Month, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A month spans at most six ISO weeks.
pub const MAX_WEEKS_IN_MONTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid week key '{0}', expected YYYY-Www")]
    InvalidWeekKey(String),
    #[error("week {week} does not exist in ISO year {year}")]
    WeekOutOfRange { year: i32, week: u32 },
    #[error("{year}-{month:02} is not a valid calendar month")]
    InvalidMonth { year: i32, month: u32 },
}

/// Identifies one ISO week: the ISO year owning the week's Thursday plus the
/// week number inside that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Result<Self, CalendarError> {
        if week == 0 || week > weeks_in_year(year) {
            return Err(CalendarError::WeekOutOfRange { year, week });
        }
        Ok(Self { year, week })
    }

    /// The ISO week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn week(self) -> u32 {
        self.week
    }

    pub fn monday(self) -> NaiveDate {
        monday_of(self.week, self.year)
    }

    pub fn sunday(self) -> NaiveDate {
        self.monday() + Duration::days(6)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Moves `weeks` ISO weeks forward (or backward for negative values),
    /// crossing year boundaries as needed.
    pub fn offset(self, weeks: i64) -> Self {
        Self::of(self.monday() + Duration::weeks(weeks))
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = CalendarError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidWeekKey(raw.to_string());
        let (year, week) = raw.trim().split_once("-W").ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let week = week.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, week)
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Number of ISO weeks (52 or 53) in `year`. December 28th always falls in the
/// last week of its ISO year.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|date| date.iso_week().week())
        .unwrap_or(52)
}

/// Monday of ISO week `week` in `year`. January 4th is always in week 1.
pub fn monday_of(week: u32, year: i32) -> NaiveDate {
    let jan_fourth = NaiveDate::from_ymd_opt(year, 1, 4).unwrap_or(NaiveDate::MIN);
    let first_monday =
        jan_fourth - Duration::days(i64::from(jan_fourth.weekday().num_days_from_monday()));
    first_monday + Duration::weeks(i64::from(week.saturating_sub(1)))
}

/// A calendar month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CalendarError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day();
        self.first_day()
            .iter_days()
            .take_while(move |date| *date <= last)
    }

    /// English month name, e.g. "November".
    pub fn name(self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .map(|month| month.name())
            .unwrap_or("")
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

/// One ISO week overlapping a target month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekInfo {
    pub key: WeekKey,
    /// True Monday of the week, possibly in the previous month.
    pub start: NaiveDate,
    /// True Sunday of the week, possibly in the next month.
    pub end: NaiveDate,
    pub display_start: NaiveDate,
    pub display_end: NaiveDate,
    /// Days of the true range that fall inside the target month.
    pub days_in_month: u32,
}

impl WeekInfo {
    pub fn label(&self) -> String {
        format!("Week {}", self.key.week())
    }

    /// Month-clamped range for labels, e.g. "27.10. - 02.11." clips to
    /// "01.11. - 02.11." in November.
    pub fn display_range(&self) -> String {
        format!(
            "{} - {}",
            format_short(self.display_start),
            format_short(self.display_end)
        )
    }

    pub fn weekday_range(&self) -> String {
        format!(
            "{}-{}",
            weekday_abbreviation(self.display_start.weekday()),
            weekday_abbreviation(self.display_end.weekday())
        )
    }

    pub fn is_partial(&self) -> bool {
        self.days_in_month < 7
    }
}

/// Every ISO week overlapping `period`, starting from the Monday on or before
/// the first of the month.
pub fn weeks_in_month(period: YearMonth) -> Vec<WeekInfo> {
    let first = period.first_day();
    let last = period.last_day();
    let mut start = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));
    let mut weeks = Vec::with_capacity(MAX_WEEKS_IN_MONTH);

    while start <= last && weeks.len() < MAX_WEEKS_IN_MONTH {
        let end = start + Duration::days(6);
        let display_start = start.max(first);
        let display_end = end.min(last);
        let days_in_month = u32::try_from((display_end - display_start).num_days() + 1).unwrap_or(0);

        weeks.push(WeekInfo {
            key: WeekKey::of(start),
            start,
            end,
            display_start,
            display_end,
            days_in_month,
        });

        start += Duration::days(7);
    }

    weeks
}

pub fn format_short(date: NaiveDate) -> String {
    date.format("%d.%m.").to_string()
}

pub fn format_full(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub const fn weekday_abbreviation(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mo",
        Weekday::Tue => "tu",
        Weekday::Wed => "we",
        Weekday::Thu => "th",
        Weekday::Fri => "fr",
        Weekday::Sat => "sa",
        Weekday::Sun => "su",
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
