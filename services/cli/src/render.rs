use duty_roster::calendar::{format_full, weekday_abbreviation};
use duty_roster::persistence::FileSnapshotStore;
use duty_roster::schedule::{DayKind, MonthDuty};
use duty_roster::session::Session;
use chrono::Datelike;

pub(crate) fn print_weeks(session: &Session<FileSnapshotStore>) {
    let state = session.state();
    println!("{}", session.period());
    if session.is_read_only() {
        println!("(read-only: roster configuration not loaded)");
    }

    for week in session.weeks() {
        println!(
            "\n{} ({})  {} {}  [{} day(s) in month]",
            week.label(),
            week.key,
            week.display_range(),
            week.weekday_range(),
            week.days_in_month
        );

        let raw = state.week(week.key);
        if raw.is_empty() {
            println!("  - unassigned");
            continue;
        }

        for assigned in raw {
            let shown = state.override_for(week.key, &assigned.id).unwrap_or(assigned);
            let mut line = format!("  - {} ({})", shown.name, shown.id);
            if shown.id != assigned.id {
                line.push_str(&format!(" standing in for {}", assigned.name));
            }
            if state.is_reporting(week.key, &shown.id) {
                line.push_str(" [reporting]");
            }
            if let Some(phone) = &shown.phone {
                line.push_str(&format!(" | {phone}"));
            }
            println!("{line}");
        }
    }
}

pub(crate) fn print_days(month: &MonthDuty) {
    println!("\nDaily on-call ({} credit)", month.policy);
    for day in &month.days {
        let marker = match day.kind {
            DayKind::Weekday => ' ',
            DayKind::WeekendOrHoliday => '*',
        };
        let on_call = day
            .on_call()
            .map(|occupant| occupant.employee.name.as_str())
            .unwrap_or("-");
        println!(
            "{marker} {} {}  {:>2}h  {}",
            format_full(day.date),
            weekday_abbreviation(day.date.weekday()),
            day.kind.hours(),
            on_call
        );
    }
}

pub(crate) fn print_tallies(month: &MonthDuty) {
    println!("Duty tally for {} ({} credit)", month.period, month.policy);
    println!(
        "{:<24} {:>8} {:>8} {:>8} {:>8} {:>7}",
        "Employee", "wd days", "we days", "wd h", "we h", "total"
    );
    for tally in month.tallies.iter().filter(|tally| !tally.dates.is_empty()) {
        println!(
            "{:<24} {:>8} {:>8} {:>8} {:>8} {:>7}",
            tally.employee.name,
            tally.weekday_days,
            tally.weekend_days,
            tally.weekday_hours,
            tally.weekend_hours,
            tally.total_hours()
        );
    }
}
