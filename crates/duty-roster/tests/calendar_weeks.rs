use chrono::{Datelike, Duration, Weekday};
use duty_roster::calendar::{monday_of, weeks_in_month, weeks_in_year, WeekKey, YearMonth};

fn months() -> impl Iterator<Item = YearMonth> {
    (2015..=2035).flat_map(|year| {
        (1..=12).map(move |month| YearMonth::new(year, month).expect("valid month"))
    })
}

#[test]
fn month_weeks_are_contiguous_and_cover_every_day() {
    for period in months() {
        let weeks = weeks_in_month(period);
        assert!(
            (4..=6).contains(&weeks.len()),
            "{period} produced {} weeks",
            weeks.len()
        );

        let first = &weeks[0];
        assert_eq!(first.start.weekday(), Weekday::Mon);
        assert!(first.start <= period.first_day());
        assert!(first.start + Duration::days(6) >= period.first_day());

        for pair in weeks.windows(2) {
            assert_eq!(pair[1].start - pair[0].start, Duration::days(7));
        }

        let covered: u32 = weeks.iter().map(|week| week.days_in_month).sum();
        assert_eq!(covered as usize, period.days().count(), "{period}");
        assert!(weeks.iter().all(|week| week.key == WeekKey::of(week.start)));
    }
}

#[test]
fn week_keys_round_trip_through_their_monday() {
    for year in 2015..=2035 {
        for week in 1..=weeks_in_year(year) {
            let monday = monday_of(week, year);
            assert_eq!(monday.weekday(), Weekday::Mon);

            let key = WeekKey::of(monday);
            assert_eq!((key.year(), key.week()), (year, week));
            let parsed: WeekKey = key.to_string().parse().expect("key parses");
            assert_eq!(parsed, key);
        }
    }
}

#[test]
fn november_2025_labels_match_the_printed_schedule() {
    let weeks = weeks_in_month(YearMonth::new(2025, 11).expect("valid month"));
    let labels: Vec<String> = weeks.iter().map(|week| week.label()).collect();
    assert_eq!(
        labels,
        vec!["Week 44", "Week 45", "Week 46", "Week 47", "Week 48"]
    );
    assert_eq!(weeks[0].display_range(), "01.11. - 02.11.");
    assert_eq!(weeks[0].weekday_range(), "sa-su");
    assert_eq!(weeks[0].days_in_month, 2);
    assert!(weeks[0].is_partial());
    assert_eq!(weeks[4].display_range(), "24.11. - 30.11.");
    assert!(!weeks[4].is_partial());
}

#[test]
fn malformed_keys_are_rejected() {
    for raw in ["2025-45", "2025-W00", "2025-W53", "abc", "2025-Wx1"] {
        assert!(raw.parse::<WeekKey>().is_err(), "{raw} should not parse");
    }
    assert!("2026-W53".parse::<WeekKey>().is_ok());
}

#[test]
fn every_date_falls_inside_its_week() {
    let first = chrono::NaiveDate::from_ymd_opt(2019, 12, 1).expect("valid date");
    let last = chrono::NaiveDate::from_ymd_opt(2027, 1, 31).expect("valid date");

    for date in first.iter_days().take_while(|date| *date <= last) {
        let key = WeekKey::of(date);
        let monday = monday_of(key.week(), key.year());
        assert!(monday <= date && date <= monday + Duration::days(6), "{date}");
        assert_eq!(WeekKey::of(date), key);
        assert!(key.contains(date));
    }
}
