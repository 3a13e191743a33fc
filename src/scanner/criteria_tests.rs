use chrono::{Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn time_field_parses_plain_tags() {
    assert_eq!("modified".parse::<TimeField>().unwrap(), TimeField::Modified);
    assert_eq!("Accessed".parse::<TimeField>().unwrap(), TimeField::Accessed);
    assert_eq!("created".parse::<TimeField>().unwrap(), TimeField::Created);
}

#[test]
fn time_field_parses_legacy_tag_with_label() {
    let field: TimeField = "accessed|Last access time".parse().unwrap();
    assert_eq!(field, TimeField::Accessed);
}

#[test]
fn time_field_rejects_unknown() {
    assert!("changed".parse::<TimeField>().is_err());
}

#[test]
fn time_field_serde_uses_lowercase_tags() {
    let json = serde_json::to_string(&TimeField::Created).unwrap();
    assert_eq!(json, "\"created\"");
    let back: TimeField = serde_json::from_str("\"modified|label\"").unwrap();
    assert_eq!(back, TimeField::Modified);
}

#[test]
fn parse_date_accepts_iso_dates() {
    assert_eq!(parse_date(" 2023-06-01 ").unwrap(), date(2023, 6, 1));
}

#[test]
fn parse_date_rejects_garbage() {
    let err = parse_date("01.06.2023").unwrap_err();
    assert!(matches!(err, ArchiverError::InvalidDate { .. }));
}

#[test]
fn for_days_spans_whole_days() {
    let criteria = ScanCriteria::for_days(
        Path::new("/data"),
        TimeField::Modified,
        date(2023, 1, 1),
        date(2023, 12, 31),
    )
    .unwrap();

    let start = criteria.window_start();
    assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
    let end = criteria.window_end();
    assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
}

#[test]
fn inverted_window_is_rejected() {
    let err = ScanCriteria::for_days(
        Path::new("/data"),
        TimeField::Modified,
        date(2024, 2, 1),
        date(2024, 1, 1),
    )
    .unwrap_err();
    assert!(matches!(err, ArchiverError::InvalidWindow { .. }));
}

#[test]
fn single_day_window_is_valid() {
    let day = date(2024, 3, 15);
    assert!(ScanCriteria::for_days(Path::new("/data"), TimeField::Modified, day, day).is_ok());
}

#[test]
fn contains_is_inclusive_on_both_ends() {
    let criteria = ScanCriteria::for_days(
        Path::new("/data"),
        TimeField::Modified,
        date(2023, 1, 1),
        date(2023, 12, 31),
    )
    .unwrap();

    assert!(criteria.contains(criteria.window_start()));
    assert!(criteria.contains(criteria.window_end()));
    assert!(!criteria.contains(criteria.window_start() - Duration::microseconds(1)));
    assert!(!criteria.contains(criteria.window_end() + Duration::microseconds(1)));
}

#[test]
fn source_root_is_normalized() {
    let criteria = ScanCriteria::for_days(
        Path::new("/data/./inbox/../docs"),
        TimeField::Modified,
        date(2023, 1, 1),
        date(2023, 1, 2),
    )
    .unwrap();
    assert!(criteria.source_root().ends_with("docs"));
    assert!(!criteria.source_root().to_string_lossy().contains(".."));
}

#[test]
fn last_days_counts_back_from_today() {
    let (start, end) = last_days(date(2024, 3, 1), 365);
    assert_eq!(start, date(2023, 3, 2));
    assert_eq!(end, date(2024, 3, 1));
}

#[test]
fn this_year_starts_on_january_first() {
    let (start, end) = this_year(date(2024, 8, 20));
    assert_eq!(start, date(2024, 1, 1));
    assert_eq!(end, date(2024, 8, 20));
}

#[test]
fn window_start_inside_dst_gap_moves_past_the_gap() {
    let offset = FixedOffset::east_opt(3600).unwrap();
    let gap_day = date(2023, 3, 26);
    // Midnight to 01:00 does not exist on `gap_day`.
    let resolve = |naive: &NaiveDateTime| {
        if naive.date() == gap_day && naive.hour() == 0 {
            LocalResult::None
        } else {
            offset.from_local_datetime(naive)
        }
    };

    let start = first_valid_instant(gap_day.and_time(NaiveTime::MIN), resolve).unwrap();

    assert_eq!(start.naive_local(), gap_day.and_hms_opt(1, 0, 0).unwrap());
    assert_eq!(start.offset(), &offset);
}

#[test]
fn valid_local_time_is_kept_as_is() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let midnight = date(2023, 6, 1).and_time(NaiveTime::MIN);

    let start = first_valid_instant(midnight, |naive| offset.from_local_datetime(naive)).unwrap();

    assert_eq!(start.naive_local(), midnight);
}
