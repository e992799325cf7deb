use pollBot::error::PollError;
use pollBot::models::date::{DateToken, SpecItem};
use pollBot::service::date_spec;
use pollBot::service::message_log::MessageLog;

fn date(s: &str) -> DateToken {
    s.parse().unwrap()
}

#[test]
fn single_date_parses() {
    let log = MessageLog::new();
    let spec = date_spec::parse("2024/05/01", &log).unwrap();
    assert_eq!(spec.items(), &[SpecItem::Date(date("2024/05/01"))]);
}

#[test]
fn date_range_expands_day_by_day_inclusive() {
    let log = MessageLog::new();
    let spec = date_spec::parse("2024/02/27:2024/03/02", &log).unwrap();
    let expected: Vec<SpecItem> = [
        "2024/02/27",
        "2024/02/28",
        "2024/02/29", // leap year
        "2024/03/01",
        "2024/03/02",
    ]
    .iter()
    .map(|s| SpecItem::Date(date(s)))
    .collect();
    assert_eq!(spec.items(), expected.as_slice());
}

#[test]
fn date_range_logs_a_trace_line() {
    let log = MessageLog::new();
    date_spec::parse("2024/05/01:2024/05/03", &log).unwrap();
    let messages = log.into_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("added date range 2024/05/01 to 2024/05/03"));
}

#[test]
fn descending_date_range_is_rejected() {
    let log = MessageLog::new();
    let err = date_spec::parse("2024/05/03:2024/05/01", &log).unwrap_err();
    assert!(matches!(err, PollError::InvalidDate { .. }));
}

#[test]
fn index_range_expands_to_the_inclusive_span() {
    let log = MessageLog::new();
    let spec = date_spec::parse("1:3", &log).unwrap();
    assert_eq!(
        spec.items(),
        &[SpecItem::Index(1), SpecItem::Index(2), SpecItem::Index(3)]
    );
}

#[test]
fn negative_index_range_expands_ascending() {
    let log = MessageLog::new();
    let spec = date_spec::parse("-3:-1", &log).unwrap();
    assert_eq!(
        spec.items(),
        &[SpecItem::Index(-3), SpecItem::Index(-2), SpecItem::Index(-1)]
    );
}

#[test]
fn descending_index_range_is_rejected() {
    let log = MessageLog::new();
    let err = date_spec::parse("3:1", &log).unwrap_err();
    assert!(matches!(err, PollError::InvalidDate { .. }));
}

#[test]
fn bare_signed_integers_are_indices() {
    let log = MessageLog::new();
    let spec = date_spec::parse("0,-1", &log).unwrap();
    assert_eq!(spec.items(), &[SpecItem::Index(0), SpecItem::Index(-1)]);
}

#[test]
fn duplicates_collapse_to_first_occurrence() {
    let log = MessageLog::new();
    let spec = date_spec::parse("2024/01/01,2024/01/01,2024/01/02", &log).unwrap();
    assert_eq!(
        spec.items(),
        &[
            SpecItem::Date(date("2024/01/01")),
            SpecItem::Date(date("2024/01/02")),
        ]
    );
}

#[test]
fn overlapping_ranges_also_deduplicate() {
    let log = MessageLog::new();
    let spec = date_spec::parse("2024/01/01:2024/01/03,2024/01/02:2024/01/04", &log).unwrap();
    assert_eq!(spec.len(), 4);
}

#[test]
fn garbage_part_fails_with_the_offending_value() {
    let log = MessageLog::new();
    let err = date_spec::parse("not-a-date", &log).unwrap_err();
    match err {
        PollError::InvalidDate { value } => assert_eq!(value, "not-a-date"),
        other => panic!("expected InvalidDate, got {:?}", other),
    }
}

#[test]
fn parse_is_all_or_nothing() {
    let log = MessageLog::new();
    assert!(date_spec::parse("2024/01/01,bogus", &log).is_err());
}

#[test]
fn impossible_calendar_day_is_rejected() {
    let log = MessageLog::new();
    assert!(date_spec::parse("2024/02/30", &log).is_err());
}

#[test]
fn mixed_range_endpoints_are_rejected() {
    let log = MessageLog::new();
    assert!(date_spec::parse("2024/01/01:3", &log).is_err());
}

#[test]
fn whitespace_around_parts_is_tolerated() {
    let log = MessageLog::new();
    let spec = date_spec::parse(" 2024/05/01 , 2 ", &log).unwrap();
    assert_eq!(
        spec.items(),
        &[SpecItem::Date(date("2024/05/01")), SpecItem::Index(2)]
    );
}
