use arrow::datatypes::DataType;
use cohort_timeline::algorithm::{aggregate_dates, aggregate_dates_from_batch};
use cohort_timeline::models::{DateGroup, Event, SubjectId, count_by_subject};
use cohort_timeline::{CohortError, DateFormatConfig, TableColumns};

use crate::utils::{event_batch, int64_values, offsets, subject_events, ymd};

/// Every group holds strictly ascending unique dates
#[test]
fn test_dates_unique_and_ascending() {
    let mut events = subject_events(2, &offsets(&[30, 0, 30, 10, 0]));
    events.extend(subject_events(1, &offsets(&[5, 5, 5])));
    events.extend(subject_events(3, &offsets(&[400, 1, 200, 1])));

    let groups = aggregate_dates(&events);
    assert_eq!(groups.len(), 3);

    for group in &groups {
        assert!(group.dates.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(group.count, group.dates.len());
        assert_eq!(group.first_date, group.dates[0]);
        assert_eq!(group.last_date, *group.dates.last().unwrap());
        assert_eq!(
            group.span_days,
            (group.last_date - group.first_date).num_days()
        );
    }

    let ids: Vec<_> = groups.iter().map(|g| g.subject_id.clone()).collect();
    assert_eq!(ids, vec![SubjectId::Int(1), SubjectId::Int(2), SubjectId::Int(3)]);
    assert_eq!(groups[1].dates, offsets(&[0, 10, 30]));
    assert_eq!(groups[0].span_days, 0);
}

#[test]
fn test_mixed_subject_ordering() {
    let events = vec![
        Event::new("b", ymd(2020, 1, 1)),
        Event::new(7_i64, ymd(2020, 1, 1)),
        Event::new("a", ymd(2020, 1, 1)),
        Event::new(-3_i64, ymd(2020, 1, 1)),
    ];
    let groups = aggregate_dates(&events);
    let ids: Vec<String> = groups.iter().map(|g| g.subject_id.to_string()).collect();
    assert_eq!(ids, vec!["-3", "7", "a", "b"]);

    let batch = DateGroup::to_record_batch(&groups, "subject_id").unwrap();
    assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);
}

#[test]
fn test_aggregate_from_batch() {
    let batch = event_batch(
        vec![1, 1, 2, 1],
        vec!["2020-03-01", "2020-01-01", "2020-02-01", "2020-03-01"],
        vec![None, Some(1.0), None, None],
    );
    let groups =
        aggregate_dates_from_batch(&batch, &TableColumns::default(), &DateFormatConfig::default())
            .unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].dates, vec![ymd(2020, 1, 1), ymd(2020, 3, 1)]);
    assert_eq!(groups[0].span_days, 60);

    let table = DateGroup::to_record_batch(&groups, "subject_id").unwrap();
    let schema = table.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec!["subject_id", "first_date", "last_date", "date_count", "span_days", "unique_date_list"]
    );
    assert_eq!(int64_values(&table, "subject_id"), vec![1, 2]);
    assert_eq!(int64_values(&table, "span_days"), vec![60, 0]);
}

#[test]
fn test_malformed_date_fails_whole_batch() {
    let batch = event_batch(
        vec![1, 2],
        vec!["2020-01-01", "first of march"],
        vec![None, None],
    );
    let result =
        aggregate_dates_from_batch(&batch, &TableColumns::default(), &DateFormatConfig::default());
    assert!(matches!(result, Err(CohortError::MalformedDate { .. })));
}

#[test]
fn test_missing_date_column() {
    let batch = event_batch(vec![1], vec!["2020-01-01"], vec![None]);
    let columns = TableColumns::default().with_date("scan_date");
    let result = aggregate_dates_from_batch(&batch, &columns, &DateFormatConfig::default());
    assert!(matches!(result, Err(CohortError::ColumnNotFound { .. })));
}

#[test]
fn test_count_by_subject() {
    let mut events = subject_events(2, &offsets(&[0, 0, 1]));
    events.extend(subject_events(1, &offsets(&[0])));
    assert_eq!(
        count_by_subject(&events),
        vec![(SubjectId::Int(1), 1), (SubjectId::Int(2), 3)]
    );
}
