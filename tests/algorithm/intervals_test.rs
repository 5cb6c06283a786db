use cohort_timeline::algorithm::{aggregate_dates, generate_intervals, intervals_for_group};
use cohort_timeline::models::{DateGroup, IntervalRecord, SubjectId};
use cohort_timeline::IntervalConfig;

use crate::utils::{offsets, string_values, subject_events, ymd};

fn group(n: usize) -> DateGroup {
    let days: Vec<i64> = (0..n as i64).map(|i| i * 30).collect();
    DateGroup::from_dates(SubjectId::Int(1), offsets(&days)).unwrap()
}

/// n unique dates give n - 1 intervals, plus the longest one when n > 2
#[test]
fn test_interval_counts() {
    let plain = IntervalConfig::default();
    let longest = IntervalConfig::default().with_longest(true);

    for n in 1..=6 {
        let group = group(n);
        assert_eq!(intervals_for_group(&group, &plain).len(), n.saturating_sub(1));

        let expected = if n > 2 { n } else { n.saturating_sub(1) };
        assert_eq!(intervals_for_group(&group, &longest).len(), expected);
    }
}

#[test]
fn test_longest_interval_is_last() {
    let records = intervals_for_group(&group(4), &IntervalConfig::default().with_longest(true));
    let last = records.last().unwrap();
    assert_eq!(last.date1, offsets(&[0])[0]);
    assert_eq!(last.date2, offsets(&[90])[0]);
    assert_eq!(last.label, "1_20200101_20200331");
}

#[test]
fn test_labels_and_lengths() {
    let events = subject_events(42, &[ymd(2021, 1, 1), ymd(2020, 1, 1)]);
    let records = generate_intervals(&aggregate_dates(&events), &IntervalConfig::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, "42_20200101_20210101");
    assert!((records[0].length_years - 366.0 / 365.0).abs() < 1e-12);

    let rounded = generate_intervals(
        &aggregate_dates(&events),
        &IntervalConfig::default().with_decimal_places(2),
    );
    assert_eq!(rounded[0].length_years, 1.0);
}

#[test]
fn test_subject_order_and_table() {
    let mut events = subject_events(3, &offsets(&[0, 10]));
    events.extend(subject_events(1, &offsets(&[0, 5, 20])));
    let records = generate_intervals(&aggregate_dates(&events), &IntervalConfig::default());

    let subjects: Vec<_> = records.iter().map(|r| r.subject_id.clone()).collect();
    assert_eq!(
        subjects,
        vec![SubjectId::Int(1), SubjectId::Int(1), SubjectId::Int(3)]
    );

    let batch = IntervalRecord::to_record_batch(&records, "pt_id").unwrap();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(
        string_values(&batch, "interval"),
        vec!["1_20200101_20200106", "1_20200106_20200121", "3_20200101_20200111"]
    );
    assert!(batch.column_by_name("interval_length_yrs").is_some());
}
