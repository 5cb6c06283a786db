use cohort_timeline::algorithm::{thin_batch, thin_events, thin_series};
use cohort_timeline::models::{SubjectId, ThinnedSeries};
use cohort_timeline::{DateFormatConfig, TableColumns, ThinningConfig};

use crate::utils::{date_values, event_batch, int64_values, offsets, subject_events};

/// A zero threshold keeps the sorted unique series unchanged
#[test]
fn test_zero_threshold_round_trip() {
    let dates = offsets(&[40, 3, 0, 3, 17, 40, 1]);
    let series = thin_series(SubjectId::Int(1), &dates, 0);
    assert_eq!(series.dates, offsets(&[0, 1, 3, 17, 40]));
}

/// Unit gaps with threshold k - 1 keep the first date and force one more keep
#[test]
fn test_chain_pruning_bound() {
    for k in 2..=12_i64 {
        let threshold = k - 1;
        let days: Vec<i64> = (0..=k).collect();
        let series = thin_series(SubjectId::Int(1), &offsets(&days), threshold);

        assert_eq!(series.dates[0], offsets(&[0])[0]);
        assert!(series.dates.contains(&offsets(&[k])[0]));

        let bound = (k + threshold - 1) / threshold + 1;
        assert!(series.dates.len() as i64 <= bound, "k = {k}");
    }
}

#[test]
fn test_output_is_ordered_subsequence() {
    let dates = offsets(&[0, 4, 9, 15, 16, 30, 31, 32, 90]);
    let series = thin_series(SubjectId::Int(1), &dates, 7);
    assert!(series.dates.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(series.dates.iter().all(|d| dates.contains(d)));
    assert_eq!(series.dates, offsets(&[0, 9, 30, 90]));
}

#[test]
fn test_thin_events_per_subject() {
    let mut events = subject_events(2, &offsets(&[0, 1, 2, 3]));
    events.extend(subject_events(1, &offsets(&[0, 100])));
    let series = thin_events(&events, &ThinningConfig::new(10));

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].subject_id, SubjectId::Int(1));
    assert_eq!(series[0].dates, offsets(&[0, 100]));
    assert_eq!(series[1].dates, offsets(&[0]));
}

#[test]
fn test_thin_batch() {
    let batch = event_batch(
        vec![5, 5, 5, 6],
        vec!["2020-01-01", "2020-01-02", "2020-03-01", "2020-01-01"],
        vec![None, None, None, None],
    );
    let thinned = thin_batch(
        &batch,
        &TableColumns::default(),
        &DateFormatConfig::default(),
        &ThinningConfig::new(30),
    )
    .unwrap();

    assert_eq!(int64_values(&thinned, "subject_id"), vec![5, 5, 6]);
    assert_eq!(
        date_values(&thinned, "date"),
        offsets(&[0, 60, 0])
    );
}

#[test]
fn test_empty_table() {
    let batch = ThinnedSeries::to_record_batch(&[], "subject_id", "date").unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert!(thin_events(&[], &ThinningConfig::new(5)).is_empty());
}
