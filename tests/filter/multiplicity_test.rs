use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use cohort_timeline::filter::{
    BatchFilter, MultiplicityFilter, remove_multiple_instances, retain_single_instance_subjects,
};
use cohort_timeline::utils::date_utils::to_date32;

use crate::utils::{event_batch, float64_values, int64_values, offsets, string_values};

/// A repeated (subject, date) pair removes every row of that subject
#[test]
fn test_duplicate_pair_excludes_subject() {
    let batch = event_batch(
        vec![1, 1, 1, 2, 2, 3],
        vec!["2020-01-01", "2020-01-01", "2020-02-01", "2020-01-01", "2020-02-01", "2020-01-01"],
        vec![Some(1.0), Some(1.5), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
    );
    let filtered = remove_multiple_instances(&batch, "subject_id", "date", "measurement").unwrap();

    assert_eq!(int64_values(&filtered, "subject_id"), vec![2, 2, 3]);
    assert_eq!(
        float64_values(&filtered, "measurement"),
        vec![Some(3.0), Some(4.0), Some(5.0)]
    );
    assert_eq!(filtered.schema(), batch.schema());
}

#[test]
fn test_distinct_pairs_fully_retained() {
    let batch = event_batch(
        vec![4, 4, 4],
        vec!["2020-01-01", "2020-01-02", "2020-01-03"],
        vec![Some(1.0), Some(2.0), Some(3.0)],
    );
    let filtered = MultiplicityFilter::new("subject_id", "date", "measurement")
        .filter(&batch)
        .unwrap();
    assert_eq!(filtered.num_rows(), 3);
}

#[test]
fn test_date32_and_text_keys() {
    let dates = offsets(&[0, 0, 5]);
    let schema = Arc::new(Schema::new(vec![
        Field::new("pt", DataType::Utf8, false),
        Field::new("scan", DataType::Date32, false),
        Field::new("diameter", DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec!["x", "y", "y"])),
            Arc::new(Date32Array::from(
                dates.iter().map(|d| to_date32(*d)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(vec![Some(40.0), Some(41.0), Some(42.0)])),
        ],
    )
    .unwrap();

    // Same date across different subjects is not a repeat
    let filter = MultiplicityFilter::new("pt", "scan", "diameter");
    assert_eq!(filter.required_columns().len(), 3);
    let filtered = filter.filter(&batch).unwrap();
    assert_eq!(string_values(&filtered, "pt"), vec!["x", "y", "y"]);
}

#[test]
fn test_group_without_value_excludes_subject() {
    let batch = event_batch(
        vec![1, 1, 2],
        vec!["2020-01-01", "2020-01-02", "2020-01-01"],
        vec![Some(1.0), None, Some(2.0)],
    );
    let filtered = remove_multiple_instances(&batch, "subject_id", "date", "measurement").unwrap();
    assert_eq!(int64_values(&filtered, "subject_id"), vec![2]);
}

#[test]
fn test_typed_rows() {
    let rows = vec![("a", 1, 0.5), ("b", 1, 0.1), ("a", 2, 0.7), ("b", 1, 0.2)];
    let kept = retain_single_instance_subjects(rows, |r| (r.0, r.1), |_| true);
    assert_eq!(kept, vec![("a", 1, 0.5), ("a", 2, 0.7)]);
}
