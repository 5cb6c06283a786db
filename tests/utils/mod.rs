use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use cohort_timeline::models::Event;

/// Shorthand for a calendar date
#[must_use]
pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Dates at the given day offsets from 2020-01-01
#[must_use]
pub fn offsets(days: &[i64]) -> Vec<NaiveDate> {
    days.iter().map(|d| ymd(2020, 1, 1) + Duration::days(*d)).collect()
}

/// Date-only events for one subject
#[must_use]
pub fn subject_events(subject: i64, dates: &[NaiveDate]) -> Vec<Event> {
    dates.iter().map(|d| Event::new(subject, *d)).collect()
}

/// Measured events for one subject, measurement `k` on date `k`
#[must_use]
pub fn measured_events(subject: &str, dates: &[NaiveDate], values: &[f64]) -> Vec<Event> {
    dates
        .iter()
        .zip(values)
        .map(|(d, v)| Event::with_measurement(subject, *d, *v))
        .collect()
}

/// Event batch with integer ids, text dates and optional measurements
#[must_use]
pub fn event_batch(ids: Vec<i64>, dates: Vec<&str>, values: Vec<Option<f64>>) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("subject_id", DataType::Int64, false),
        Field::new("date", DataType::Utf8, false),
        Field::new("measurement", DataType::Float64, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(dates)),
            Arc::new(Float64Array::from(values)),
        ],
    )
    .expect("valid event batch")
}

/// Read an Int64 column
#[must_use]
pub fn int64_values(batch: &RecordBatch, name: &str) -> Vec<i64> {
    column::<Int64Array>(batch, name).values().to_vec()
}

/// Read a Utf8 column
#[must_use]
pub fn string_values(batch: &RecordBatch, name: &str) -> Vec<String> {
    let array = column::<StringArray>(batch, name);
    (0..array.len()).map(|i| array.value(i).to_string()).collect()
}

/// Read a Date32 column as dates
#[must_use]
pub fn date_values(batch: &RecordBatch, name: &str) -> Vec<NaiveDate> {
    let array = column::<Date32Array>(batch, name);
    (0..array.len())
        .map(|i| array.value_as_date(i).expect("in-range date"))
        .collect()
}

/// Read a Float64 column, nulls as `None`
#[must_use]
pub fn float64_values(batch: &RecordBatch, name: &str) -> Vec<Option<f64>> {
    column::<Float64Array>(batch, name).iter().collect()
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> &'a T {
    let array: &'a ArrayRef = batch
        .column_by_name(name)
        .unwrap_or_else(|| panic!("missing column {name}"));
    array
        .as_any()
        .downcast_ref::<T>()
        .unwrap_or_else(|| panic!("unexpected type for column {name}"))
}
