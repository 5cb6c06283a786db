//! Builders for the Arrow columns emitted by this crate.

use arrow::array::{Array, ArrayRef, Date32Array, Int64Array, StringArray};
use arrow::datatypes::Field;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::SubjectId;
use crate::utils::date_utils::to_date32;

/// Build a subject identifier column
///
/// The column is Int64 when every identifier is numeric and Utf8 otherwise,
/// with numeric identifiers rendered as text.
#[must_use]
pub fn subject_id_array(ids: &[&SubjectId]) -> ArrayRef {
    let numeric: Option<Vec<i64>> = ids
        .iter()
        .map(|id| match id {
            SubjectId::Int(value) => Some(*value),
            SubjectId::Text(_) => None,
        })
        .collect();

    match numeric {
        Some(values) => Arc::new(Int64Array::from(values)),
        None => Arc::new(StringArray::from_iter_values(
            ids.iter().map(ToString::to_string),
        )),
    }
}

/// Field describing a subject identifier column built by [`subject_id_array`]
#[must_use]
pub fn subject_id_field(name: &str, array: &ArrayRef) -> Field {
    Field::new(name, array.data_type().clone(), false)
}

/// Build a Date32 column from calendar dates
#[must_use]
pub fn date32_array(dates: impl IntoIterator<Item = NaiveDate>) -> ArrayRef {
    Arc::new(Date32Array::from_iter_values(dates.into_iter().map(to_date32)))
}
