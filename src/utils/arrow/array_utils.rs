//! Utilities for working with Arrow arrays.
//!
//! This module provides utility functions for safely extracting typed values
//! from Arrow arrays, with clear errors for missing columns, unsupported
//! types and nulls in required positions.

use arrow::array::{
    Array, ArrayRef, Date32Array, Date64Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::debug;

use crate::config::DateFormatConfig;
use crate::error::{CohortError, Result};
use crate::models::SubjectId;
use crate::utils::date_utils::parse_date_strict;

/// Get a required column from a record batch by name
pub fn get_column(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(column_name)
        .map_err(|_| CohortError::column_not_found(column_name))?;
    Ok(batch.column(idx).clone())
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| CohortError::InvalidColumnType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
            actual: array.data_type().clone(),
        })
}

/// Cast a numeric column to Float64
///
/// Integer and floating point columns of any width are accepted.
pub fn float64_column(array: &ArrayRef, column_name: &str) -> Result<Float64Array> {
    if !array.data_type().is_numeric() {
        return Err(CohortError::InvalidColumnType {
            column: column_name.to_string(),
            expected: "numeric".to_string(),
            actual: array.data_type().clone(),
        });
    }
    if array.data_type() != &DataType::Float64 {
        debug!(
            "Casting column '{column_name}' from {:?} to Float64",
            array.data_type()
        );
    }
    let cast = arrow::compute::cast(array, &DataType::Float64)?;
    Ok(downcast_array::<Float64Array>(&cast, column_name, "Float64")?.clone())
}

/// Read the subject identifier at a row, rejecting nulls
pub fn subject_id_value(array: &ArrayRef, column_name: &str, row: usize) -> Result<SubjectId> {
    if array.is_null(row) {
        return Err(CohortError::NullValue {
            column: column_name.to_string(),
            row,
        });
    }

    match array.data_type() {
        DataType::Int64 => {
            let ids = downcast_array::<Int64Array>(array, column_name, "Int64")?;
            Ok(SubjectId::Int(ids.value(row)))
        }
        DataType::Int32 => {
            let ids = downcast_array::<Int32Array>(array, column_name, "Int32")?;
            Ok(SubjectId::Int(i64::from(ids.value(row))))
        }
        DataType::Utf8 => {
            let ids = downcast_array::<StringArray>(array, column_name, "Utf8")?;
            Ok(SubjectId::Text(ids.value(row).to_string()))
        }
        DataType::LargeUtf8 => {
            let ids = downcast_array::<LargeStringArray>(array, column_name, "LargeUtf8")?;
            Ok(SubjectId::Text(ids.value(row).to_string()))
        }
        other => Err(CohortError::InvalidColumnType {
            column: column_name.to_string(),
            expected: "Int32, Int64, Utf8 or LargeUtf8".to_string(),
            actual: other.clone(),
        }),
    }
}

/// Read a calendar date at a row, rejecting nulls and unparsable strings
///
/// Timestamps are truncated to their date part.
pub fn date_value(
    array: &ArrayRef,
    column_name: &str,
    row: usize,
    config: &DateFormatConfig,
) -> Result<NaiveDate> {
    if array.is_null(row) {
        return Err(CohortError::NullValue {
            column: column_name.to_string(),
            row,
        });
    }

    let date = match array.data_type() {
        DataType::Date32 => downcast_array::<Date32Array>(array, column_name, "Date32")?
            .value_as_date(row),
        DataType::Date64 => downcast_array::<Date64Array>(array, column_name, "Date64")?
            .value_as_date(row),
        DataType::Timestamp(TimeUnit::Second, _) => {
            downcast_array::<TimestampSecondArray>(array, column_name, "Timestamp")?
                .value_as_datetime(row)
                .map(|dt| dt.date())
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            downcast_array::<TimestampMillisecondArray>(array, column_name, "Timestamp")?
                .value_as_datetime(row)
                .map(|dt| dt.date())
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            downcast_array::<TimestampMicrosecondArray>(array, column_name, "Timestamp")?
                .value_as_datetime(row)
                .map(|dt| dt.date())
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            downcast_array::<TimestampNanosecondArray>(array, column_name, "Timestamp")?
                .value_as_datetime(row)
                .map(|dt| dt.date())
        }
        DataType::Utf8 => {
            let strings = downcast_array::<StringArray>(array, column_name, "Utf8")?;
            return parse_date_strict(strings.value(row), config);
        }
        DataType::LargeUtf8 => {
            let strings = downcast_array::<LargeStringArray>(array, column_name, "LargeUtf8")?;
            return parse_date_strict(strings.value(row), config);
        }
        other => {
            return Err(CohortError::InvalidColumnType {
                column: column_name.to_string(),
                expected: "Date32, Date64, Timestamp or Utf8".to_string(),
                actual: other.clone(),
            });
        }
    };

    date.ok_or_else(|| CohortError::malformed_date(format!("{column_name}[{row}]")))
}

/// Read every date of a column, failing on the first malformed value
pub fn date_values(
    array: &ArrayRef,
    column_name: &str,
    config: &DateFormatConfig,
) -> Result<Vec<NaiveDate>> {
    (0..array.len())
        .map(|row| date_value(array, column_name, row, config))
        .collect()
}

/// Memory used by the named columns of a batch, as (megabytes, bytes)
pub fn memory_profile(batch: &RecordBatch, columns: &[&str]) -> Result<(f64, usize)> {
    let mut bytes = 0;
    for name in columns {
        bytes += get_column(batch, name)?.get_array_memory_size();
    }
    let megabytes = bytes as f64 / 1024.0 / 1024.0;
    Ok((megabytes, bytes))
}
