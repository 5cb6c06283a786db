//! Deltas, year intervals and rates between consecutive numbered columns
//!
//! The numbered columns are supplied as explicit ordered lists and checked
//! once at the boundary, instead of being re-derived from names on each use.

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use std::sync::Arc;

use crate::config::DateFormatConfig;
use crate::error::{CohortError, Result};
use crate::models::{DerivedRecord, LongitudinalRecord, LongitudinalTable};
use crate::utils::arrow::{date_values, float64_column, get_column};
use crate::utils::date_utils::years_between;

/// Ordered numbered date and measurement columns of a wide table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedColumns {
    dates: Vec<String>,
    measurements: Vec<String>,
}

impl NumberedColumns {
    /// Pair explicit date and measurement columns, in column order
    ///
    /// # Errors
    /// Returns `ColumnAlignment` if the lists would yield different numbers of
    /// delta and interval columns.
    pub fn new(dates: Vec<String>, measurements: Vec<String>) -> Result<Self> {
        let deltas = measurements.len().saturating_sub(1);
        let intervals = dates.len().saturating_sub(1);
        if deltas != intervals {
            return Err(CohortError::ColumnAlignment { deltas, intervals });
        }
        Ok(Self {
            dates,
            measurements,
        })
    }

    /// Discover `<stem>_<index>` columns in a schema
    ///
    /// A column belongs to a stem when the part before its final underscore
    /// ends with the stem (so `date` matches `ct_date_1`) and the trailing token
    /// is a positive integer. Indices must run contiguously from 1.
    pub fn from_schema(schema: &Schema, date_stem: &str, measurement_stem: &str) -> Result<Self> {
        let dates = numbered_columns(schema, date_stem)?;
        let measurements = numbered_columns(schema, measurement_stem)?;
        Self::new(dates, measurements)
    }

    /// Date columns in order
    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Measurement columns in order
    #[must_use]
    pub fn measurements(&self) -> &[String] {
        &self.measurements
    }

    /// Number of consecutive pairs, i.e. of delta/interval/rate columns
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.dates.len().saturating_sub(1)
    }
}

fn numbered_columns(schema: &Schema, stem: &str) -> Result<Vec<String>> {
    let numbered: Vec<(usize, String)> = schema
        .fields()
        .iter()
        .filter_map(|field| {
            let (prefix, index) = field.name().rsplit_once('_')?;
            let index = index.parse::<usize>().ok().filter(|i| *i > 0)?;
            prefix.ends_with(stem).then(|| (index, field.name().clone()))
        })
        .sorted_by_key(|(index, _)| *index)
        .collect();

    for (position, (index, name)) in numbered.iter().enumerate() {
        if *index != position + 1 {
            return Err(CohortError::validation(format!(
                "Column '{name}' breaks the numbering of stem '{stem}' (expected index {})",
                position + 1
            )));
        }
    }

    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

/// Derive deltas, intervals and rates for one wide row
///
/// # Errors
/// Returns `ColumnAlignment` if the row's date and measurement counts differ.
pub fn derive_record(record: &LongitudinalRecord) -> Result<DerivedRecord> {
    let deltas: Vec<f64> = record
        .measurements
        .iter()
        .tuple_windows()
        .map(|(a, b)| b - a)
        .collect();
    let intervals: Vec<f64> = record
        .dates
        .iter()
        .tuple_windows()
        .map(|(a, b)| years_between(*a, *b))
        .collect();

    if deltas.len() != intervals.len() {
        return Err(CohortError::ColumnAlignment {
            deltas: deltas.len(),
            intervals: intervals.len(),
        });
    }

    let rates = deltas
        .iter()
        .zip(&intervals)
        .map(|(delta, interval)| delta / interval)
        .collect();

    Ok(DerivedRecord {
        record: record.clone(),
        deltas,
        intervals,
        rates,
    })
}

/// Derive deltas, intervals and rates for every row of a longitudinal table
///
/// Same-day pairs give non-finite rates; they are kept for the caller to filter.
pub fn derive_deltas_and_rates(table: &LongitudinalTable) -> Result<Vec<DerivedRecord>> {
    table.records.iter().map(derive_record).collect()
}

/// Append `delta_k`, `interval_k` and `rate_k` columns to a wide record batch
///
/// Date columns may be any date-like type accepted by the event reader and
/// measurement columns any numeric type.
pub fn calculate_deltas_and_rates(
    batch: &RecordBatch,
    columns: &NumberedColumns,
    date_config: &DateFormatConfig,
) -> Result<RecordBatch> {
    let dates = columns
        .dates()
        .iter()
        .map(|name| date_values(&get_column(batch, name)?, name, date_config))
        .collect::<Result<Vec<_>>>()?;
    let measurements = columns
        .measurements()
        .iter()
        .map(|name| float64_column(&get_column(batch, name)?, name))
        .collect::<Result<Vec<_>>>()?;

    let pairs = columns.pair_count();
    let mut delta_columns = Vec::with_capacity(pairs);
    let mut interval_columns = Vec::with_capacity(pairs);
    for k in 0..pairs {
        let (m1, m2) = (&measurements[k], &measurements[k + 1]);
        let delta: Float64Array = (0..batch.num_rows())
            .map(|row| {
                (!m1.is_null(row) && !m2.is_null(row)).then(|| m2.value(row) - m1.value(row))
            })
            .collect();
        let interval: Float64Array = dates[k]
            .iter()
            .zip(&dates[k + 1])
            .map(|(d1, d2)| Some(years_between(*d1, *d2)))
            .collect();
        delta_columns.push(delta);
        interval_columns.push(interval);
    }

    let rate_columns: Vec<Float64Array> = delta_columns
        .iter()
        .zip(&interval_columns)
        .map(|(delta, interval)| {
            delta
                .iter()
                .zip(interval.iter())
                .map(|(d, i)| Some(d? / i?))
                .collect()
        })
        .collect();

    let mut fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    let mut arrays: Vec<ArrayRef> = batch.columns().to_vec();

    for (stem, derived) in [
        ("delta", delta_columns),
        ("interval", interval_columns),
        ("rate", rate_columns),
    ] {
        for (k, array) in derived.into_iter().enumerate() {
            fields.push(Field::new(format!("{stem}_{}", k + 1), DataType::Float64, true));
            arrays.push(Arc::new(array));
        }
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}
