//! Wide per-subject longitudinal rows and their derived deltas and rates

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::TableColumns;
use crate::error::{CohortError, Result};
use crate::models::SubjectId;
use crate::utils::arrow::{date32_array, subject_id_array, subject_id_field};

/// One wide row: the selected dates of a subject and the measurement at each
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongitudinalRecord {
    /// Subject of the row
    pub subject_id: SubjectId,
    /// `date_1..date_N`
    pub dates: Vec<NaiveDate>,
    /// `measurement_1..measurement_N`
    pub measurements: Vec<f64>,
}

impl LongitudinalRecord {
    /// Key used to detect duplicate rows; floats compare bitwise
    pub(crate) fn dedup_key(&self) -> (SubjectId, Vec<NaiveDate>, Vec<u64>) {
        (
            self.subject_id.clone(),
            self.dates.clone(),
            self.measurements.iter().map(|m| m.to_bits()).collect(),
        )
    }
}

/// A longitudinal table with a fixed number of numbered columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongitudinalTable {
    /// Number of date (and measurement) columns
    pub column_count: usize,
    /// Rows ordered by subject
    pub records: Vec<LongitudinalRecord>,
}

impl LongitudinalTable {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check that every row carries `column_count` dates and measurements
    pub fn validate(&self) -> Result<()> {
        for record in &self.records {
            if record.dates.len() != self.column_count
                || record.measurements.len() != self.column_count
            {
                return Err(CohortError::validation(format!(
                    "Row of subject {} has {} dates and {} measurements, expected {}",
                    record.subject_id,
                    record.dates.len(),
                    record.measurements.len(),
                    self.column_count
                )));
            }
        }
        Ok(())
    }

    /// Write the table as `subject_id, date_1..N, measurement_1..N`
    pub fn to_record_batch(&self, columns: &TableColumns) -> Result<RecordBatch> {
        self.validate()?;
        let ids: Vec<_> = self.records.iter().map(|r| &r.subject_id).collect();
        let id_array = subject_id_array(&ids);

        let mut fields = vec![subject_id_field(&columns.subject_id, &id_array)];
        let mut arrays: Vec<ArrayRef> = vec![id_array];

        for k in 0..self.column_count {
            fields.push(Field::new(columns.date_column(k + 1), DataType::Date32, false));
            arrays.push(date32_array(self.records.iter().map(|r| r.dates[k])));
        }
        for k in 0..self.column_count {
            fields.push(Field::new(
                columns.measurement_column(k + 1),
                DataType::Float64,
                false,
            ));
            arrays.push(Arc::new(Float64Array::from_iter_values(
                self.records.iter().map(|r| r.measurements[k]),
            )));
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}

/// A longitudinal row extended with consecutive deltas, intervals and rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    /// The source row
    pub record: LongitudinalRecord,
    /// `delta_k = measurement_{k+1} - measurement_k`
    pub deltas: Vec<f64>,
    /// `interval_k = (date_{k+1} - date_k) / 365` in years
    pub intervals: Vec<f64>,
    /// `rate_k = delta_k / interval_k`; non-finite for same-day pairs
    pub rates: Vec<f64>,
}

impl DerivedRecord {
    /// Whether every rate is a finite number
    #[must_use]
    pub fn has_finite_rates(&self) -> bool {
        self.rates.iter().all(|rate| rate.is_finite())
    }

    /// Write derived rows as the longitudinal columns plus `delta_k`,
    /// `interval_k` and `rate_k`
    pub fn to_record_batch(
        records: &[Self],
        column_count: usize,
        columns: &TableColumns,
    ) -> Result<RecordBatch> {
        let pairs = column_count.saturating_sub(1);
        for record in records {
            if record.deltas.len() != record.intervals.len() {
                return Err(CohortError::ColumnAlignment {
                    deltas: record.deltas.len(),
                    intervals: record.intervals.len(),
                });
            }
            if record.deltas.len() != pairs || record.rates.len() != pairs {
                return Err(CohortError::validation(format!(
                    "Row of subject {} has {} deltas and {} rates, expected {pairs}",
                    record.record.subject_id,
                    record.deltas.len(),
                    record.rates.len()
                )));
            }
        }

        let table = LongitudinalTable {
            column_count,
            records: records.iter().map(|r| r.record.clone()).collect(),
        };
        let base = table.to_record_batch(columns)?;

        let mut fields: Vec<Field> = base
            .schema()
            .fields()
            .iter()
            .map(|f| f.as_ref().clone())
            .collect();
        let mut arrays: Vec<ArrayRef> = base.columns().to_vec();

        for (stem, values) in [
            ("delta", Self::collect(records, pairs, |r| &r.deltas)),
            ("interval", Self::collect(records, pairs, |r| &r.intervals)),
            ("rate", Self::collect(records, pairs, |r| &r.rates)),
        ] {
            for (k, column) in values.into_iter().enumerate() {
                fields.push(Field::new(format!("{stem}_{}", k + 1), DataType::Float64, false));
                arrays.push(Arc::new(Float64Array::from(column)));
            }
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }

    fn collect(records: &[Self], pairs: usize, pick: impl Fn(&Self) -> &Vec<f64>) -> Vec<Vec<f64>> {
        (0..pairs)
            .map(|k| records.iter().map(|r| pick(r)[k]).collect())
            .collect()
    }
}

/// Keep only rows whose rates are all finite
#[must_use]
pub fn retain_finite_rates(records: Vec<DerivedRecord>) -> Vec<DerivedRecord> {
    records.into_iter().filter(DerivedRecord::has_finite_rates).collect()
}
