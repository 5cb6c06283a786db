//! Time intervals between two dated events of a subject

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::models::SubjectId;
use crate::utils::arrow::{date32_array, subject_id_array, subject_id_field};
use crate::utils::date_utils::{format_compact, years_between};

/// An interval between two dates of one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    /// Subject the interval belongs to
    pub subject_id: SubjectId,
    /// Start of the interval
    pub date1: NaiveDate,
    /// End of the interval
    pub date2: NaiveDate,
    /// `{subject_id}_{date1:YYYYMMDD}_{date2:YYYYMMDD}`
    pub label: String,
    /// Length in fixed 365-day years
    pub length_years: f64,
}

impl IntervalRecord {
    /// Create an interval record, deriving its label and length
    #[must_use]
    pub fn new(subject_id: SubjectId, date1: NaiveDate, date2: NaiveDate) -> Self {
        Self {
            label: Self::label_for(&subject_id, date1, date2),
            length_years: years_between(date1, date2),
            subject_id,
            date1,
            date2,
        }
    }

    /// Deterministic label combining the subject and both dates
    #[must_use]
    pub fn label_for(subject_id: &SubjectId, date1: NaiveDate, date2: NaiveDate) -> String {
        format!(
            "{subject_id}_{}_{}",
            format_compact(date1),
            format_compact(date2)
        )
    }

    /// Write interval records to a record batch
    pub fn to_record_batch(records: &[Self], subject_column: &str) -> Result<RecordBatch> {
        let ids: Vec<_> = records.iter().map(|r| &r.subject_id).collect();
        let id_array = subject_id_array(&ids);

        let schema = Schema::new(vec![
            subject_id_field(subject_column, &id_array),
            Field::new("date1", DataType::Date32, false),
            Field::new("date2", DataType::Date32, false),
            Field::new("interval", DataType::Utf8, false),
            Field::new("interval_length_yrs", DataType::Float64, false),
        ]);

        let arrays: Vec<ArrayRef> = vec![
            id_array,
            date32_array(records.iter().map(|r| r.date1)),
            date32_array(records.iter().map(|r| r.date2)),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.label.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.length_years),
            )),
        ];

        Ok(RecordBatch::try_new(Arc::new(schema), arrays)?)
    }
}
