//! Thinned per-subject date series

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::models::SubjectId;
use crate::utils::arrow::{date32_array, subject_id_array, subject_id_field};

/// The dates of one subject that survived thinning, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinnedSeries {
    /// Subject of the series
    pub subject_id: SubjectId,
    /// Kept dates; the first input date is always present
    pub dates: Vec<NaiveDate>,
}

impl ThinnedSeries {
    /// Write thinned series as disaggregated `(subject_id, date)` rows
    pub fn to_record_batch(
        series: &[Self],
        subject_column: &str,
        date_column: &str,
    ) -> Result<RecordBatch> {
        let ids: Vec<&SubjectId> = series
            .iter()
            .flat_map(|s| std::iter::repeat_n(&s.subject_id, s.dates.len()))
            .collect();
        let id_array = subject_id_array(&ids);

        let schema = Schema::new(vec![
            subject_id_field(subject_column, &id_array),
            Field::new(date_column, DataType::Date32, false),
        ]);
        let dates = date32_array(series.iter().flat_map(|s| s.dates.iter().copied()));

        Ok(RecordBatch::try_new(Arc::new(schema), vec![id_array, dates])?)
    }
}
