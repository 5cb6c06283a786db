//! Per-subject date aggregates

use arrow::array::{ArrayRef, Date32Builder, Int64Array, ListBuilder, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{CohortError, Result};
use crate::models::SubjectId;
use crate::utils::arrow::{date32_array, subject_id_array, subject_id_field};
use crate::utils::date_utils::{days_between, to_date32};

/// Sorted unique dates of one subject with summary statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateGroup {
    /// Subject the dates belong to
    pub subject_id: SubjectId,
    /// Strictly ascending unique dates
    pub dates: Vec<NaiveDate>,
    /// Earliest date
    pub first_date: NaiveDate,
    /// Latest date
    pub last_date: NaiveDate,
    /// Number of unique dates
    pub count: usize,
    /// Whole days between the first and last date
    pub span_days: i64,
}

impl DateGroup {
    /// Build a group from dates in any order, dropping duplicates
    ///
    /// # Errors
    /// Returns a validation error if `dates` is empty.
    pub fn from_dates(subject_id: SubjectId, mut dates: Vec<NaiveDate>) -> Result<Self> {
        let Some(first) = dates.pop() else {
            return Err(CohortError::validation(format!(
                "Subject {subject_id} has no dates"
            )));
        };
        Ok(Self::with_first_date(subject_id, first, dates))
    }

    /// Build a group from one known date plus any further dates
    ///
    /// The group can never be empty, so this cannot fail.
    #[must_use]
    pub fn with_first_date(subject_id: SubjectId, first: NaiveDate, mut rest: Vec<NaiveDate>) -> Self {
        rest.push(first);
        rest.sort_unstable();
        rest.dedup();

        let first_date = rest.first().copied().unwrap_or(first);
        let last_date = rest.last().copied().unwrap_or(first);

        Self {
            count: rest.len(),
            span_days: days_between(first_date, last_date),
            subject_id,
            dates: rest,
            first_date,
            last_date,
        }
    }

    /// Arrow schema of a date group table
    #[must_use]
    pub fn schema(subject_field: Field) -> Schema {
        Schema::new(vec![
            subject_field,
            Field::new("first_date", DataType::Date32, false),
            Field::new("last_date", DataType::Date32, false),
            Field::new("date_count", DataType::UInt64, false),
            Field::new("span_days", DataType::Int64, false),
            Field::new(
                "unique_date_list",
                DataType::List(Arc::new(Field::new("item", DataType::Date32, true))),
                true,
            ),
        ])
    }

    /// Write date groups to a record batch
    pub fn to_record_batch(groups: &[Self], subject_column: &str) -> Result<RecordBatch> {
        let ids: Vec<_> = groups.iter().map(|g| &g.subject_id).collect();
        let id_array = subject_id_array(&ids);
        let schema = Self::schema(subject_id_field(subject_column, &id_array));

        let mut date_lists = ListBuilder::new(Date32Builder::new());
        for group in groups {
            for date in &group.dates {
                date_lists.values().append_value(to_date32(*date));
            }
            date_lists.append(true);
        }

        let arrays: Vec<ArrayRef> = vec![
            id_array,
            date32_array(groups.iter().map(|g| g.first_date)),
            date32_array(groups.iter().map(|g| g.last_date)),
            Arc::new(UInt64Array::from_iter_values(
                groups.iter().map(|g| g.count as u64),
            )),
            Arc::new(Int64Array::from_iter_values(groups.iter().map(|g| g.span_days))),
            Arc::new(date_lists.finish()),
        ];

        Ok(RecordBatch::try_new(Arc::new(schema), arrays)?)
    }
}
