//! Schema-aware constructors for events
//!
//! Reads event tables from Arrow record batches and writes them back out.

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use crate::config::{DateFormatConfig, TableColumns};
use crate::error::Result;
use crate::models::Event;
use crate::utils::arrow::{
    date32_array, date_value, float64_column, get_column, subject_id_array, subject_id_field,
    subject_id_value,
};

impl Event {
    /// Read events from a record batch
    ///
    /// The subject and date columns are required and must not contain nulls.
    /// The measurement column is optional; when absent every event is date-only.
    ///
    /// # Errors
    /// Fails on the first missing column, null key, or malformed date. No
    /// partial result is returned.
    pub fn from_batch(
        batch: &RecordBatch,
        columns: &TableColumns,
        date_config: &DateFormatConfig,
    ) -> Result<Vec<Self>> {
        let ids = get_column(batch, &columns.subject_id)?;
        let dates = get_column(batch, &columns.date)?;
        let measurements = match batch.schema().index_of(&columns.measurement) {
            Ok(idx) => Some(float64_column(batch.column(idx), &columns.measurement)?),
            Err(_) => None,
        };

        (0..batch.num_rows())
            .map(|row| {
                let subject_id = subject_id_value(&ids, &columns.subject_id, row)?;
                let date = date_value(&dates, &columns.date, row, date_config)?;
                let measurement = measurements
                    .as_ref()
                    .filter(|values| !values.is_null(row))
                    .map(|values| values.value(row));
                Ok(Self {
                    subject_id,
                    date,
                    measurement,
                })
            })
            .collect()
    }

    /// Write events to a record batch
    ///
    /// The measurement column is emitted only when `include_measurement` is set.
    pub fn to_record_batch(
        events: &[Self],
        columns: &TableColumns,
        include_measurement: bool,
    ) -> Result<RecordBatch> {
        let ids: Vec<_> = events.iter().map(|e| &e.subject_id).collect();
        let id_array = subject_id_array(&ids);

        let mut fields = vec![
            subject_id_field(&columns.subject_id, &id_array),
            Field::new(&columns.date, DataType::Date32, false),
        ];
        let mut arrays: Vec<ArrayRef> = vec![id_array, date32_array(events.iter().map(|e| e.date))];

        if include_measurement {
            fields.push(Field::new(&columns.measurement, DataType::Float64, true));
            arrays.push(Arc::new(Float64Array::from(
                events.iter().map(|e| e.measurement).collect::<Vec<_>>(),
            )));
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}
