//! Longitudinal table construction
//!
//! Pivots the selected dates of each qualifying subject into numbered wide
//! columns and attaches the measurement recorded on each of those dates.

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::info;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithm::aggregation::aggregate_dates;
use crate::config::{DateFormatConfig, LongitudinalConfig, TableColumns};
use crate::error::Result;
use crate::models::{DateGroup, Event, LongitudinalRecord, LongitudinalTable, SubjectId};

/// Measurements indexed by subject and date, in source table order
type MeasurementIndex<'a> = FxHashMap<(&'a SubjectId, NaiveDate), Vec<f64>>;

fn index_measurements(measurements: &[Event]) -> MeasurementIndex<'_> {
    let mut index: MeasurementIndex<'_> = FxHashMap::default();
    for event in measurements {
        if let Some(value) = event.measurement {
            index
                .entry((&event.subject_id, event.date))
                .or_default()
                .push(value);
        }
    }
    index
}

/// The dates feeding each numbered column of one subject
///
/// `None` when the subject does not qualify under `config.selection` or has
/// fewer dates than columns.
#[must_use]
pub fn select_column_dates(group: &DateGroup, config: &LongitudinalConfig) -> Option<Vec<NaiveDate>> {
    let n = config.column_count;
    let date_count = group.dates.len();
    if !config.selection.accepts(date_count, n) || date_count < n {
        return None;
    }

    (1..=n)
        .map(|k| {
            let index = config.column_source.source_index(k, n, date_count);
            group.dates.get(index).copied()
        })
        .collect()
}

/// Rows for one subject after joining every column against the measurements
///
/// Empty when any selected date has no measurement. Several measurements on
/// one date fan out into several rows.
fn rows_for_group(
    group: &DateGroup,
    index: &MeasurementIndex<'_>,
    config: &LongitudinalConfig,
) -> Vec<LongitudinalRecord> {
    let Some(dates) = select_column_dates(group, config) else {
        return Vec::new();
    };
    let mut partial: Vec<Vec<f64>> = vec![Vec::with_capacity(dates.len())];

    for date in &dates {
        let Some(values) = index.get(&(&group.subject_id, *date)) else {
            return Vec::new();
        };
        partial = partial
            .into_iter()
            .flat_map(|row| {
                values.iter().map(move |value| {
                    let mut next = row.clone();
                    next.push(*value);
                    next
                })
            })
            .collect();
    }

    partial
        .into_iter()
        .map(|measurements| LongitudinalRecord {
            subject_id: group.subject_id.clone(),
            dates: dates.clone(),
            measurements,
        })
        .collect()
}

/// Build a longitudinal table from date groups and a measurement table
///
/// Subjects are selected by `config.selection`, their column dates picked by
/// `config.column_source`, and each column inner-joined on (subject, date)
/// against `measurements`. Events without a measurement never match.
/// Duplicate rows are removed, keeping the first.
///
/// # Errors
/// Returns `InvalidColumnCount` if `config.column_count` is zero.
pub fn build_longitudinal_table(
    groups: &[DateGroup],
    measurements: &[Event],
    config: &LongitudinalConfig,
) -> Result<LongitudinalTable> {
    config.validate()?;

    let index = index_measurements(measurements);
    let selected: Vec<&DateGroup> = groups
        .iter()
        .filter(|group| config.selection.accepts(group.count, config.column_count))
        .collect();

    let rows: Vec<Vec<LongitudinalRecord>> = selected
        .par_iter()
        .map(|group| rows_for_group(group, &index, config))
        .collect();

    let mut seen = FxHashSet::default();
    let records: Vec<LongitudinalRecord> = rows
        .into_iter()
        .flatten()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect();

    info!(
        "Longitudinal table: {} of {} subjects selected, product table length: {}",
        selected.len(),
        groups.len(),
        records.len()
    );

    Ok(LongitudinalTable {
        column_count: config.column_count,
        records,
    })
}

/// Build a longitudinal table straight from an event record batch
///
/// The batch supplies both the dates to aggregate and the measurements to join.
pub fn build_longitudinal_batch(
    batch: &RecordBatch,
    columns: &TableColumns,
    date_config: &DateFormatConfig,
    config: &LongitudinalConfig,
) -> Result<RecordBatch> {
    config.validate()?;
    let events = Event::from_batch(batch, columns, date_config)?;
    let groups = aggregate_dates(&events);
    build_longitudinal_table(&groups, &events, config)?.to_record_batch(columns)
}
