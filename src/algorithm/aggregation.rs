//! Per-subject date aggregation
//!
//! Groups a subject/date table by subject into sorted unique date lists with
//! first/last/count/span summaries.

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::time::Instant;

use crate::config::{DateFormatConfig, TableColumns};
use crate::error::Result;
use crate::models::{DateGroup, Event, SubjectId};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Aggregate events into one date group per subject, ordered by subject
///
/// Duplicate dates are dropped; measurements are ignored.
#[must_use]
pub fn aggregate_dates(events: &[Event]) -> Vec<DateGroup> {
    let start = Instant::now();
    log_operation_start("Date aggregation", events.len());

    let mut by_subject: BTreeMap<&SubjectId, (NaiveDate, Vec<NaiveDate>)> = BTreeMap::new();
    for event in events {
        match by_subject.entry(&event.subject_id) {
            Entry::Vacant(slot) => {
                slot.insert((event.date, Vec::new()));
            }
            Entry::Occupied(mut slot) => slot.get_mut().1.push(event.date),
        }
    }

    let groups: Vec<DateGroup> = by_subject
        .into_iter()
        .map(|(subject_id, (first, rest))| DateGroup::with_first_date(subject_id.clone(), first, rest))
        .collect();

    log_operation_complete("Date aggregation", groups.len(), Some(start.elapsed()));
    groups
}

/// Aggregate the subject/date columns of a record batch
///
/// # Errors
/// Fails with `MalformedDate` if any date cannot be parsed, and with column
/// errors for missing or mistyped key columns. Nothing is aggregated on failure.
pub fn aggregate_dates_from_batch(
    batch: &RecordBatch,
    columns: &TableColumns,
    date_config: &DateFormatConfig,
) -> Result<Vec<DateGroup>> {
    let events = Event::from_batch(batch, columns, date_config)?;
    Ok(aggregate_dates(&events))
}
