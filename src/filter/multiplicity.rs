//! Removal of subjects with repeated measurements on one date
//!
//! Rows are grouped by a subject key and a date key. A group is clean when it
//! carries exactly one non-null value in the multiplicity column, and a subject
//! survives only when every one of its groups is clean. Surviving subjects keep
//! all of their rows in input order.

use std::collections::HashSet;
use std::hash::Hash;

use arrow::array::{Array, ArrayRef, BooleanArray};
use arrow::record_batch::RecordBatch;
use arrow::row::{Row, RowConverter, SortField};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::filter::core::{BatchFilter, filter_record_batch};
use crate::models::Event;
use crate::utils::arrow::get_column;
use crate::utils::logging::log_removed;

/// Filter keeping only subjects with a single value per (subject, date) group
#[derive(Debug, Clone)]
pub struct MultiplicityFilter {
    id_key: String,
    date_key: String,
    num_key: String,
}

impl MultiplicityFilter {
    /// Create a filter over the given subject, date and value columns
    pub fn new(
        id_key: impl Into<String>,
        date_key: impl Into<String>,
        num_key: impl Into<String>,
    ) -> Self {
        Self {
            id_key: id_key.into(),
            date_key: date_key.into(),
            num_key: num_key.into(),
        }
    }
}

impl BatchFilter for MultiplicityFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        remove_multiple_instances(batch, &self.id_key, &self.date_key, &self.num_key)
    }

    fn required_columns(&self) -> HashSet<String> {
        [&self.id_key, &self.date_key, &self.num_key]
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Row-encode one or more key columns so they can be hashed
fn encode_keys(columns: &[ArrayRef]) -> Result<arrow::row::Rows> {
    let fields = columns
        .iter()
        .map(|column| SortField::new(column.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    Ok(converter.convert_columns(columns)?)
}

/// Remove every subject that has a (subject, date) group without exactly one
/// non-null `num_key` value
///
/// Key columns may be of any Arrow type. The output has the input schema.
pub fn remove_multiple_instances(
    batch: &RecordBatch,
    id_key: &str,
    date_key: &str,
    num_key: &str,
) -> Result<RecordBatch> {
    let ids = get_column(batch, id_key)?;
    let dates = get_column(batch, date_key)?;
    let values = get_column(batch, num_key)?;

    let subject_rows = encode_keys(&[ids.clone()])?;
    let group_rows = encode_keys(&[ids, dates])?;

    let mut groups: FxHashMap<Row<'_>, (Row<'_>, usize)> = FxHashMap::default();
    for row in 0..batch.num_rows() {
        let entry = groups
            .entry(group_rows.row(row))
            .or_insert((subject_rows.row(row), 0));
        if values.is_valid(row) {
            entry.1 += 1;
        }
    }

    let excluded: FxHashSet<Row<'_>> = groups
        .values()
        .filter(|(_, count)| *count != 1)
        .map(|(subject, _)| *subject)
        .collect();
    let dirty_groups = groups.values().filter(|(_, count)| *count != 1).count();

    log::info!("Found {} unique {id_key}/{date_key} groups", groups.len());

    let mask: BooleanArray = (0..batch.num_rows())
        .map(|row| Some(!excluded.contains(&subject_rows.row(row))))
        .collect();
    let filtered = filter_record_batch(batch, &mask)?;

    log_removed(
        "Multiple instance filter",
        dirty_groups,
        groups.len() - dirty_groups,
    );
    log::info!("Final table contains {} rows", filtered.num_rows());

    Ok(filtered)
}

/// Typed counterpart of [`remove_multiple_instances`] for in-memory rows
///
/// `key` returns the (subject, date) group of a row and `has_value` whether it
/// counts towards that group's multiplicity.
pub fn retain_single_instance_subjects<T, I, D>(
    rows: Vec<T>,
    key: impl Fn(&T) -> (I, D),
    has_value: impl Fn(&T) -> bool,
) -> Vec<T>
where
    I: Hash + Eq + Clone,
    D: Hash + Eq,
{
    let mut groups: FxHashMap<(I, D), usize> = FxHashMap::default();
    for row in &rows {
        let count = groups.entry(key(row)).or_insert(0);
        if has_value(row) {
            *count += 1;
        }
    }

    let excluded: FxHashSet<I> = groups
        .iter()
        .filter(|(_, count)| **count != 1)
        .map(|((subject, _), _)| subject.clone())
        .collect();

    let before = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .filter(|row| !excluded.contains(&key(row).0))
        .collect();
    log_removed("Multiple instance filter", before - kept.len(), kept.len());
    kept
}

/// Keep subjects whose events carry exactly one measurement per date
#[must_use]
pub fn retain_single_measurement_subjects(events: Vec<Event>) -> Vec<Event> {
    retain_single_instance_subjects(
        events,
        |event| (event.subject_id.clone(), event.date),
        |event| event.measurement.is_some(),
    )
}
