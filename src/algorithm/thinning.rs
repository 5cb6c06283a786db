//! Temporal thinning of densely sampled date series
//!
//! Each subject's dates are scanned left to right. The first date is always
//! kept. Every later date contributes its gap to the previous date (kept or
//! not) to an accumulator, and is kept when either that gap or the
//! accumulated gap exceeds the threshold. Keeping a date resets the
//! accumulator, so a long run of small gaps still forces a keep once the run
//! spans more than the threshold.

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::config::{DateFormatConfig, TableColumns, ThinningConfig};
use crate::error::Result;
use crate::models::{Event, SubjectId, ThinnedSeries};
use crate::utils::date_utils::days_between;
use crate::utils::logging::log_removed;

/// Thin one subject's dates
///
/// `dates` are sorted before scanning; duplicates are not removed up front,
/// but a zero-day gap never triggers a keep on its own.
#[must_use]
pub fn thin_series(subject_id: SubjectId, dates: &[NaiveDate], threshold_days: i64) -> ThinnedSeries {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();

    let mut kept = Vec::with_capacity(sorted.len());
    let mut accumulated_gap = 0;

    for (n, date) in sorted.iter().enumerate() {
        if n == 0 {
            kept.push(*date);
            continue;
        }

        let gap = days_between(sorted[n - 1], *date);
        accumulated_gap += gap;

        if gap > threshold_days || accumulated_gap > threshold_days {
            kept.push(*date);
            accumulated_gap = 0;
        }
    }

    ThinnedSeries {
        subject_id,
        dates: kept,
    }
}

/// Thin every subject of an event table, ordered by subject
#[must_use]
pub fn thin_events(events: &[Event], config: &ThinningConfig) -> Vec<ThinnedSeries> {
    let mut by_subject: BTreeMap<&SubjectId, Vec<NaiveDate>> = BTreeMap::new();
    for event in events {
        by_subject.entry(&event.subject_id).or_default().push(event.date);
    }

    let subjects: Vec<_> = by_subject.into_iter().collect();
    let series: Vec<ThinnedSeries> = subjects
        .par_iter()
        .map(|(subject_id, dates)| thin_series((*subject_id).clone(), dates, config.threshold_days))
        .collect();

    let remaining: usize = series.iter().map(|s| s.dates.len()).sum();
    log_removed(
        "Temporal thinning (close proximity to most recent value)",
        events.len() - remaining,
        remaining,
    );
    series
}

/// Thin the subject/date columns of a record batch
///
/// Returns disaggregated `(subject_id, date)` rows using the input column names.
pub fn thin_batch(
    batch: &RecordBatch,
    columns: &TableColumns,
    date_config: &DateFormatConfig,
    config: &ThinningConfig,
) -> Result<RecordBatch> {
    let events = Event::from_batch(batch, columns, date_config)?;
    let series = thin_events(&events, config);
    ThinnedSeries::to_record_batch(&series, &columns.subject_id, &columns.date)
}
