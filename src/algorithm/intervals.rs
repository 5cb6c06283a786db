//! Interval generation
//!
//! Walks each subject's sorted unique dates left to right and emits one
//! interval per consecutive pair, optionally followed by a first-to-last
//! interval for subjects with more than two dates.

use rayon::prelude::*;
use std::time::Instant;

use crate::config::IntervalConfig;
use crate::models::{DateGroup, IntervalRecord};
use crate::utils::date_utils::round_to;
use crate::utils::logging::log_operation_complete;

/// Generate the intervals of one subject
///
/// Produces `count - 1` consecutive intervals, plus one longest interval
/// when enabled and the subject has more than two dates.
#[must_use]
pub fn intervals_for_group(group: &DateGroup, config: &IntervalConfig) -> Vec<IntervalRecord> {
    let dates = &group.dates;
    if dates.len() < 2 {
        return Vec::new();
    }

    let mut records: Vec<IntervalRecord> = dates
        .windows(2)
        .map(|pair| IntervalRecord::new(group.subject_id.clone(), pair[0], pair[1]))
        .collect();

    if config.include_longest && dates.len() > 2 {
        records.push(IntervalRecord::new(
            group.subject_id.clone(),
            group.first_date,
            group.last_date,
        ));
    }

    if let Some(places) = config.decimal_places {
        for record in &mut records {
            record.length_years = round_to(record.length_years, places);
        }
    }

    records
}

/// Generate intervals for every subject, keeping subject order
#[must_use]
pub fn generate_intervals(groups: &[DateGroup], config: &IntervalConfig) -> Vec<IntervalRecord> {
    let start = Instant::now();

    let records: Vec<IntervalRecord> = groups
        .par_iter()
        .map(|group| intervals_for_group(group, config))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    log_operation_complete("Interval generation", records.len(), Some(start.elapsed()));
    records
}
