//! Dated observations belonging to a subject

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::models::SubjectId;
use crate::utils::logging::log_removed;

/// A dated, optionally valued observation (e.g. a scan and its diameter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Subject the event belongs to
    pub subject_id: SubjectId,
    /// Calendar date of the event
    pub date: NaiveDate,
    /// Optional scalar measurement
    pub measurement: Option<f64>,
}

impl Event {
    /// Create a date-only event
    #[must_use]
    pub fn new(subject_id: impl Into<SubjectId>, date: NaiveDate) -> Self {
        Self {
            subject_id: subject_id.into(),
            date,
            measurement: None,
        }
    }

    /// Create an event carrying a measurement
    #[must_use]
    pub fn with_measurement(subject_id: impl Into<SubjectId>, date: NaiveDate, measurement: f64) -> Self {
        Self {
            subject_id: subject_id.into(),
            date,
            measurement: Some(measurement),
        }
    }
}

/// Count events per subject, ordered by subject
#[must_use]
pub fn count_by_subject(events: &[Event]) -> Vec<(SubjectId, usize)> {
    let mut counts: FxHashMap<&SubjectId, usize> = FxHashMap::default();
    for event in events {
        *counts.entry(&event.subject_id).or_insert(0) += 1;
    }

    let mut counts: Vec<(SubjectId, usize)> = counts
        .into_iter()
        .map(|(id, count)| (id.clone(), count))
        .collect();
    counts.sort_by(|a, b| a.0.cmp(&b.0));
    counts
}

/// Drop events without a measurement value
#[must_use]
pub fn remove_empty_measurement_rows(events: Vec<Event>) -> Vec<Event> {
    let before = events.len();
    let kept: Vec<Event> = events
        .into_iter()
        .filter(|event| event.measurement.is_some())
        .collect();
    log_removed("Null measurement cleanup", before - kept.len(), kept.len());
    kept
}
