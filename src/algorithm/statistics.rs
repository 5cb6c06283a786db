//! Cohort statistics and summaries
//!
//! Summarises how many subjects and events a cohort holds and how their
//! unique dates are distributed.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{DateGroup, Event};

/// Basic statistics over a cohort's date groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStats {
    /// Number of subjects with at least one date
    pub subject_count: usize,
    /// Number of raw event rows
    pub event_count: usize,
    /// Number of events carrying a measurement
    pub measured_event_count: usize,
    /// Mean unique dates per subject
    pub mean_dates_per_subject: f64,
    /// Fewest unique dates of any subject
    pub min_dates_per_subject: usize,
    /// Most unique dates of any subject
    pub max_dates_per_subject: usize,
    /// Mean days between a subject's first and last date
    pub mean_span_days: f64,
    /// Earliest date in the cohort
    pub first_date: Option<NaiveDate>,
    /// Latest date in the cohort
    pub last_date: Option<NaiveDate>,
}

/// Functions for cohort statistics and summaries
pub struct CohortStatistics;

impl CohortStatistics {
    /// Calculate statistics from the raw events and their date groups
    #[must_use]
    pub fn calculate(events: &[Event], groups: &[DateGroup]) -> CohortStats {
        let subject_count = groups.len();
        let counts = groups.iter().map(|g| g.count);

        let mean = |total: f64| {
            if subject_count > 0 {
                total / subject_count as f64
            } else {
                0.0
            }
        };

        CohortStats {
            subject_count,
            event_count: events.len(),
            measured_event_count: events.iter().filter(|e| e.measurement.is_some()).count(),
            mean_dates_per_subject: mean(counts.clone().sum::<usize>() as f64),
            min_dates_per_subject: counts.clone().min().unwrap_or(0),
            max_dates_per_subject: counts.max().unwrap_or(0),
            mean_span_days: mean(groups.iter().map(|g| g.span_days as f64).sum()),
            first_date: groups.iter().map(|g| g.first_date).min(),
            last_date: groups.iter().map(|g| g.last_date).max(),
        }
    }

    /// Generate a human readable cohort summary
    #[must_use]
    pub fn generate_summary(stats: &CohortStats) -> String {
        let mut summary = String::new();
        summary.push_str("Cohort Summary:\n");
        summary.push_str(&format!("  Subjects: {}\n", stats.subject_count));
        summary.push_str(&format!(
            "  Events: {} ({} with measurement)\n",
            stats.event_count, stats.measured_event_count
        ));

        if let (Some(first), Some(last)) = (stats.first_date, stats.last_date) {
            summary.push_str(&format!("  Date Range: {first} to {last}\n"));
        }

        if stats.subject_count > 0 {
            summary.push_str("\nDates per Subject:\n");
            summary.push_str(&format!("  Mean: {:.2}\n", stats.mean_dates_per_subject));
            summary.push_str(&format!(
                "  Range: {} to {}\n",
                stats.min_dates_per_subject, stats.max_dates_per_subject
            ));
            summary.push_str(&format!("  Mean Span: {:.1} days\n", stats.mean_span_days));
        }

        summary
    }
}
