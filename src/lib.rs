//! A Rust library for temporal analysis of cohort event tables: per-subject
//! date aggregation, consecutive intervals, longitudinal (wide) tables with
//! deltas and rates, temporal thinning and multiplicity filtering.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{
    DateFormatConfig, IntervalConfig, LongitudinalConfig, TableColumns, ThinningConfig,
    TimelineConfig,
};
pub use error::{CohortError, Result};
pub use models::{
    DateGroup, DerivedRecord, Event, IntervalRecord, LongitudinalRecord, LongitudinalTable,
    SubjectId, ThinnedSeries,
};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Algorithms
pub use algorithm::{
    CohortStatistics, ColumnSourcePolicy, CountSelection, NumberedColumns, aggregate_dates,
    aggregate_dates_from_batch, build_longitudinal_batch, build_longitudinal_table,
    calculate_deltas_and_rates, derive_deltas_and_rates, generate_intervals, thin_batch,
    thin_events,
};

// Filtering capabilities
pub use filter::{BatchFilter, MultiplicityFilter, filter_record_batch, remove_multiple_instances};
