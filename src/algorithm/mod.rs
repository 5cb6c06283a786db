//! Temporal analysis algorithms over cohort events
//!
//! Date aggregation feeds both interval generation and the longitudinal table
//! builder. Thinning works on raw events, and the statistics summarise a
//! cohort at any stage.

pub mod aggregation;
pub mod intervals;
pub mod longitudinal;
pub mod statistics;
pub mod thinning;

pub use aggregation::{aggregate_dates, aggregate_dates_from_batch};
pub use intervals::{generate_intervals, intervals_for_group};
pub use longitudinal::{
    ColumnSourcePolicy, CountSelection, NumberedColumns, build_longitudinal_batch,
    build_longitudinal_table, calculate_deltas_and_rates, derive_deltas_and_rates, derive_record,
    select_column_dates,
};
pub use statistics::{CohortStatistics, CohortStats};
pub use thinning::{thin_batch, thin_events, thin_series};
