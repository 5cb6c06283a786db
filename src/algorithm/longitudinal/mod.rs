//! Longitudinal (wide) table construction and derived rates
//!
//! This module turns per-subject date groups and a measurement table into one
//! wide row per subject, then derives deltas, intervals and rates between the
//! numbered columns.

pub mod builder;
pub mod policy;
pub mod rates;

pub use builder::{build_longitudinal_batch, build_longitudinal_table, select_column_dates};
pub use policy::{ColumnSourcePolicy, CountSelection};
pub use rates::{
    NumberedColumns, calculate_deltas_and_rates, derive_deltas_and_rates, derive_record,
};
