//! Utility functions for dates, Arrow arrays and logging

pub mod arrow;
pub mod date_utils;
pub mod logging;

pub use date_utils::{DAYS_PER_YEAR, format_compact, parse_date_string, years_between};
pub use logging::{log_operation_complete, log_operation_start, log_removed};
