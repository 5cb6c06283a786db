//! Logging utilities
//!
//! Standardized log lines for the row-count side effects of each operation.
//! These never influence control flow.

use std::time::Duration;

/// Log an operation start with consistent format
pub fn log_operation_start(operation: &str, rows: usize) {
    log::debug!("{operation}: starting on {rows} rows");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `items` - Number of items produced
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, items: usize, elapsed: Option<Duration>) {
    if let Some(duration) = elapsed {
        log::info!("{operation}: produced {items} rows in {duration:?}");
    } else {
        log::info!("{operation}: produced {items} rows");
    }
}

/// Log how many rows a filtering step removed and kept
pub fn log_removed(operation: &str, removed: usize, remaining: usize) {
    log::info!("{operation}: {removed} removed, {remaining} remain");
}
