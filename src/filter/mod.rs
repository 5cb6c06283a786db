//! Row filters over record batches
//!
//! [`core`] holds the shared mask application and the [`BatchFilter`] trait;
//! [`multiplicity`] removes subjects with repeated values on a single date.

pub mod core;
pub mod multiplicity;

pub use core::{BatchFilter, filter_record_batch};
pub use multiplicity::{
    MultiplicityFilter, remove_multiple_instances, retain_single_instance_subjects,
    retain_single_measurement_subjects,
};
