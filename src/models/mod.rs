//! Domain models for cohort timelines
//!
//! Events are the raw input; every other model is derived from them by one of
//! the algorithms and carries its own Arrow table conversion.

pub mod date_group;
pub mod event;
pub mod event_schema_constructors;
pub mod interval;
pub mod longitudinal;
pub mod subject;
pub mod thinned;

pub use date_group::DateGroup;
pub use event::{Event, count_by_subject, remove_empty_measurement_rows};
pub use interval::IntervalRecord;
pub use longitudinal::{DerivedRecord, LongitudinalRecord, LongitudinalTable, retain_finite_rates};
pub use subject::SubjectId;
pub use thinned::ThinnedSeries;
