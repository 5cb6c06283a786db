//! Arrow helpers shared by the table conversions.

pub mod array_utils;
pub mod builders;

pub use array_utils::{
    date_value, date_values, downcast_array, float64_column, get_column, memory_profile,
    subject_id_value,
};
pub use builders::{date32_array, subject_id_array, subject_id_field};
