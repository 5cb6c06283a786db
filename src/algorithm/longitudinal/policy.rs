//! Subject selection and column sourcing policies for longitudinal tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which subjects qualify for an N-column longitudinal table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountSelection {
    /// Only subjects with exactly N dates
    Exact,
    /// Subjects with at least N dates
    AtLeast,
}

impl CountSelection {
    /// Build from the strict-match flag used by callers of the table builder
    #[must_use]
    pub const fn from_strict(strict_count_match: bool) -> Self {
        if strict_count_match { Self::Exact } else { Self::AtLeast }
    }

    /// Whether a subject with `date_count` dates qualifies for `column_count` columns
    #[must_use]
    pub const fn accepts(self, date_count: usize, column_count: usize) -> bool {
        match self {
            Self::Exact => date_count == column_count,
            Self::AtLeast => date_count >= column_count,
        }
    }
}

impl fmt::Display for CountSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact count"),
            Self::AtLeast => write!(f, "at least count"),
        }
    }
}

/// Where each numbered date column takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSourcePolicy {
    /// Column k is the k-th chronological date
    Chronological,
    /// As `Chronological`, except the final column is the subject's last date
    LastDateOverride,
}

impl ColumnSourcePolicy {
    /// Build from the always-use-last-date flag
    #[must_use]
    pub const fn from_always_use_last(always_use_last_date: bool) -> Self {
        if always_use_last_date {
            Self::LastDateOverride
        } else {
            Self::Chronological
        }
    }

    /// Index into a subject's sorted dates for 1-based column `k` of `column_count`
    ///
    /// `date_count` must be at least `column_count`.
    #[must_use]
    pub const fn source_index(self, k: usize, column_count: usize, date_count: usize) -> usize {
        match self {
            Self::LastDateOverride if k == column_count => date_count - 1,
            _ => k - 1,
        }
    }
}

impl fmt::Display for ColumnSourcePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chronological => write!(f, "chronological"),
            Self::LastDateOverride => write!(f, "last date override"),
        }
    }
}
