//! Configuration for cohort timeline operations.
//!
//! Every operation takes its own small configuration struct. `TimelineConfig`
//! bundles them for callers that drive the whole pipeline from one place,
//! for example from a JSON document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::algorithm::longitudinal::policy::{ColumnSourcePolicy, CountSelection};
use crate::error::{CohortError, Result};

/// Column names used when reading and writing cohort tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableColumns {
    /// Subject identifier column
    pub subject_id: String,
    /// Event date column
    pub date: String,
    /// Measurement column
    pub measurement: String,
    /// Stem for numbered date columns in wide tables (`{stem}_{k}`)
    pub date_stem: String,
    /// Stem for numbered measurement columns in wide tables (`{stem}_{k}`)
    pub measurement_stem: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            subject_id: "subject_id".to_string(),
            date: "date".to_string(),
            measurement: "measurement".to_string(),
            date_stem: "date".to_string(),
            measurement_stem: "measurement".to_string(),
        }
    }
}

impl TableColumns {
    /// Override the subject identifier column name
    #[must_use]
    pub fn with_subject_id(mut self, name: impl Into<String>) -> Self {
        self.subject_id = name.into();
        self
    }

    /// Override the date column name
    #[must_use]
    pub fn with_date(mut self, name: impl Into<String>) -> Self {
        self.date = name.into();
        self
    }

    /// Override the measurement column name
    #[must_use]
    pub fn with_measurement(mut self, name: impl Into<String>) -> Self {
        self.measurement = name.into();
        self
    }

    /// Override the stems used for numbered wide-table columns
    #[must_use]
    pub fn with_stems(mut self, date_stem: impl Into<String>, measurement_stem: impl Into<String>) -> Self {
        self.date_stem = date_stem.into();
        self.measurement_stem = measurement_stem.into();
        self
    }

    /// Name of the k-th (1-based) numbered date column
    #[must_use]
    pub fn date_column(&self, k: usize) -> String {
        format!("{}_{k}", self.date_stem)
    }

    /// Name of the k-th (1-based) numbered measurement column
    #[must_use]
    pub fn measurement_column(&self, k: usize) -> String {
        format!("{}_{k}", self.measurement_stem)
    }
}

/// Configuration for date format handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// Format used when rendering dates as text
    pub default_format: String,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d/%m/%Y".to_string(), // UK: 15/01/2023
                "%d.%m.%Y".to_string(), // 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
                "%d %b %Y".to_string(), // 15 Jan 2023
                "%d %B %Y".to_string(), // 15 January 2023
            ],
            default_format: "%Y-%m-%d".to_string(),
            enable_format_detection: true,
        }
    }
}

impl DateFormatConfig {
    /// Accept only ISO `YYYY-MM-DD` dates, without heuristics
    #[must_use]
    pub fn iso_only() -> Self {
        Self {
            date_formats: vec!["%Y-%m-%d".to_string()],
            default_format: "%Y-%m-%d".to_string(),
            enable_format_detection: false,
        }
    }
}

/// Configuration for interval generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    /// Emit an extra first-to-last interval for subjects with more than two dates
    pub include_longest: bool,
    /// Round interval lengths (years) to this many decimal places
    pub decimal_places: Option<u32>,
}

impl IntervalConfig {
    /// Enable or disable the longest-span interval
    #[must_use]
    pub fn with_longest(mut self, include_longest: bool) -> Self {
        self.include_longest = include_longest;
        self
    }

    /// Round interval lengths to the given number of decimals
    #[must_use]
    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = Some(places);
        self
    }
}

/// Configuration for longitudinal table construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongitudinalConfig {
    /// Number of dated measurements to tabulate per subject
    pub column_count: usize,
    /// Which subjects qualify based on their date count
    pub selection: CountSelection,
    /// Where each numbered date column takes its value from
    pub column_source: ColumnSourcePolicy,
}

impl Default for LongitudinalConfig {
    fn default() -> Self {
        Self {
            column_count: 2,
            selection: CountSelection::AtLeast,
            column_source: ColumnSourcePolicy::Chronological,
        }
    }
}

impl LongitudinalConfig {
    /// Create a configuration tabulating `column_count` measurements
    #[must_use]
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count,
            ..Self::default()
        }
    }

    /// Set the count selection policy
    #[must_use]
    pub fn with_selection(mut self, selection: CountSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the column source policy
    #[must_use]
    pub fn with_column_source(mut self, column_source: ColumnSourcePolicy) -> Self {
        self.column_source = column_source;
        self
    }

    /// Check the configuration before any rows are built
    pub fn validate(&self) -> Result<()> {
        if self.column_count < 1 {
            return Err(CohortError::InvalidColumnCount {
                requested: self.column_count,
            });
        }
        Ok(())
    }
}

impl fmt::Display for LongitudinalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Longitudinal Configuration:")?;
        writeln!(f, "  Column Count: {}", self.column_count)?;
        writeln!(f, "  Selection: {}", self.selection)?;
        writeln!(f, "  Column Source: {}", self.column_source)?;
        Ok(())
    }
}

/// Configuration for temporal thinning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinningConfig {
    /// Minimum spacing in days; gaps (or accumulated gaps) must exceed it
    pub threshold_days: i64,
}

impl ThinningConfig {
    /// Create a thinning configuration with the given spacing in days
    #[must_use]
    pub const fn new(threshold_days: i64) -> Self {
        Self { threshold_days }
    }
}

/// Umbrella configuration for a full timeline pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Input and output column names
    pub columns: TableColumns,
    /// Date parsing formats
    pub date_formats: DateFormatConfig,
    /// Interval generation options
    pub intervals: IntervalConfig,
    /// Longitudinal table options
    pub longitudinal: LongitudinalConfig,
    /// Optional thinning applied to the raw events first
    pub thinning: Option<ThinningConfig>,
}

impl TimelineConfig {
    /// Parse a configuration from a JSON document
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CohortError::validation(format!("Invalid timeline configuration: {e}")))?;
        config.longitudinal.validate()?;
        Ok(config)
    }

    /// Render the configuration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CohortError::validation(format!("Failed to serialize configuration: {e}")))
    }
}

impl fmt::Display for TimelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timeline Configuration:")?;
        writeln!(
            f,
            "  Columns: {} / {} / {}",
            self.columns.subject_id, self.columns.date, self.columns.measurement
        )?;
        writeln!(f, "  Include Longest Interval: {}", self.intervals.include_longest)?;
        if let Some(places) = self.intervals.decimal_places {
            writeln!(f, "  Interval Decimal Places: {places}")?;
        }
        write!(f, "{}", self.longitudinal)?;
        if let Some(thinning) = self.thinning {
            writeln!(f, "  Thinning Threshold (days): {}", thinning.threshold_days)?;
        }
        Ok(())
    }
}
