//! Subject identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a cohort member
///
/// Integer identifiers order numerically and text identifiers lexicographically.
/// In a table mixing both, integers sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    /// Numeric identifier
    Int(i64),
    /// Text identifier
    Text(String),
}

impl SubjectId {
    /// Whether this identifier is numeric
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}
