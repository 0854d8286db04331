//! Shared primitive types used across the analytics pipeline.

use serde::{Deserialize, Serialize};

/// A column header as it appears in the source file.
pub type ColumnName = String;

/// Identifier of a segment dimension, e.g. "Geography" or "AgeGroup".
pub type Dimension = String;

/// Three-tier classification shared by segment risk, insight priority
/// and implementation effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High   => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low    => "LOW",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier of a segment, derived from its churn rate.
pub type RiskLevel = Level;

/// Priority of an executive insight, or effort of a product insight.
pub type Priority = Level;
