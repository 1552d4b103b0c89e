use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dates::date_stamp;
use crate::error::{ModelError, Result};

/// How bad it was.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map the 1..=4 slider level to a severity.
    pub fn from_level(level: i64) -> Result<Self> {
        match level {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            4 => Ok(Self::Critical),
            other => Err(ModelError::InvalidSeverity(other)),
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A logged grievance, removed once its resolution is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grievance {
    pub details: String,
    pub severity: Severity,
    pub date: String,
    /// Resolve clicks received so far.
    #[serde(default)]
    pub click_count: u32,
}

impl Grievance {
    pub fn new(details: impl Into<String>, severity: Severity) -> Self {
        Self {
            details: details.into(),
            severity,
            date: date_stamp(),
            click_count: 0,
        }
    }
}
