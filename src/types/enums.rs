//! Enumeration types for the separation simulator
//!
//! This module contains the enumerations shared across the crate: report
//! output formats, input file formats, duration units and the direction of a
//! run-to-run comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for the simulation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text report
    Text,
    /// JSON document with the full summary
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "TEXT"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Layout of an input file holding work item rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputFormat {
    /// Comma separated values with a header row
    Csv,
    /// A JSON array of row objects
    Json,
    /// One JSON row object per line
    JsonLines,
}

impl InputFormat {
    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(InputFormat::Csv),
            "json" => Some(InputFormat::Json),
            "jsonl" | "ndjson" => Some(InputFormat::JsonLines),
            _ => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Csv => write!(f, "CSV"),
            InputFormat::Json => write!(f, "JSON"),
            InputFormat::JsonLines => write!(f, "JSON Lines"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("Unknown input format: {}", s))
    }
}

/// Components of a duration breakdown, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurationUnit {
    /// 86 400 seconds
    Day,
    /// 3 600 seconds
    Hour,
    /// 60 seconds
    Minute,
    /// One second
    Second,
}

impl DurationUnit {
    /// Word for this unit, singular only for a value of exactly one
    pub fn word(self, value: u64) -> &'static str {
        let singular = value == 1;
        match (self, singular) {
            (DurationUnit::Day, true) => "day",
            (DurationUnit::Day, false) => "days",
            (DurationUnit::Hour, true) => "hour",
            (DurationUnit::Hour, false) => "hours",
            (DurationUnit::Minute, true) => "minute",
            (DurationUnit::Minute, false) => "minutes",
            (DurationUnit::Second, true) => "second",
            (DurationUnit::Second, false) => "seconds",
        }
    }
}

/// Whether a compared run got faster or slower than its base run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonDirection {
    /// The compared run finishes sooner
    Improved,
    /// The compared run takes as long or longer
    Increased,
}

impl fmt::Display for ComparisonDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonDirection::Improved => write!(f, "improved"),
            ComparisonDirection::Increased => write!(f, "increased"),
        }
    }
}
