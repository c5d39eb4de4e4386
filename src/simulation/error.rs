//! Error types and handling
//!
//! This module contains the error type returned by every simulation operation.
//! Errors are never retried or swallowed inside the simulator; they go back to
//! the caller with the offending configuration key or input row attached.

use thiserror::Error;

use crate::types::ConfigValidationError;
use crate::workload::InputError;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A configuration value is out of range
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfiguration {
        /// Configuration key at fault
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// An input row is malformed
    #[error("Invalid input{}: {reason}", describe_location(.row, .field))]
    InvalidInput {
        /// 1-based data row, when known
        row: Option<usize>,
        /// Field name, when known
        field: Option<String>,
        /// What is wrong with it
        reason: String,
    },

    /// Run history error
    #[error("History error: {0}")]
    HistoryError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

fn describe_location(row: &Option<usize>, field: &Option<String>) -> String {
    match (row, field) {
        (Some(row), Some(field)) => format!(" at row {}, field '{}'", row, field),
        (Some(row), None) => format!(" at row {}", row),
        (None, Some(field)) => format!(" in field '{}'", field),
        (None, None) => String::new(),
    }
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::InvalidConfiguration { key: error.key(), reason: error.to_string() }
    }
}

impl From<InputError> for SimulationError {
    fn from(error: InputError) -> Self {
        SimulationError::InvalidInput {
            row: error.row(),
            field: error.field().map(str::to_string),
            reason: error.to_string(),
        }
    }
}

impl SimulationError {
    /// Create a configuration error
    pub fn invalid_configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { key: key.into(), reason: reason.into() }
    }

    /// Create an input error for a field of data that has no source row
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput { row: None, field: Some(field.into()), reason: reason.into() }
    }

    /// Create a history error
    pub fn history_error(msg: impl Into<String>) -> Self {
        Self::HistoryError(msg.into())
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::InvalidConfiguration { .. } => "Configuration",
            SimulationError::InvalidInput { .. } => "Input",
            SimulationError::HistoryError(_) => "History",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }

    /// Configuration key for configuration errors
    pub fn config_key(&self) -> Option<&str> {
        match self {
            SimulationError::InvalidConfiguration { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }

    /// Input row for input errors that know it
    pub fn input_row(&self) -> Option<usize> {
        match self {
            SimulationError::InvalidInput { row, .. } => *row,
            _ => None,
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
