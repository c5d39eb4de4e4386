//! Input loading
//!
//! Reads work item rows from CSV, JSON or JSON Lines. Every row is validated
//! before any simulation starts; the first bad row stops loading and the error
//! names the row and the field.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::types::InputFormat;
use crate::workload::WorkItem;

/// Errors raised while reading input rows
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A required field is absent or blank
    #[error("Row {row}: missing required field '{field}'")]
    MissingField {
        /// 1-based data row
        row: usize,
        /// Canonical field name
        field: String,
    },

    /// A field holds a value of the wrong shape
    #[error("Row {row}: invalid value '{value}' for field '{field}': {reason}")]
    InvalidField {
        /// 1-based data row
        row: usize,
        /// Canonical field name
        field: String,
        /// The offending value as text
        value: String,
        /// What was expected
        reason: String,
    },

    /// A row could not be split into fields
    #[error("Row {row}: {reason}")]
    MalformedRow {
        /// 1-based data row
        row: usize,
        /// What went wrong
        reason: String,
    },

    /// The document as a whole could not be parsed
    #[error("Malformed input document: {0}")]
    MalformedDocument(String),

    /// The input could not be read
    #[error("Failed to read input {path}: {reason}")]
    Unreadable {
        /// Path of the input
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// The input format could not be determined or is not supported
    #[error("Unsupported input format: {0} (supported: .csv, .json, .jsonl)")]
    UnsupportedFormat(String),
}

impl InputError {
    /// Create a missing-field error
    pub fn missing(row: usize, field: &str) -> Self {
        Self::MissingField { row, field: field.to_string() }
    }

    /// Create an invalid-field error
    pub fn invalid(row: usize, field: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            row,
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed-row error
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow { row, reason: reason.into() }
    }

    /// Row the error refers to, when it refers to one
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::MissingField { row, .. } | Self::InvalidField { row, .. } | Self::MalformedRow { row, .. } => {
                Some(*row)
            }
            _ => None,
        }
    }

    /// Field the error refers to, when it refers to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

/// Load work items from a file, picking the format from the extension when not given
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_work_items<P: AsRef<Path>>(
    path: P,
    format: Option<InputFormat>,
) -> Result<Vec<WorkItem>, InputError> {
    let path = path.as_ref();

    let format = match format {
        Some(format) => format,
        None => {
            let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("no extension");
            InputFormat::from_extension(ext).ok_or_else(|| InputError::UnsupportedFormat(ext.to_string()))?
        }
    };

    let text = fs::read_to_string(path).map_err(|e| InputError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let items = parse_work_items(&text, format)?;
    info!("Loaded {} work items from {} input", items.len(), format);
    Ok(items)
}

/// Parse work items from text in the given format
pub fn parse_work_items(text: &str, format: InputFormat) -> Result<Vec<WorkItem>, InputError> {
    match format {
        InputFormat::Csv => parse_csv(text),
        InputFormat::Json => parse_json(text),
        InputFormat::JsonLines => parse_json_lines(text),
    }
}

/// Parse a JSON array of row objects
pub fn parse_json(text: &str) -> Result<Vec<WorkItem>, InputError> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| InputError::MalformedDocument(e.to_string()))?;

    let rows = document
        .as_array()
        .ok_or_else(|| InputError::MalformedDocument("expected a JSON array of rows".to_string()))?;

    rows.iter()
        .enumerate()
        .map(|(index, value)| {
            let row = index + 1;
            let record = value
                .as_object()
                .ok_or_else(|| InputError::malformed(row, "expected a JSON object"))?;
            WorkItem::from_record(row, record)
        })
        .collect()
}

/// Parse one JSON row object per line; blank lines are skipped
pub fn parse_json_lines(text: &str) -> Result<Vec<WorkItem>, InputError> {
    let mut items = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let row = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|e| InputError::malformed(row, format!("invalid JSON: {}", e)))?;
        let record = value
            .as_object()
            .ok_or_else(|| InputError::malformed(row, "expected a JSON object"))?;
        items.push(WorkItem::from_record(row, record)?);
    }

    Ok(items)
}

/// Parse CSV with a header row
///
/// The delimiter is a comma unless the header only contains semicolons, as
/// spreadsheet exports in comma-decimal locales do. Quoted fields may contain
/// the delimiter and doubled quotes but not line breaks. Rows are numbered
/// from 1 starting at the first line after the header.
pub fn parse_csv(text: &str) -> Result<Vec<WorkItem>, InputError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines();

    let header_line = lines
        .by_ref()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| InputError::MalformedDocument("missing CSV header".to_string()))?;

    let delimiter = detect_delimiter(header_line);
    let header = split_csv_line(header_line, delimiter)
        .map_err(|reason| InputError::MalformedDocument(format!("bad CSV header: {}", reason)))?;
    let header: Vec<String> = header.into_iter().map(|name| name.trim().to_string()).collect();
    debug!("CSV header {:?} with delimiter {:?}", header, delimiter);

    let mut items = Vec::new();
    for (index, line) in lines.enumerate() {
        let row = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let cells = split_csv_line(line, delimiter).map_err(|reason| InputError::malformed(row, reason))?;
        if cells.len() > header.len() {
            return Err(InputError::malformed(
                row,
                format!("expected at most {} fields, found {}", header.len(), cells.len()),
            ));
        }

        let record: Map<String, Value> = header
            .iter()
            .zip(cells)
            .map(|(name, cell)| (name.clone(), Value::String(cell)))
            .collect();
        items.push(WorkItem::from_record(row, &record)?);
    }

    Ok(items)
}

fn detect_delimiter(header: &str) -> char {
    if !header.contains(',') && header.contains(';') {
        ';'
    } else {
        ','
    }
}

/// Split one CSV line into unquoted cells
fn split_csv_line(line: &str, delimiter: char) -> Result<Vec<String>, String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            cells.push(std::mem::take(&mut cell));
        } else {
            cell.push(c);
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    cells.push(cell);
    Ok(cells)
}
