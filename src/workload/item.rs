//! Work item rows
//!
//! A work item is one row of the separation sheet: a package, a box of that
//! package, the station the box visits and the number of items picked there.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{BoxId, PackageId, StationId};
use crate::workload::InputError;

/// Column names accepted for each field, canonical name first
pub mod columns {
    /// Package id column names
    pub const PACKAGE_ID: &[&str] = &["package_id", "ID_Pacote"];
    /// Box id column names
    pub const BOX_ID: &[&str] = &["box_id", "ID_Caixas"];
    /// Station column names
    pub const STATION: &[&str] = &["station", "Estação", "Estacao"];
    /// Item count column names
    pub const ITEM_COUNT: &[&str] = &["item_count", "Contagem de Produto"];
}

/// One row of input: items of a box handled at one station
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    /// Package the box belongs to
    pub package_id: PackageId,
    /// Box being separated
    pub box_id: BoxId,
    /// Station handling this part of the box
    pub station: StationId,
    /// Number of items handled at the station
    pub item_count: u64,
}

impl WorkItem {
    /// Create a new work item
    pub fn new(
        package_id: impl Into<PackageId>,
        box_id: impl Into<BoxId>,
        station: impl Into<StationId>,
        item_count: u64,
    ) -> Self {
        Self {
            package_id: package_id.into(),
            box_id: box_id.into(),
            station: station.into(),
            item_count,
        }
    }

    /// Build a work item from a loosely typed record
    ///
    /// `row` is the 1-based data row used in error messages. Identifiers may
    /// be strings or integers; the item count may be an integer, an integral
    /// float, or a string holding either.
    pub fn from_record(row: usize, record: &Map<String, Value>) -> Result<Self, InputError> {
        let package_id = identifier_field(row, record, columns::PACKAGE_ID)?;
        let box_id = identifier_field(row, record, columns::BOX_ID)?;
        let station = identifier_field(row, record, columns::STATION)?;
        let item_count = count_field(row, record, columns::ITEM_COUNT)?;

        Ok(Self {
            package_id: PackageId::new(package_id),
            box_id: BoxId::new(box_id),
            station: StationId::new(station),
            item_count,
        })
    }
}

/// Find the first present, non-empty value among the accepted column names
fn lookup<'a>(record: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| match record.get(*name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    })
}

fn identifier_field(
    row: usize,
    record: &Map<String, Value>,
    names: &[&str],
) -> Result<String, InputError> {
    let field = names[0];
    let value = lookup(record, names).ok_or_else(|| InputError::missing(row, field))?;

    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Ok(u.to_string())
            } else {
                match n.as_f64() {
                    // Spreadsheet exports often turn integer ids into floats
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(format!("{}", f as i64)),
                    _ => Ok(n.to_string()),
                }
            }
        }
        other => Err(InputError::invalid(row, field, other.to_string(), "expected a string or number")),
    }
}

fn count_field(row: usize, record: &Map<String, Value>, names: &[&str]) -> Result<u64, InputError> {
    let field = names[0];
    let value = lookup(record, names).ok_or_else(|| InputError::missing(row, field))?;

    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u)
            } else {
                integral(n.as_f64())
                    .ok_or_else(|| InputError::invalid(row, field, n.to_string(), "expected a non-negative integer"))
            }
        }
        Value::String(s) => {
            let text = s.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| integral(text.parse::<f64>().ok()))
                .ok_or_else(|| InputError::invalid(row, field, text, "expected a non-negative integer"))
        }
        other => Err(InputError::invalid(row, field, other.to_string(), "expected a number")),
    }
}

/// Accept a float only when it is a non-negative whole number
fn integral(value: Option<f64>) -> Option<u64> {
    match value {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Some(f as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_with_canonical_names() {
        let rec = record(json!({"package_id": "P1", "box_id": 17, "station": "Pick", "item_count": 4}));
        let item = WorkItem::from_record(1, &rec).unwrap();
        assert_eq!(item, WorkItem::new("P1", "17", "Pick", 4));
    }

    #[test]
    fn test_record_with_sheet_headers() {
        let rec = record(json!({
            "ID_Pacote": 3,
            "ID_Caixas": 30.0,
            "Estação": "Mesa 2",
            "Contagem de Produto": "12"
        }));
        let item = WorkItem::from_record(4, &rec).unwrap();
        assert_eq!(item.package_id.as_str(), "3");
        assert_eq!(item.box_id.as_str(), "30");
        assert_eq!(item.station.as_str(), "Mesa 2");
        assert_eq!(item.item_count, 12);
    }

    #[test]
    fn test_missing_field_names_row_and_field() {
        let rec = record(json!({"package_id": "P1", "box_id": "B1", "item_count": 1}));
        let err = WorkItem::from_record(7, &rec).unwrap_err();
        assert_eq!(err, InputError::missing(7, "station"));
        assert_eq!(err.row(), Some(7));
        assert_eq!(err.field(), Some("station"));
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let rec = record(json!({"package_id": "P1", "box_id": " ", "station": "S", "item_count": null}));
        let err = WorkItem::from_record(2, &rec).unwrap_err();
        assert_eq!(err.field(), Some("box_id"));
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let rec = record(json!({"package_id": "P1", "box_id": "B1", "station": "S", "item_count": "many"}));
        let err = WorkItem::from_record(3, &rec).unwrap_err();
        assert_eq!(err.field(), Some("item_count"));
        assert!(err.to_string().contains("many"));
    }

    #[test]
    fn test_negative_and_fractional_counts_are_rejected() {
        for bad in [json!(-1), json!(2.5), json!("-4")] {
            let rec = record(json!({"package_id": "P", "box_id": "B", "station": "S", "item_count": bad}));
            assert!(WorkItem::from_record(1, &rec).is_err());
        }
    }

    #[test]
    fn test_integral_float_count_is_accepted() {
        let rec = record(json!({"package_id": "P", "box_id": "B", "station": "S", "item_count": 6.0}));
        assert_eq!(WorkItem::from_record(1, &rec).unwrap().item_count, 6);
    }
}
