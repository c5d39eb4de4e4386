//! Identifier types for the separation simulator
//!
//! Packages, boxes and stations are identified by whatever the input sheet
//! carries in their columns, so these identifiers wrap strings. Ordering is
//! natural: identifiers that parse as integers come first and compare
//! numerically, all other identifiers follow and compare lexicographically.
//! Ties between equal numbers such as `07` and `7` fall back to the raw text,
//! so the order stays total.
//!
//! Simulation runs get a [`RunId`] built from the input name and a timestamp,
//! or from a random UUID when there is no input name.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Compare two identifier strings, integers before text
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                natural_cmp(&self.0, &other.0)
            }
        }
    };
}

string_identifier!(
    /// Identifier of the package a box belongs to
    PackageId
);

string_identifier!(
    /// Identifier of a box, the unit of work moved between stations
    BoxId
);

string_identifier!(
    /// Identifier of a processing station
    StationId
);

/// Identifier of a single simulation run, used as the history key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Timestamp layout appended to the input name
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d_%Hh%Mmin";

    /// Build a run id from an input name (file stem) and the time of the run
    pub fn from_input(stem: &str, at: DateTime<Local>) -> Self {
        Self(format!("{}_{}", stem, at.format(Self::TIMESTAMP_FORMAT)))
    }

    /// Build a random run id for runs without an input name
    pub fn generated() -> Self {
        Self(format!("run_{}", Uuid::new_v4().simple()))
    }

    /// Borrow the raw id text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let mut ids = vec![BoxId::new("10"), BoxId::new("9"), BoxId::new("100")];
        ids.sort();
        assert_eq!(ids, vec![BoxId::new("9"), BoxId::new("10"), BoxId::new("100")]);
    }

    #[test]
    fn test_text_ids_sort_lexicographically() {
        let mut ids = vec![StationId::new("B"), StationId::new("A2"), StationId::new("A10")];
        ids.sort();
        assert_eq!(ids, vec![StationId::new("A10"), StationId::new("A2"), StationId::new("B")]);
    }

    #[test]
    fn test_numeric_ids_sort_before_text_ids() {
        assert_eq!(natural_cmp("7", "A"), Ordering::Less);
        assert_eq!(natural_cmp("A", "7"), Ordering::Greater);
        assert_eq!(natural_cmp("10", "1a"), Ordering::Less);
        assert_eq!(natural_cmp("1a", "9"), Ordering::Greater);
    }

    #[test]
    fn test_mixed_ordering_is_transitive() {
        let ids = ["9", "10", "1a", "07", "7", "A", "-3", " 8"];
        for a in ids {
            for b in ids {
                assert_eq!(natural_cmp(a, b), natural_cmp(b, a).reverse(), "{a} vs {b}");
                for c in ids {
                    if natural_cmp(a, b) == Ordering::Less && natural_cmp(b, c) == Ordering::Less {
                        assert_eq!(natural_cmp(a, c), Ordering::Less, "{a} < {b} < {c}");
                    }
                }
            }
        }

        let mut sorted: Vec<StationId> = ["1a", "10", "9"].into_iter().map(StationId::new).collect();
        sorted.sort();
        assert_eq!(sorted, vec![StationId::new("9"), StationId::new("10"), StationId::new("1a")]);
    }

    #[test]
    fn test_equal_numbers_with_padding_are_distinct() {
        assert_ne!(natural_cmp("07", "7"), Ordering::Equal);
        assert_eq!(BoxId::new("07") == BoxId::new("7"), false);
    }

    #[test]
    fn test_identifier_serializes_as_plain_string() {
        let id = StationId::new("Packing");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"Packing\"");
        let back: StationId = serde_json::from_str("\"Packing\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_run_id_from_input() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        let id = RunId::from_input("orders", at);
        assert_eq!(id.as_str(), "orders_2024-03-05_14h07min");
    }

    #[test]
    fn test_generated_run_ids_are_unique() {
        let a = RunId::generated();
        let b = RunId::generated();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("run_"));
    }
}
