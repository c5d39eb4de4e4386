//! Workload input: rows, boxes and batches
//!
//! This module turns external rows into the boxes the simulator works on.
//!
//! # Overview
//!
//! - **WorkItem**: one input row `(package_id, box_id, station, item_count)`
//! - **BoxWork / Batch**: rows grouped into boxes, plus the closed station set
//! - **Loader**: CSV, JSON and JSON Lines readers with row/field error context
//! - **WorkloadGenerator**: seeded synthetic workloads
//!
//! # Usage Example
//!
//! ```rust
//! use box_separation_simulator::workload::*;
//! use box_separation_simulator::types::InputFormat;
//!
//! let text = "package_id,box_id,station,item_count\n1,10,Pick,3\n1,10,Pack,1\n";
//! let items = parse_work_items(text, InputFormat::Csv).unwrap();
//! let batch = Batch::from_items(items);
//!
//! assert_eq!(batch.box_count(), 1);
//! assert_eq!(batch.boxes()[0].total_items(), 4);
//! assert_eq!(batch.stations().len(), 2);
//! ```

pub mod batch;
pub mod generator;
pub mod item;
pub mod loader;

// Re-export all public types for convenience
pub use batch::*;
pub use generator::*;
pub use item::*;
pub use loader::*;
