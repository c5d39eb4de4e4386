//! Simulation pipeline
//!
//! This module contains the three stages of a run plus the pieces around
//! them: error handling, logging and run history.
//!
//! # Overview
//!
//! - **Estimator**: orders boxes shortest-estimate-first
//! - **Allocator**: places every station task on the earliest free worker
//! - **Aggregator**: folds the allocation into a [`SimulationSummary`]
//! - **SimulationRunner**: validates a configuration and chains the stages
//! - **SimulationHistory**: bounded record of past runs and their comparison
//!
//! # Usage Example
//!
//! ```rust
//! use box_separation_simulator::simulation::*;
//! use box_separation_simulator::types::*;
//! use box_separation_simulator::workload::WorkItem;
//!
//! let config = SimulationConfig { station_capacity: 1, ..Default::default() };
//! let runner = SimulationRunner::new(config).unwrap();
//!
//! let report = runner
//!     .run(vec![
//!         WorkItem::new("1", "A", "Pick", 1),
//!         WorkItem::new("1", "B", "Pick", 1),
//!     ])
//!     .unwrap();
//!
//! // One worker, two boxes of 25 seconds each
//! assert_eq!(report.summary.total_duration, 50.0);
//! assert_eq!(report.summary.bottleneck_time, Some(25.0));
//! ```

pub mod aggregator;
pub mod allocator;
pub mod error;
pub mod estimator;
pub mod history;
pub mod logging;
pub mod orchestrator;

// Re-export all public types for convenience
pub use aggregator::*;
pub use allocator::*;
pub use error::*;
pub use estimator::*;
pub use history::*;
pub use logging::*;
pub use orchestrator::*;
