//! Box Separation Simulator
//!
//! Estimates how long a batch of boxes takes to separate when every box visits
//! a sequence of stations staffed by a limited number of workers, and reports
//! when the first station saturates.
//!
//! # Overview
//!
//! A run goes through three stages:
//!
//! 1. **Estimator**: orders boxes by a closed-form duration estimate, shortest
//!    first, so long boxes do not hold stations early.
//! 2. **Allocator**: walks boxes in that order and gives each station task to
//!    the earliest available worker of its station. A box's tasks run one
//!    after the other.
//! 3. **Aggregator**: derives total duration, per-station busy time, the first
//!    bottleneck time, per-box duration and the overloaded stations.
//!
//! ## Quick Start
//!
//! ```rust
//! use box_separation_simulator::*;
//!
//! let runner = SimulationRunner::new(SimulationConfig::default())?;
//! let report = runner.run(vec![WorkItem::new("P1", "B1", "Packing", 5)])?;
//!
//! // 5 items * 20 s / 1 worker + 5 s transit
//! assert_eq!(report.summary.total_duration, 105.0);
//! assert_eq!(format_duration(report.summary.total_duration), "1 minute and 45 seconds");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: identifiers, enums and configuration
//! - [`workload`]: input rows, boxes, batches, loaders and synthetic workloads
//! - [`simulation`]: estimator, allocator, aggregator, runner and run history
//! - [`report`]: duration formatting and text/JSON rendering
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Workload   │    │ Simulation  │    │   Report    │
//! │             │    │             │    │             │
//! │ Loader      │───►│ Estimator   │───►│ Durations   │
//! │ Batch       │    │ Allocator   │    │ Text / JSON │
//! │ Generator   │    │ Aggregator  │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                  ▲                  ▲
//!        └──────────────────┼──────────────────┘
//!                    ┌─────────────┐
//!                    │   Types     │
//!                    │ Identifiers │
//!                    │ Config      │
//!                    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod report;
pub mod simulation;
pub mod types;
pub mod workload;

// Core types and identifiers
pub use types::{
    BoxId,
    ComparisonDirection,
    ConfigValidationError,
    InputFormat,
    OutputFormat,
    PackageId,
    RunId,
    // Configuration
    SimulationConfig,
    StationId,
};

// Workload input
pub use workload::{Batch, BoxWork, InputError, WorkItem, WorkloadGenerator};

// Simulation types and functionality
pub use simulation::{
    Allocator, Assignment, SimulationComparison, SimulationError, SimulationHistory,
    SimulationReport, SimulationResult, SimulationRun, SimulationRunner, SimulationState,
    SimulationSummary,
};

// Presentation
pub use report::{format_duration, DurationBreakdown};
