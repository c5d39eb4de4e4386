//! Simulation runner
//!
//! This module contains the SimulationRunner, which chains the estimator,
//! allocator and aggregator over one batch of work items.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::simulation::{
    order_boxes, summarize, Allocator, Assignment, BoxEstimate, SimulationResult, SimulationState,
    SimulationSummary,
};
use crate::types::SimulationConfig;
use crate::workload::{Batch, WorkItem};

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Aggregate metrics
    pub summary: SimulationSummary,
    /// Processing order with estimates
    pub order: Vec<BoxEstimate>,
    /// Every station task in processing order
    pub assignments: Vec<Assignment>,
}

/// Runs simulations for one validated configuration
///
/// The runner holds no state between runs; every call to [`run`](Self::run)
/// starts from idle workers.
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    /// Create a runner, rejecting invalid configurations up front
    #[instrument(skip(config), fields(
        workers_per_station = config.workers_per_station,
        station_capacity = config.station_capacity
    ))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        info!("Simulation runner ready");
        Ok(Self { config })
    }

    /// Configuration used by this runner
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate a sequence of work items
    #[instrument(skip_all, fields(items = items.len()))]
    pub fn run(&self, items: Vec<WorkItem>) -> SimulationResult<SimulationReport> {
        let batch = Batch::from_items(items);
        self.run_batch(&batch)
    }

    /// Simulate a prepared batch
    pub fn run_batch(&self, batch: &Batch) -> SimulationResult<SimulationReport> {
        info!(
            boxes = batch.box_count(),
            stations = batch.stations().len(),
            "Starting separation simulation"
        );

        let order = order_boxes(batch, &self.config)?;
        let state = SimulationState::for_batch(batch, &self.config);
        let outcome = Allocator::new(&self.config).run(state, batch, &order)?;
        let summary = summarize(&outcome, batch);

        info!(
            total_duration = summary.total_duration,
            bottleneck = ?summary.bottleneck_time,
            overloaded = summary.overloaded_stations.len(),
            "Simulation finished"
        );

        let assignments = outcome.assignments().cloned().collect();
        Ok(SimulationReport { summary, order, assignments })
    }
}
