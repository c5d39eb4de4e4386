//! Box duration estimates and processing order
//!
//! The estimate of a box is
//!
//! ```text
//! (total_items * time_per_item) / workers_per_station
//!     + station_count * transit_time_per_station
//!     + extra_time_per_box
//! ```
//!
//! It only decides the processing order (shortest estimate first); the
//! simulated duration comes from the allocator.

use serde::{Deserialize, Serialize};

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{BoxId, SimulationConfig};
use crate::workload::{Batch, BoxWork};

/// A box's position in the processing order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxEstimate {
    /// Box identifier
    pub box_id: BoxId,
    /// Index of the box in [`Batch::boxes`]
    pub batch_index: usize,
    /// Estimated duration in seconds
    pub estimated_duration: f64,
}

/// Estimate the duration of one box
pub fn estimate_box_duration(work: &BoxWork, config: &SimulationConfig) -> SimulationResult<f64> {
    if !config.workers_per_station.is_finite() || config.workers_per_station <= 0.0 {
        return Err(SimulationError::invalid_configuration(
            "workers_per_station",
            format!("must be greater than 0, got {}", config.workers_per_station),
        ));
    }

    let handling = (work.total_items() as f64 * config.time_per_item) / config.workers_per_station;
    let transit = work.station_count() as f64 * config.transit_time_per_station;

    Ok(handling + transit + config.extra_time_per_box)
}

/// Order the boxes of a batch by ascending estimate
///
/// Ties keep batch order.
pub fn order_boxes(batch: &Batch, config: &SimulationConfig) -> SimulationResult<Vec<BoxEstimate>> {
    let mut estimates = batch
        .boxes()
        .iter()
        .enumerate()
        .map(|(batch_index, work)| {
            Ok(BoxEstimate {
                box_id: work.box_id.clone(),
                batch_index,
                estimated_duration: estimate_box_duration(work, config)?,
            })
        })
        .collect::<SimulationResult<Vec<_>>>()?;

    estimates.sort_by(|a, b| a.estimated_duration.total_cmp(&b.estimated_duration));
    Ok(estimates)
}
