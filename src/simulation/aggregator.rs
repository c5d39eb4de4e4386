//! Run summaries
//!
//! Folds an [`AllocationOutcome`] into the numbers a planner looks at: total
//! duration, busy time per station, the first bottleneck and per-box finish
//! times.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::simulation::AllocationOutcome;
use crate::types::{BoxId, StationId};
use crate::workload::Batch;

/// Busy time above this multiple of the mean marks a station as overloaded
pub const OVERLOAD_FACTOR: f64 = 1.5;

/// Aggregate result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Latest box finish time in seconds
    pub total_duration: f64,
    /// Cumulative work time per station
    pub per_station_busy_time: BTreeMap<StationId, f64>,
    /// Start time of the first task that met a full station, if any
    pub bottleneck_time: Option<f64>,
    /// Number of distinct boxes
    pub box_count: usize,
    /// Finish time per box
    pub per_box_duration: BTreeMap<BoxId, f64>,
    /// Stations whose busy time exceeds 1.5 times the mean
    pub overloaded_stations: BTreeSet<StationId>,
}

impl SimulationSummary {
    /// Whether a bottleneck was recorded
    pub fn has_bottleneck(&self) -> bool {
        self.bottleneck_time.is_some()
    }

    /// Total busy time over all stations
    pub fn total_busy_time(&self) -> f64 {
        self.per_station_busy_time.values().sum()
    }

    /// Mean busy time per station, 0 without stations
    pub fn mean_busy_time(&self) -> f64 {
        mean(&self.per_station_busy_time)
    }

    /// Fraction of all busy time spent at `station`
    ///
    /// Returns 0 for unknown stations or when no work was done.
    pub fn station_share(&self, station: &StationId) -> f64 {
        let total = self.total_busy_time();
        if total <= 0.0 {
            return 0.0;
        }
        self.per_station_busy_time.get(station).map_or(0.0, |busy| busy / total)
    }

    /// Stations below the mean busy time, candidates to take over work
    pub fn underused_stations(&self) -> Vec<&StationId> {
        let mean = self.mean_busy_time();
        self.per_station_busy_time
            .iter()
            .filter(|&(_, &busy)| busy < mean)
            .map(|(station, _)| station)
            .collect()
    }

    /// Stations ordered by busy time, busiest first
    pub fn stations_by_load(&self) -> Vec<(&StationId, f64)> {
        let mut stations: Vec<_> = self.per_station_busy_time.iter().map(|(s, &b)| (s, b)).collect();
        stations.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        stations
    }
}

fn mean(busy: &BTreeMap<StationId, f64>) -> f64 {
    if busy.is_empty() {
        0.0
    } else {
        busy.values().sum::<f64>() / busy.len() as f64
    }
}

/// Stations whose busy time exceeds [`OVERLOAD_FACTOR`] times the mean
pub fn overloaded_stations(busy: &BTreeMap<StationId, f64>) -> BTreeSet<StationId> {
    let threshold = OVERLOAD_FACTOR * mean(busy);
    busy.iter()
        .filter(|&(_, &time)| time > threshold)
        .map(|(station, _)| station.clone())
        .collect()
}

/// Summarize an allocation of `batch`
pub fn summarize(outcome: &AllocationOutcome, batch: &Batch) -> SimulationSummary {
    let per_station_busy_time = outcome.state.busy_time().clone();
    let per_box_duration =
        outcome.boxes.iter().map(|b| (b.box_id.clone(), b.finish)).collect();

    SimulationSummary {
        total_duration: outcome.state.total_duration(),
        overloaded_stations: overloaded_stations(&per_station_busy_time),
        per_station_busy_time,
        bottleneck_time: outcome.state.bottleneck_time(),
        box_count: batch.box_count(),
        per_box_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy(pairs: &[(&str, f64)]) -> BTreeMap<StationId, f64> {
        pairs.iter().map(|(s, b)| (StationId::new(*s), *b)).collect()
    }

    fn summary(pairs: &[(&str, f64)]) -> SimulationSummary {
        let per_station_busy_time = busy(pairs);
        SimulationSummary {
            total_duration: 0.0,
            overloaded_stations: overloaded_stations(&per_station_busy_time),
            per_station_busy_time,
            bottleneck_time: None,
            box_count: 0,
            per_box_duration: BTreeMap::new(),
        }
    }

    #[test]
    fn test_overloaded_stations_above_threshold() {
        // Mean is 40, threshold 60
        let overloaded = overloaded_stations(&busy(&[("A", 100.0), ("B", 10.0), ("C", 10.0)]));
        assert_eq!(overloaded.into_iter().collect::<Vec<_>>(), vec![StationId::new("A")]);
    }

    #[test]
    fn test_overload_threshold_is_strict() {
        // Mean is 40, B sits exactly at 1.5x
        let overloaded = overloaded_stations(&busy(&[("A", 20.0), ("B", 60.0), ("C", 40.0)]));
        assert!(overloaded.is_empty());
    }

    #[test]
    fn test_overloaded_stations_empty_input() {
        assert!(overloaded_stations(&BTreeMap::new()).is_empty());
        assert!(overloaded_stations(&busy(&[("A", 0.0), ("B", 0.0)])).is_empty());
    }

    #[test]
    fn test_station_share() {
        let s = summary(&[("A", 30.0), ("B", 10.0)]);
        assert_eq!(s.station_share(&StationId::new("A")), 0.75);
        assert_eq!(s.station_share(&StationId::new("Z")), 0.0);
        assert_eq!(summary(&[("A", 0.0)]).station_share(&StationId::new("A")), 0.0);
    }

    #[test]
    fn test_load_ordering_and_underused() {
        let s = summary(&[("A", 10.0), ("B", 50.0), ("C", 30.0)]);
        let order: Vec<&str> = s.stations_by_load().into_iter().map(|(st, _)| st.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);

        let under: Vec<&str> = s.underused_stations().into_iter().map(StationId::as_str).collect();
        assert_eq!(under, vec!["A"]);
    }

    #[test]
    fn test_has_bottleneck() {
        let mut s = summary(&[]);
        assert!(!s.has_bottleneck());
        s.bottleneck_time = Some(20.0);
        assert!(s.has_bottleneck());
    }
}
