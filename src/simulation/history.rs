//! Run history and run-to-run comparison
//!
//! The history is a bounded FIFO of recent runs owned by the caller. The
//! allocator never reads it. Comparing the two latest runs tells a planner
//! whether a new separation sheet or configuration made things faster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::simulation::{SimulationError, SimulationResult, SimulationSummary};
use crate::types::{defaults, ComparisonDirection, RunId, SimulationConfig, StationId};

/// A recorded simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    /// Run identifier
    pub id: RunId,
    /// When the run was recorded
    pub recorded_at: DateTime<Utc>,
    /// Configuration the run used
    pub config: SimulationConfig,
    /// Result of the run
    pub summary: SimulationSummary,
}

impl SimulationRun {
    /// Record a run now
    pub fn new(id: RunId, config: SimulationConfig, summary: SimulationSummary) -> Self {
        Self { id, recorded_at: Utc::now(), config, summary }
    }
}

/// Bounded history of recent runs, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistory {
    limit: usize,
    runs: VecDeque<SimulationRun>,
}

impl Default for SimulationHistory {
    fn default() -> Self {
        Self { limit: defaults::HISTORY_LIMIT, runs: VecDeque::new() }
    }
}

impl SimulationHistory {
    /// Create an empty history holding at most `limit` runs
    pub fn new(limit: usize) -> SimulationResult<Self> {
        if limit == 0 {
            return Err(SimulationError::history_error("history limit must be at least 1"));
        }
        Ok(Self { limit, runs: VecDeque::with_capacity(limit) })
    }

    /// Maximum number of runs kept
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of runs kept
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Runs, oldest first
    pub fn runs(&self) -> impl Iterator<Item = &SimulationRun> {
        self.runs.iter()
    }

    /// Run ids, oldest first
    pub fn ids(&self) -> Vec<&RunId> {
        self.runs.iter().map(|run| &run.id).collect()
    }

    /// Look up a run by id
    pub fn get(&self, id: &RunId) -> Option<&SimulationRun> {
        self.runs.iter().find(|run| &run.id == id)
    }

    /// Most recent run
    pub fn latest(&self) -> Option<&SimulationRun> {
        self.runs.back()
    }

    /// Add a run, returning the runs evicted to stay within the limit
    ///
    /// A run with an id already present replaces the older entry and moves
    /// to the back.
    pub fn record(&mut self, run: SimulationRun) -> Vec<SimulationRun> {
        self.runs.retain(|existing| existing.id != run.id);
        self.runs.push_back(run);

        let mut evicted = Vec::new();
        while self.runs.len() > self.limit {
            if let Some(oldest) = self.runs.pop_front() {
                debug!(run_id = %oldest.id, "Evicted run from history");
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Change the limit, dropping the oldest runs if needed
    pub fn set_limit(&mut self, limit: usize) -> SimulationResult<Vec<SimulationRun>> {
        if limit == 0 {
            return Err(SimulationError::history_error("history limit must be at least 1"));
        }
        self.limit = limit;
        let excess = self.runs.len().saturating_sub(limit);
        Ok(self.runs.drain(..excess).collect())
    }

    /// Compare the two most recent runs, older one as the base
    pub fn compare_latest(&self) -> Option<SimulationComparison> {
        let count = self.runs.len();
        if count < 2 {
            return None;
        }
        Some(SimulationComparison::between(&self.runs[count - 2], &self.runs[count - 1]))
    }

    /// Load a history file, or start an empty one if it does not exist
    pub fn load<P: AsRef<Path>>(path: P, limit: usize) -> SimulationResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No history file, starting empty");
            return Self::new(limit);
        }

        let content = fs::read_to_string(path)?;
        let mut history: SimulationHistory = serde_json::from_str(&content).map_err(|e| {
            SimulationError::history_error(format!("cannot parse {}: {}", path.display(), e))
        })?;
        history.set_limit(limit)?;

        info!(path = %path.display(), runs = history.len(), "Loaded run history");
        Ok(history)
    }

    /// Write the history as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SimulationResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = %path.display(), runs = self.len(), "Saved run history");
        Ok(())
    }
}

/// Busy time of one station in two runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationComparison {
    /// Station
    pub station: StationId,
    /// Busy time in the base run, absent if the station was not used
    pub base_busy_time: Option<f64>,
    /// Busy time in the compared run, absent if the station was not used
    pub compared_busy_time: Option<f64>,
}

impl StationComparison {
    /// Change in busy time, treating a missing side as 0
    pub fn delta(&self) -> f64 {
        self.compared_busy_time.unwrap_or(0.0) - self.base_busy_time.unwrap_or(0.0)
    }
}

/// Difference between two runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationComparison {
    /// Base run
    pub base: RunId,
    /// Compared run
    pub compared: RunId,
    /// Total duration of the base run
    pub base_total_duration: f64,
    /// Total duration of the compared run
    pub compared_total_duration: f64,
    /// Compared total duration minus base total duration, in seconds
    pub duration_delta: f64,
    /// Absolute percent change of the total duration, 0 when the base is 0
    pub duration_percent: f64,
    /// Whether the total duration went down
    pub direction: ComparisonDirection,
    /// Box count of the base run
    pub base_box_count: usize,
    /// Box count of the compared run
    pub compared_box_count: usize,
    /// Compared box count minus base box count
    pub box_count_delta: i64,
    /// Signed percent change of the box count, 0 when the base is 0
    pub box_count_percent: f64,
    /// Busy time per station over the union of both runs' stations
    pub stations: Vec<StationComparison>,
}

impl SimulationComparison {
    /// Compare `compared` against `base`
    pub fn between(base: &SimulationRun, compared: &SimulationRun) -> Self {
        let old = &base.summary;
        let new = &compared.summary;

        let duration_delta = new.total_duration - old.total_duration;
        let duration_percent = if old.total_duration != 0.0 {
            (duration_delta / old.total_duration * 100.0).abs()
        } else {
            0.0
        };
        let direction =
            if duration_delta < 0.0 { ComparisonDirection::Improved } else { ComparisonDirection::Increased };

        let box_count_delta = new.box_count as i64 - old.box_count as i64;
        let box_count_percent = if old.box_count != 0 {
            box_count_delta as f64 / old.box_count as f64 * 100.0
        } else {
            0.0
        };

        let mut stations: BTreeMap<&StationId, StationComparison> = BTreeMap::new();
        for (station, &busy) in &old.per_station_busy_time {
            stations
                .entry(station)
                .or_insert_with(|| StationComparison {
                    station: station.clone(),
                    base_busy_time: None,
                    compared_busy_time: None,
                })
                .base_busy_time = Some(busy);
        }
        for (station, &busy) in &new.per_station_busy_time {
            stations
                .entry(station)
                .or_insert_with(|| StationComparison {
                    station: station.clone(),
                    base_busy_time: None,
                    compared_busy_time: None,
                })
                .compared_busy_time = Some(busy);
        }

        Self {
            base: base.id.clone(),
            compared: compared.id.clone(),
            base_total_duration: old.total_duration,
            compared_total_duration: new.total_duration,
            duration_delta,
            duration_percent,
            direction,
            base_box_count: old.box_count,
            compared_box_count: new.box_count,
            box_count_delta,
            box_count_percent,
            stations: stations.into_values().collect(),
        }
    }
}
