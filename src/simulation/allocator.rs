//! Worker allocation
//!
//! The allocator walks boxes in estimator order. Each box keeps a cursor, the
//! earliest time its next station task may start, because a physical box
//! moves through stations one step at a time. Each task goes to the worker of
//! its station with the smallest `available_at` (lowest index on ties) and
//! starts at `max(available_at, cursor)`.
//!
//! All mutable state lives in a caller-owned [`SimulationState`]. Worker pools
//! are created up front from the batch's station set, so nothing depends on
//! the order in which stations are first met.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, warn};

use crate::simulation::{BoxEstimate, SimulationError, SimulationResult};
use crate::types::{BoxId, SimulationConfig, StationId};
use crate::workload::{Batch, BoxWork};

/// One worker slot of a station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Position of the worker in its station pool
    pub index: usize,
    /// Simulated time (seconds) at which the worker is next free
    pub available_at: f64,
}

/// The workers of one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPool {
    station: StationId,
    workers: Vec<Worker>,
}

impl StationPool {
    /// Create a pool of `slots` idle workers (at least one)
    pub fn new(station: StationId, slots: usize) -> Self {
        let workers = (0..slots.max(1)).map(|index| Worker { index, available_at: 0.0 }).collect();
        Self { station, workers }
    }

    /// Station this pool belongs to
    pub fn station(&self) -> &StationId {
        &self.station
    }

    /// Number of worker slots
    pub fn slot_count(&self) -> usize {
        self.workers.len()
    }

    /// Workers in index order
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Worker with the smallest `available_at`, lowest index on ties
    pub fn earliest_available(&self) -> Worker {
        // Pools always hold at least one worker
        let mut best = self.workers[0];
        for worker in &self.workers[1..] {
            if worker.available_at < best.available_at {
                best = *worker;
            }
        }
        best
    }

    /// Mark a worker busy until `until`
    fn occupy(&mut self, index: usize, until: f64) {
        let worker = &mut self.workers[index];
        debug_assert!(until >= worker.available_at, "worker availability moved backwards");
        worker.available_at = until;
    }
}

/// A station task placed on a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Box the task belongs to
    pub box_id: BoxId,
    /// Station that handled the task
    pub station: StationId,
    /// Worker index within the station pool
    pub worker_index: usize,
    /// Items handled
    pub item_count: u64,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Assignment {
    /// Time the worker spent on the task
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Mutable state of one simulation run
///
/// Each run owns its state; independent runs never share one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    stations: Vec<StationId>,
    pools: HashMap<StationId, StationPool>,
    busy_time: BTreeMap<StationId, f64>,
    bottleneck_time: Option<f64>,
    total_duration: f64,
}

impl SimulationState {
    /// Create pools and busy-time counters for every station up front
    pub fn new(stations: &[StationId], config: &SimulationConfig) -> Self {
        let mut ordered = Vec::with_capacity(stations.len());
        let mut pools = HashMap::with_capacity(stations.len());
        let mut busy_time = BTreeMap::new();

        for station in stations {
            if pools.contains_key(station) {
                continue;
            }
            let slots = config.worker_slots_for(station);
            pools.insert(station.clone(), StationPool::new(station.clone(), slots));
            busy_time.insert(station.clone(), 0.0);
            ordered.push(station.clone());
        }

        Self { stations: ordered, pools, busy_time, bottleneck_time: None, total_duration: 0.0 }
    }

    /// Create the state for a batch
    pub fn for_batch(batch: &Batch, config: &SimulationConfig) -> Self {
        Self::new(batch.stations(), config)
    }

    /// Stations in creation order
    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    /// Pool of a station
    pub fn pool(&self, station: &StationId) -> Option<&StationPool> {
        self.pools.get(station)
    }

    /// Cumulative busy time per station
    pub fn busy_time(&self) -> &BTreeMap<StationId, f64> {
        &self.busy_time
    }

    /// First bottleneck start time, if one was recorded
    pub fn bottleneck_time(&self) -> Option<f64> {
        self.bottleneck_time
    }

    /// Latest box finish time so far
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }
}

/// Work time of one station task
pub fn task_duration(item_count: u64, config: &SimulationConfig) -> f64 {
    (item_count as f64 * config.time_per_item) / config.workers_per_station
        + config.transit_time_per_station
}

/// Result of allocating one box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxOutcome {
    /// Box identifier
    pub box_id: BoxId,
    /// Station tasks in processing order
    pub assignments: Vec<Assignment>,
    /// Finish time including the extra time per box, 0 for an empty box
    pub finish: f64,
}

/// Result of allocating a whole batch
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    /// Final state of the run
    pub state: SimulationState,
    /// Per-box results in processing order
    pub boxes: Vec<BoxOutcome>,
}

impl AllocationOutcome {
    /// All assignments in processing order
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.boxes.iter().flat_map(|b| b.assignments.iter())
    }
}

/// Places station tasks on workers
#[derive(Debug, Clone, Copy)]
pub struct Allocator<'a> {
    config: &'a SimulationConfig,
}

impl<'a> Allocator<'a> {
    /// Create an allocator for a configuration
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    /// Allocate every station task of one box
    pub fn allocate_box(&self, state: &mut SimulationState, work: &BoxWork) -> SimulationResult<BoxOutcome> {
        let mut cursor = 0.0_f64;
        let mut assignments = Vec::with_capacity(work.items.len());

        for item in &work.items {
            let duration = task_duration(item.item_count, self.config);

            let pool = state.pools.get_mut(&item.station).ok_or_else(|| {
                SimulationError::invalid_input(
                    "station",
                    format!("station {} of box {} has no worker pool", item.station, work.box_id),
                )
            })?;

            let worker = pool.earliest_available();
            let start = worker.available_at.max(cursor);
            let end = start + duration;

            if state.bottleneck_time.is_none() && pool.slot_count() >= self.config.station_capacity && start > 0.0 {
                warn!(
                    station = %item.station,
                    box_id = %work.box_id,
                    start,
                    "Station reached capacity, first bottleneck recorded"
                );
                state.bottleneck_time = Some(start);
            }

            pool.occupy(worker.index, end);
            *state.busy_time.entry(item.station.clone()).or_insert(0.0) += duration;
            cursor = end;

            assignments.push(Assignment {
                box_id: work.box_id.clone(),
                station: item.station.clone(),
                worker_index: worker.index,
                item_count: item.item_count,
                start,
                end,
            });
        }

        let finish = assignments
            .iter()
            .map(|a| a.end)
            .reduce(f64::max)
            .map(|last_end| last_end + self.config.extra_time_per_box)
            .unwrap_or(0.0);
        state.total_duration = state.total_duration.max(finish);

        debug!(box_id = %work.box_id, tasks = assignments.len(), finish, "Allocated box");

        Ok(BoxOutcome { box_id: work.box_id.clone(), assignments, finish })
    }

    /// Allocate all boxes of a batch in the given order
    #[instrument(skip_all, fields(boxes = order.len(), stations = state.stations().len()))]
    pub fn run(
        &self,
        mut state: SimulationState,
        batch: &Batch,
        order: &[BoxEstimate],
    ) -> SimulationResult<AllocationOutcome> {
        let mut boxes = Vec::with_capacity(order.len());

        for estimate in order {
            let work = batch.boxes().get(estimate.batch_index).ok_or_else(|| {
                SimulationError::invalid_input(
                    "box_id",
                    format!("box {} is not part of the batch", estimate.box_id),
                )
            })?;
            boxes.push(self.allocate_box(&mut state, work)?);
        }

        Ok(AllocationOutcome { state, boxes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::order_boxes;
    use crate::workload::WorkItem;

    fn config(workers: f64, capacity: usize) -> SimulationConfig {
        SimulationConfig {
            time_per_item: 10.0,
            transit_time_per_station: 0.0,
            workers_per_station: workers,
            station_capacity: capacity,
            extra_time_per_box: 0.0,
            ..Default::default()
        }
    }

    fn station(name: &str) -> StationId {
        StationId::new(name)
    }

    #[test]
    fn test_pool_is_floored_with_minimum_one() {
        let state = SimulationState::new(&[station("A")], &config(0.5, 10));
        assert_eq!(state.pool(&station("A")).unwrap().slot_count(), 1);

        let state = SimulationState::new(&[station("A")], &config(2.7, 10));
        assert_eq!(state.pool(&station("A")).unwrap().slot_count(), 2);
    }

    #[test]
    fn test_pool_uses_slot_override() {
        let mut cfg = config(1.0, 10);
        cfg.station_slots.insert(station("A"), 3);
        let state = SimulationState::new(&[station("A"), station("B")], &cfg);
        assert_eq!(state.pool(&station("A")).unwrap().slot_count(), 3);
        assert_eq!(state.pool(&station("B")).unwrap().slot_count(), 1);
    }

    #[test]
    fn test_state_starts_idle() {
        let state = SimulationState::new(&[station("B"), station("A"), station("B")], &config(2.0, 10));
        assert_eq!(state.stations(), &[station("B"), station("A")]);
        assert_eq!(state.busy_time().get(&station("A")), Some(&0.0));
        assert!(state.bottleneck_time().is_none());
        assert_eq!(state.total_duration(), 0.0);
        assert!(state
            .pool(&station("B"))
            .unwrap()
            .workers()
            .iter()
            .all(|w| w.available_at == 0.0));
    }

    #[test]
    fn test_earliest_available_prefers_lowest_index_on_ties() {
        let mut pool = StationPool::new(station("A"), 3);
        assert_eq!(pool.earliest_available().index, 0);

        pool.occupy(0, 10.0);
        assert_eq!(pool.earliest_available().index, 1);

        pool.occupy(1, 5.0);
        pool.occupy(2, 5.0);
        assert_eq!(pool.earliest_available().index, 1);
    }

    #[test]
    fn test_task_duration_formula() {
        let mut cfg = config(2.0, 10);
        cfg.transit_time_per_station = 4.0;
        // 3 * 10 / 2 + 4
        assert_eq!(task_duration(3, &cfg), 19.0);
    }

    #[test]
    fn test_box_tasks_are_sequential() {
        let cfg = config(4.0, 10);
        let mut state = SimulationState::new(&[station("A"), station("B")], &cfg);
        let work = BoxWork::new("1")
            .with_item(WorkItem::new("P", "1", "A", 4))
            .with_item(WorkItem::new("P", "1", "B", 8));

        let outcome = Allocator::new(&cfg).allocate_box(&mut state, &work).unwrap();

        // 4 * 10 / 4 = 10, then 8 * 10 / 4 = 20 starting when the first ends
        assert_eq!(outcome.assignments[0].start, 0.0);
        assert_eq!(outcome.assignments[0].end, 10.0);
        assert_eq!(outcome.assignments[1].start, 10.0);
        assert_eq!(outcome.assignments[1].end, 30.0);
        assert_eq!(outcome.finish, 30.0);
    }

    #[test]
    fn test_empty_box_finishes_at_zero() {
        let mut cfg = config(1.0, 10);
        cfg.extra_time_per_box = 50.0;
        let mut state = SimulationState::new(&[], &cfg);
        let outcome = Allocator::new(&cfg).allocate_box(&mut state, &BoxWork::new("E")).unwrap();

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.finish, 0.0);
        assert_eq!(state.total_duration(), 0.0);
    }

    #[test]
    fn test_extra_time_added_once_per_box() {
        let mut cfg = config(1.0, 10);
        cfg.extra_time_per_box = 7.0;
        let mut state = SimulationState::new(&[station("A"), station("B")], &cfg);
        let work = BoxWork::new("1")
            .with_item(WorkItem::new("P", "1", "A", 1))
            .with_item(WorkItem::new("P", "1", "B", 1));

        let outcome = Allocator::new(&cfg).allocate_box(&mut state, &work).unwrap();
        assert_eq!(outcome.finish, 27.0);
        // Busy time excludes the extra box time
        assert_eq!(state.busy_time().values().sum::<f64>(), 20.0);
    }

    #[test]
    fn test_single_worker_serializes_boxes_and_latches_bottleneck() {
        let cfg = config(1.0, 1);
        let batch = Batch::from_items(vec![
            WorkItem::new("P", "A", "S", 2),
            WorkItem::new("P", "B", "S", 2),
        ]);
        let order = order_boxes(&batch, &cfg).unwrap();
        let outcome = Allocator::new(&cfg)
            .run(SimulationState::for_batch(&batch, &cfg), &batch, &order)
            .unwrap();

        assert_eq!(outcome.boxes[0].assignments[0].start, 0.0);
        assert_eq!(outcome.boxes[1].assignments[0].start, 20.0);
        assert_eq!(outcome.state.bottleneck_time(), Some(20.0));
        assert_eq!(outcome.state.total_duration(), 40.0);
    }

    #[test]
    fn test_bottleneck_requires_capacity_reached() {
        let cfg = config(1.0, 2);
        let batch = Batch::from_items(vec![
            WorkItem::new("P", "A", "S", 2),
            WorkItem::new("P", "B", "S", 2),
        ]);
        let order = order_boxes(&batch, &cfg).unwrap();
        let outcome = Allocator::new(&cfg)
            .run(SimulationState::for_batch(&batch, &cfg), &batch, &order)
            .unwrap();

        assert!(outcome.state.bottleneck_time().is_none());
    }

    #[test]
    fn test_bottleneck_is_first_event_only() {
        let cfg = config(1.0, 1);
        let batch = Batch::from_items(vec![
            WorkItem::new("P", "A", "S", 1),
            WorkItem::new("P", "B", "S", 2),
            WorkItem::new("P", "C", "S", 3),
        ]);
        let order = order_boxes(&batch, &cfg).unwrap();
        let outcome = Allocator::new(&cfg)
            .run(SimulationState::for_batch(&batch, &cfg), &batch, &order)
            .unwrap();

        // A: 0-10, B: 10-30, C: 30-60
        assert_eq!(outcome.state.bottleneck_time(), Some(10.0));
        assert_eq!(outcome.state.total_duration(), 60.0);
    }

    #[test]
    fn test_unknown_station_is_an_error() {
        let cfg = config(1.0, 10);
        let mut state = SimulationState::new(&[station("A")], &cfg);
        let work = BoxWork::new("1").with_item(WorkItem::new("P", "1", "Z", 1));

        let err = Allocator::new(&cfg).allocate_box(&mut state, &work).unwrap_err();
        assert_eq!(err.category(), "Input");
        assert_eq!(err.input_row(), None);
        assert!(matches!(
            &err,
            SimulationError::InvalidInput { field: Some(field), .. } if field == "station"
        ));
    }
}
