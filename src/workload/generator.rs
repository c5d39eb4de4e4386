//! Synthetic workload generation
//!
//! Produces realistic-looking separation sheets for demos and tests: packages
//! with a few boxes each, every box visiting a random subset of stations with
//! a random item count per station.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;

use crate::types::StationId;
use crate::workload::WorkItem;

/// Shape of a generated workload
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadProfile {
    /// Station names boxes are drawn from
    pub stations: Vec<StationId>,
    /// Boxes per package, inclusive range
    pub boxes_per_package: (usize, usize),
    /// Stations visited per box, inclusive range
    pub stations_per_box: (usize, usize),
    /// Items per station task, inclusive range
    pub items_per_task: (u64, u64),
}

impl Default for WorkloadProfile {
    fn default() -> Self {
        Self {
            stations: (1..=6).map(|n| StationId::new(format!("Station {}", n))).collect(),
            boxes_per_package: (1, 4),
            stations_per_box: (1, 3),
            items_per_task: (1, 12),
        }
    }
}

/// Generator for synthetic work items
pub struct WorkloadGenerator {
    rng: Box<dyn RngCore>,
    profile: WorkloadProfile,
}

impl fmt::Debug for WorkloadGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadGenerator").field("profile", &self.profile).finish()
    }
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadGenerator {
    /// Create a generator seeded from the thread RNG
    pub fn new() -> Self {
        Self { rng: Box::new(rand::thread_rng()), profile: WorkloadProfile::default() }
    }

    /// Create a generator with a specific seed for reproducible results
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
            profile: WorkloadProfile::default(),
        }
    }

    /// Replace the workload profile
    pub fn with_profile(mut self, profile: WorkloadProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Generate rows for `box_count` boxes
    pub fn generate(&mut self, box_count: usize) -> Result<Vec<WorkItem>, String> {
        let profile = self.profile.clone();

        if profile.stations.is_empty() {
            return Err("Cannot generate work items without any stations".to_string());
        }
        let (min_boxes, max_boxes) = profile.boxes_per_package;
        let (min_stations, max_stations) = profile.stations_per_box;
        let (min_items, max_items) = profile.items_per_task;
        if min_boxes == 0 || min_boxes > max_boxes {
            return Err(format!("Invalid boxes per package range: {} - {}", min_boxes, max_boxes));
        }
        if min_stations == 0 || min_stations > max_stations {
            return Err(format!("Invalid stations per box range: {} - {}", min_stations, max_stations));
        }
        if min_items > max_items {
            return Err(format!("Invalid items per task range: {} - {}", min_items, max_items));
        }

        let mut items = Vec::new();
        let mut box_number = 0;
        let mut package_number = 0;

        while box_number < box_count {
            package_number += 1;
            let boxes_here = self.rng.gen_range(min_boxes..=max_boxes).min(box_count - box_number);

            for _ in 0..boxes_here {
                box_number += 1;
                let visits = self
                    .rng
                    .gen_range(min_stations..=max_stations)
                    .min(profile.stations.len());

                let chosen: Vec<&StationId> =
                    profile.stations.choose_multiple(&mut self.rng, visits).collect();
                for station in chosen {
                    items.push(WorkItem::new(
                        package_number.to_string(),
                        box_number.to_string(),
                        station.clone(),
                        self.rng.gen_range(min_items..=max_items),
                    ));
                }
            }
        }

        Ok(items)
    }
}
