//! Boxes and batches
//!
//! A batch groups the input rows into boxes. Rows are stably sorted by
//! `(package_id, box_id)`, boxes are discovered in that order, and each box
//! keeps its rows in sorted order, which is the order its station tasks run.
//! The batch also records the closed set of stations seen in the input so the
//! allocator can build every worker pool before it starts.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::{BoxId, StationId};
use crate::workload::WorkItem;

/// One box and the station tasks it needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxWork {
    /// Box identifier
    pub box_id: BoxId,
    /// Station tasks in processing order
    pub items: Vec<WorkItem>,
}

impl BoxWork {
    /// Create an empty box
    pub fn new(box_id: impl Into<BoxId>) -> Self {
        Self { box_id: box_id.into(), items: Vec::new() }
    }

    /// Add a station task to the end of the box
    pub fn with_item(mut self, item: WorkItem) -> Self {
        self.items.push(item);
        self
    }

    /// Total items across all station tasks, saturating at `u64::MAX`
    pub fn total_items(&self) -> u64 {
        self.items.iter().fold(0u64, |total, item| total.saturating_add(item.item_count))
    }

    /// Number of distinct stations the box visits
    pub fn station_count(&self) -> usize {
        self.items.iter().map(|item| &item.station).collect::<HashSet<_>>().len()
    }

    /// Whether the box has no station tasks
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All boxes of one simulation input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    boxes: Vec<BoxWork>,
    stations: Vec<StationId>,
}

impl Batch {
    /// Group rows into boxes
    pub fn from_items(mut items: Vec<WorkItem>) -> Self {
        // sort_by is stable, rows of one box keep their input order
        items.sort_by(|a, b| a.package_id.cmp(&b.package_id).then_with(|| a.box_id.cmp(&b.box_id)));

        let mut boxes: Vec<BoxWork> = Vec::new();
        let mut index_by_box: HashMap<BoxId, usize> = HashMap::new();

        for item in items {
            let index = *index_by_box.entry(item.box_id.clone()).or_insert_with(|| {
                boxes.push(BoxWork::new(item.box_id.clone()));
                boxes.len() - 1
            });
            boxes[index].items.push(item);
        }

        Self::from_boxes(boxes)
    }

    /// Build a batch from already grouped boxes, kept in the given order
    pub fn from_boxes(boxes: Vec<BoxWork>) -> Self {
        let mut seen = HashSet::new();
        let stations = boxes
            .iter()
            .flat_map(|b| b.items.iter().map(|item| &item.station))
            .filter(|station| seen.insert((*station).clone()))
            .cloned()
            .collect();

        Self { boxes, stations }
    }

    /// Boxes in discovery order
    pub fn boxes(&self) -> &[BoxWork] {
        &self.boxes
    }

    /// Stations in discovery order
    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    /// Number of distinct box ids
    pub fn box_count(&self) -> usize {
        self.boxes.iter().map(|b| &b.box_id).collect::<HashSet<_>>().len()
    }

    /// Number of rows across all boxes
    pub fn work_item_count(&self) -> usize {
        self.boxes.iter().map(|b| b.items.len()).sum()
    }

    /// Whether the batch holds no boxes
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
