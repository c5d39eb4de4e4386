//! Report rendering
//!
//! Turns summaries and comparisons into plain text for the terminal or into
//! a JSON document for other tools.
//!
//! # Usage Example
//!
//! ```rust
//! use box_separation_simulator::report::format_duration;
//!
//! assert_eq!(format_duration(90.0), "1 minute and 30 seconds");
//! assert_eq!(format_duration(45.0), "45 seconds");
//! ```

pub mod duration;

pub use duration::*;

use serde::Serialize;

use crate::simulation::{SimulationComparison, SimulationReport, SimulationResult, SimulationSummary};
use crate::types::RunId;

/// Render the summary of one run
pub fn render_summary(summary: &SimulationSummary) -> String {
    let mut report = String::new();

    report.push_str("=== Separation Simulation Results ===\n\n");
    report.push_str(&format!(
        "Total time to separate all boxes: {}\n",
        format_duration(summary.total_duration)
    ));
    report.push_str(&format!("Boxes simulated: {}\n", summary.box_count));
    match summary.bottleneck_time {
        Some(time) => report.push_str(&format!("Time until first bottleneck: {}\n", format_duration(time))),
        None => report.push_str("Time until first bottleneck: no bottleneck\n"),
    }

    if !summary.per_station_busy_time.is_empty() {
        report.push_str("\nStation Load:\n");
        for (station, busy) in summary.stations_by_load() {
            report.push_str(&format!(
                "  • {}: {:.0}s ({:.1}%)\n",
                station,
                busy,
                summary.station_share(station) * 100.0
            ));
        }
    }

    report.push('\n');
    report.push_str(&render_overload_suggestion(summary));
    report
}

/// Render the overload check and the redistribution suggestion
pub fn render_overload_suggestion(summary: &SimulationSummary) -> String {
    if summary.overloaded_stations.is_empty() {
        return "Layout: no overloaded station detected.\n".to_string();
    }

    let mut text = format!(
        "Layout: overloaded stations detected (busy time above 1.5x the mean of {:.0}s):\n",
        summary.mean_busy_time()
    );
    for station in &summary.overloaded_stations {
        let busy = summary.per_station_busy_time.get(station).copied().unwrap_or(0.0);
        text.push_str(&format!("  • {}: {:.0}s\n", station, busy));
    }

    let targets: Vec<String> = summary.underused_stations().into_iter().map(|s| s.to_string()).collect();
    if targets.is_empty() {
        text.push_str("Suggestion: redistribute products to stations below the mean.\n");
    } else {
        text.push_str(&format!(
            "Suggestion: redistribute products to stations below the mean: {}\n",
            targets.join(", ")
        ));
    }
    text
}

/// Render a comparison of two runs
pub fn render_comparison(comparison: &SimulationComparison) -> String {
    let mut report = String::new();

    report.push_str(&format!(
        "=== Comparison: {} -> {} ===\n\n",
        comparison.base, comparison.compared
    ));
    report.push_str(&format!(
        "Total time delta: {} ({:+.0}s, {:.1}% {})\n",
        format_duration(comparison.duration_delta.abs()),
        comparison.duration_delta,
        comparison.duration_percent,
        comparison.direction
    ));
    report.push_str(&format!(
        "Boxes base: {} | compared: {} | delta {:+} boxes ({:+.1}%)\n",
        comparison.base_box_count,
        comparison.compared_box_count,
        comparison.box_count_delta,
        comparison.box_count_percent
    ));

    if !comparison.stations.is_empty() {
        report.push_str("\nStation Time (base / compared):\n");
        for row in &comparison.stations {
            report.push_str(&format!(
                "  • {}: {} / {} ({:+.0}s)\n",
                row.station,
                busy_cell(row.base_busy_time),
                busy_cell(row.compared_busy_time),
                row.delta()
            ));
        }
    }
    report
}

fn busy_cell(busy: Option<f64>) -> String {
    busy.map_or_else(|| "-".to_string(), |b| format!("{:.0}s", b))
}

/// JSON document written for `--output-format json`
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    /// Run identifier
    pub run_id: &'a RunId,
    /// Run result
    #[serde(flatten)]
    pub report: &'a SimulationReport,
    /// Comparison with the previous run, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<&'a SimulationComparison>,
}

impl JsonOutput<'_> {
    /// Serialize as pretty JSON
    pub fn to_json(&self) -> SimulationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
